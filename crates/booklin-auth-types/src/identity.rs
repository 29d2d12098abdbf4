//! Gateway-injected identity header extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

/// Header carrying the authenticated Clerk user id.
pub const X_BOOKLIN_USER_ID: &str = "x-booklin-user-id";

/// Clerk user ids are short opaque strings (`user_...`); anything longer is rejected.
const MAX_USER_ID_LEN: usize = 128;

/// Caller identity injected by the gateway via `x-booklin-user-id`.
///
/// Returns 401 if the header is absent, not valid UTF-8, blank, or oversized.
/// Role enforcement (403) is done by handlers after extraction, since roles
/// live in the users table rather than in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send`. Extract
    // synchronously and return a 'static async block so no borrow of `parts`
    // is captured.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(X_BOOKLIN_USER_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.len() <= MAX_USER_ID_LEN)
            .map(str::to_owned);

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { user_id })
        }
    }
}
