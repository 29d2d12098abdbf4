//! Mock auth helpers for integration tests.
//!
//! Services behind the gateway receive an `x-booklin-user-id` header injected
//! by the gateway once Clerk has authenticated the session. In tests,
//! `MockAuth` produces that header directly so no real gateway or Clerk
//! session is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use booklin_auth_types::identity::X_BOOKLIN_USER_ID;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: String,
}

impl MockAuth {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// The identity header as a `(name, value)` pair.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(X_BOOKLIN_USER_ID),
            HeaderValue::from_str(&self.user_id).expect("user id is a valid header value"),
        )
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        let (name, value) = self.header();
        map.insert(name, value);
        map
    }
}
