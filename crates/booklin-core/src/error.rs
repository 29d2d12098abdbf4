use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error body returned by every Booklin service.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub kind: &'a str,
    pub message: String,
}

/// Build an error response with the shared `{ "kind", "message" }` body.
///
/// Logs 500s only. tower-http TraceLayer already records method/uri/status for
/// every request, and 4xx are expected client errors.
pub fn error_response(status: StatusCode, kind: &str, message: String) -> Response {
    if status.is_server_error() {
        ::tracing::error!(kind, message = %message, "internal error");
    }
    (status, axum::Json(ErrorBody { kind, message })).into_response()
}
