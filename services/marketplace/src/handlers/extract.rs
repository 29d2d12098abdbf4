use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::MarketplaceError;

/// `axum::Json` whose rejections render as `VALIDATION_ERROR` bodies.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(MarketplaceError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// `axum::extract::Path` whose rejections render as `VALIDATION_ERROR` bodies.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(MarketplaceError))]
pub struct Path<T>(pub T);
