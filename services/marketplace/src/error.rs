use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use booklin_core::error::error_response;
use booklin_domain::email::InvalidEmail;
use booklin_domain::pro_profile::{InvalidOnboardingStep, InvalidValidationStatus};
use booklin_domain::siret::InvalidSiret;
use booklin_domain::user::InvalidUserRole;

/// Marketplace service error variants.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("{0}")]
    Validation(String),
    #[error("user not found")]
    UserNotFound,
    #[error("pro profile not found")]
    ProProfileNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user already has a professional profile")]
    ProProfileAlreadyExists,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("missing required svix headers")]
    MissingWebhookHeaders,
    #[error("invalid webhook signature")]
    InvalidWebhookSignature,
    #[error("webhook timestamp too old or too far in future")]
    StaleWebhook,
    #[error("webhook secret not configured")]
    WebhookSecretMissing,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MarketplaceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProProfileNotFound => "PRO_PROFILE_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::ProProfileAlreadyExists => "PRO_PROFILE_ALREADY_EXISTS",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::MissingWebhookHeaders => "MISSING_WEBHOOK_HEADERS",
            Self::InvalidWebhookSignature => "INVALID_WEBHOOK_SIGNATURE",
            Self::StaleWebhook => "STALE_WEBHOOK",
            Self::WebhookSecretMissing => "WEBHOOK_SECRET_MISSING",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MissingData | Self::MissingWebhookHeaders => {
                StatusCode::BAD_REQUEST
            }
            Self::UserNotFound | Self::ProProfileNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists | Self::ProProfileAlreadyExists => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidWebhookSignature | Self::StaleWebhook => StatusCode::UNAUTHORIZED,
            Self::WebhookSecretMissing | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        let message = match &self {
            // The anyhow chain goes to the log, never to the client.
            Self::Internal(e) => {
                tracing::error!(error = ?e, "internal error chain");
                self.to_string()
            }
            _ => self.to_string(),
        };
        error_response(self.status(), self.kind(), message)
    }
}

macro_rules! validation_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for MarketplaceError {
                fn from(e: $ty) -> Self {
                    Self::Validation(e.to_string())
                }
            }
        )+
    };
}

validation_from!(
    InvalidEmail,
    InvalidSiret,
    InvalidUserRole,
    InvalidOnboardingStep,
    InvalidValidationStatus,
);

impl From<JsonRejection> for MarketplaceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for MarketplaceError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}
