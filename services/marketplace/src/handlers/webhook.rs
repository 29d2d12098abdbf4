use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use serde::Serialize;

use crate::error::MarketplaceError;
use crate::state::AppState;
use crate::usecase::webhook::WebhookOutcome;

#[derive(Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub outcome: &'static str,
}

impl From<WebhookOutcome> for WebhookAck {
    fn from(outcome: WebhookOutcome) -> Self {
        Self {
            received: true,
            outcome: match outcome {
                WebhookOutcome::Applied => "applied",
                WebhookOutcome::Duplicate => "duplicate",
                WebhookOutcome::Ignored => "ignored",
            },
        }
    }
}

// ── POST /webhooks/clerk ─────────────────────────────────────────────────────

/// Takes the raw body: the signature covers the exact bytes sent.
pub async fn clerk_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, MarketplaceError> {
    let outcome = state.webhook_service().handle(&headers, &body).await?;
    Ok(Json(outcome.into()))
}
