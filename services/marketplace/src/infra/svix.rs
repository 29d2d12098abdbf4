//! Svix webhook signatures, as used by Clerk, checked with the `svix` crate.
//!
//! The replay window is enforced by the caller against its own clock, so
//! only the signature is checked here.

use std::sync::Arc;

use anyhow::anyhow;
use axum::http::{HeaderMap, HeaderValue};
use svix::webhooks::Webhook;

use crate::domain::repository::WebhookVerifier;
use crate::domain::webhook::{SVIX_ID, SVIX_SIGNATURE, SVIX_TIMESTAMP, WebhookHeaders};
use crate::error::MarketplaceError;

#[derive(Clone)]
pub struct SvixVerifier {
    webhook: Arc<Webhook>,
}

impl SvixVerifier {
    /// Accepts the `whsec_`-prefixed secret shown in the provider dashboard.
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        let webhook =
            Webhook::new(secret).map_err(|e| anyhow!("invalid webhook secret: {e:?}"))?;
        Ok(Self {
            webhook: Arc::new(webhook),
        })
    }

    /// `v1,<base64>` signature for a delivery.
    pub fn sign(&self, id: &str, timestamp: i64, payload: &[u8]) -> anyhow::Result<String> {
        self.webhook
            .sign(id, timestamp, payload)
            .map_err(|e| anyhow!("failed to sign webhook payload: {e:?}"))
    }
}

fn header_map(headers: &WebhookHeaders) -> Result<HeaderMap, MarketplaceError> {
    let value = |raw: &str| {
        HeaderValue::from_str(raw).map_err(|_| MarketplaceError::InvalidWebhookSignature)
    };
    let mut map = HeaderMap::with_capacity(3);
    map.insert(SVIX_ID, value(&headers.id)?);
    map.insert(SVIX_TIMESTAMP, value(&headers.timestamp)?);
    map.insert(SVIX_SIGNATURE, value(&headers.signature)?);
    Ok(map)
}

impl WebhookVerifier for SvixVerifier {
    fn verify(&self, payload: &[u8], headers: &WebhookHeaders) -> Result<(), MarketplaceError> {
        let map = header_map(headers)?;
        self.webhook
            .verify_ignoring_timestamp(payload, &map)
            .map_err(|e| {
                tracing::debug!(event_id = %headers.id, error = ?e, "webhook signature mismatch");
                MarketplaceError::InvalidWebhookSignature
            })
    }
}
