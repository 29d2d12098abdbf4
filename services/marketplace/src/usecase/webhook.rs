use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use booklin_domain::user::UserRole;

use crate::domain::repository::{UserRepository, WebhookEventRepository, WebhookVerifier};
use crate::domain::user::{NewUser, UserProfilePatch};
use crate::domain::webhook::{WebhookEvent, WebhookEventKind, WebhookHeaders};
use crate::error::MarketplaceError;
use crate::usecase::user::{UpdateUserInput, UserService};

/// What happened to a delivery that passed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Applied,
    Duplicate,
    Ignored,
}

/// Verifies identity-provider webhooks and mirrors them onto local users.
///
/// `verifier` is `None` when no signing secret is configured; every
/// delivery is then refused with [`MarketplaceError::WebhookSecretMissing`].
pub struct WebhookService<U: UserRepository, E: WebhookEventRepository, V: WebhookVerifier> {
    pub users: UserService<U>,
    pub events: E,
    pub verifier: Option<V>,
}

impl<U, E, V> WebhookService<U, E, V>
where
    U: UserRepository,
    E: WebhookEventRepository,
    V: WebhookVerifier,
{
    pub async fn handle(
        &self,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<WebhookOutcome, MarketplaceError> {
        let event = self.verify_at(headers, body, Utc::now())?;
        self.process(event).await
    }

    // ── Verify ───────────────────────────────────────────────────────────────

    pub fn verify_at(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<WebhookEvent, MarketplaceError> {
        let headers = WebhookHeaders::from_header_map(headers)?;
        let verifier = self
            .verifier
            .as_ref()
            .ok_or(MarketplaceError::WebhookSecretMissing)?;
        let timestamp = headers.fresh_timestamp_at(now)?;
        verifier.verify(body, &headers)?;
        WebhookEvent::verified(&headers, timestamp, body)
    }

    // ── Process ──────────────────────────────────────────────────────────────

    pub async fn process(&self, event: WebhookEvent) -> Result<WebhookOutcome, MarketplaceError> {
        if !event.verified {
            return Err(MarketplaceError::InvalidWebhookSignature);
        }
        if self.events.is_processed(&event.id).await? {
            info!(event_id = %event.id, kind = event.kind.as_str(), "duplicate webhook delivery");
            return Ok(WebhookOutcome::Duplicate);
        }

        let outcome = match &event.kind {
            WebhookEventKind::UserCreated => {
                let data = event.user_data()?;
                let created = self
                    .users
                    .create(NewUser {
                        email: data.primary_email().map(str::to_owned),
                        first_name: data.first_name(),
                        last_name: data.last_name(),
                        id: data.id,
                        role: UserRole::Client,
                    })
                    .await;
                match created {
                    Ok(_) => WebhookOutcome::Applied,
                    // A redelivery after a failed `mark_processed`.
                    Err(MarketplaceError::UserAlreadyExists) => {
                        info!(event_id = %event.id, "user already created, settling delivery");
                        WebhookOutcome::Applied
                    }
                    Err(e) => return Err(e),
                }
            }
            WebhookEventKind::UserUpdated => {
                let data = event.user_data()?;
                self.users
                    .update(
                        &data.id,
                        UpdateUserInput {
                            email: data.primary_email().map(str::to_owned),
                            role: None,
                            profile: UserProfilePatch {
                                first_name: Some(data.first_name()),
                                last_name: Some(data.last_name()),
                                ..Default::default()
                            },
                        },
                    )
                    .await?;
                WebhookOutcome::Applied
            }
            WebhookEventKind::UserDeleted => {
                let data = event.deleted_user()?;
                match self.users.delete(&data.id).await {
                    Ok(_) => WebhookOutcome::Applied,
                    Err(MarketplaceError::UserNotFound) => {
                        info!(
                            event_id = %event.id,
                            user_id = %data.id,
                            "user already deleted, settling delivery"
                        );
                        WebhookOutcome::Applied
                    }
                    Err(e) => return Err(e),
                }
            }
            WebhookEventKind::Other(kind) => {
                warn!(event_id = %event.id, kind = %kind, "ignoring unhandled webhook type");
                WebhookOutcome::Ignored
            }
        };

        self.events.mark_processed(&event).await?;
        info!(event_id = %event.id, kind = event.kind.as_str(), ?outcome, "webhook processed");
        Ok(outcome)
    }
}
