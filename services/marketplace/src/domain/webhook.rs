use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::MarketplaceError;

/// Replay window for webhook timestamps, in seconds, either direction.
pub const WEBHOOK_TOLERANCE_SECS: i64 = 300;

pub const SVIX_ID: &str = "svix-id";
pub const SVIX_TIMESTAMP: &str = "svix-timestamp";
pub const SVIX_SIGNATURE: &str = "svix-signature";

/// The three delivery headers every Svix webhook carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

impl WebhookHeaders {
    pub fn from_header_map(headers: &HeaderMap) -> Result<Self, MarketplaceError> {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
                .ok_or(MarketplaceError::MissingWebhookHeaders)
        };
        Ok(Self {
            id: get(SVIX_ID)?,
            timestamp: get(SVIX_TIMESTAMP)?,
            signature: get(SVIX_SIGNATURE)?,
        })
    }

    /// Seconds since the Unix epoch, as sent by the provider.
    pub fn parsed_timestamp(&self) -> Result<DateTime<Utc>, MarketplaceError> {
        self.timestamp
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(MarketplaceError::StaleWebhook)
    }

    /// The delivery timestamp, if it lies within [`WEBHOOK_TOLERANCE_SECS`]
    /// of `now` in either direction, compared to the millisecond.
    pub fn fresh_timestamp_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, MarketplaceError> {
        let timestamp = self.parsed_timestamp()?;
        if (now - timestamp).num_milliseconds().abs() > WEBHOOK_TOLERANCE_SECS * 1000 {
            return Err(MarketplaceError::StaleWebhook);
        }
        Ok(timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventKind {
    UserCreated,
    UserUpdated,
    UserDeleted,
    Other(String),
}

impl WebhookEventKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "user.created" => Self::UserCreated,
            "user.updated" => Self::UserUpdated,
            "user.deleted" => Self::UserDeleted,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::UserCreated => "user.created",
            Self::UserUpdated => "user.updated",
            Self::UserDeleted => "user.deleted",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_user_event(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    data: serde_json::Map<String, serde_json::Value>,
}

/// An inbound identity-provider event. Lives only for the duration of one
/// delivery; the id is what gets recorded for deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub id: String,
    pub kind: WebhookEventKind,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub verified: bool,
}

/// Decoded `data` for `user.created` and `user.updated`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClerkUserData {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<ClerkEmailAddress>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClerkEmailAddress {
    pub email_address: String,
}

/// Decoded `data` for `user.deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClerkDeletedUser {
    pub id: String,
}

impl ClerkUserData {
    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .first()
            .map(|e| e.email_address.as_str())
            .filter(|e| !e.is_empty())
    }

    /// Empty strings from the provider mean "no value".
    pub fn first_name(&self) -> Option<String> {
        self.first_name.clone().filter(|n| !n.is_empty())
    }

    pub fn last_name(&self) -> Option<String> {
        self.last_name.clone().filter(|n| !n.is_empty())
    }
}

impl WebhookEvent {
    /// Build a verified event from a delivery whose signature already passed.
    pub fn verified(
        headers: &WebhookHeaders,
        timestamp: DateTime<Utc>,
        body: &[u8],
    ) -> Result<Self, MarketplaceError> {
        let envelope: Envelope = serde_json::from_slice(body)
            .map_err(|e| MarketplaceError::validation(format!("invalid webhook payload: {e}")))?;
        Ok(Self {
            id: headers.id.clone(),
            kind: WebhookEventKind::parse(&envelope.kind),
            payload: serde_json::Value::Object(envelope.data),
            timestamp,
            verified: true,
        })
    }

    pub fn is_user_event(&self) -> bool {
        self.kind.is_user_event()
    }

    pub fn user_data(&self) -> Result<ClerkUserData, MarketplaceError> {
        self.decode()
    }

    pub fn deleted_user(&self) -> Result<ClerkDeletedUser, MarketplaceError> {
        self.decode()
    }

    fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, MarketplaceError> {
        serde_json::from_value(self.payload.clone()).map_err(|e| {
            MarketplaceError::validation(format!(
                "invalid {} payload: {e}",
                self.kind.as_str()
            ))
        })
    }
}
