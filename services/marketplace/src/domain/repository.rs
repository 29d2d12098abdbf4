#![allow(async_fn_in_trait)]

use uuid::Uuid;

use booklin_domain::email::Email;
use booklin_domain::pro_profile::ValidationStatus;
use booklin_domain::user::UserRole;

use crate::domain::pro_profile::ProProfile;
use crate::domain::user::User;
use crate::domain::webhook::{WebhookEvent, WebhookHeaders};
use crate::error::MarketplaceError;

/// Exact-match predicates for user listing. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub id: Option<String>,
    pub email: Option<Email>,
    pub role: Option<UserRole>,
}

/// Exact-match predicates for profile listing. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProProfileFilter {
    pub profession: Option<String>,
    pub city: Option<String>,
    pub is_premium: Option<bool>,
    pub validation_status: Option<ValidationStatus>,
    pub is_active: Option<bool>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.id.as_ref().is_none_or(|id| *id == user.id)
            && self.email.as_ref().is_none_or(|e| user.email.as_ref() == Some(e))
            && self.role.is_none_or(|r| r == user.role)
    }
}

impl ProProfileFilter {
    pub fn matches(&self, profile: &ProProfile) -> bool {
        self.profession
            .as_ref()
            .is_none_or(|p| profile.profession.as_ref() == Some(p))
            && self.city.as_ref().is_none_or(|c| profile.city.as_ref() == Some(c))
            && self.is_premium.is_none_or(|p| p == profile.is_premium)
            && self
                .validation_status
                .is_none_or(|s| s == profile.validation_status)
            && self.is_active.is_none_or(|a| a == profile.is_active)
    }
}

/// Repository for marketplace users.
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, MarketplaceError>;
    async fn update(&self, id: &str, user: &User) -> Result<User, MarketplaceError>;
    /// Physically delete and return the removed row.
    async fn delete(&self, id: &str) -> Result<User, MarketplaceError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, MarketplaceError>;
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, MarketplaceError>;
    async fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>, MarketplaceError>;
}

/// Repository for professional profiles.
pub trait ProProfileRepository: Send + Sync {
    async fn create(&self, profile: &ProProfile) -> Result<ProProfile, MarketplaceError>;
    async fn update(&self, id: Uuid, profile: &ProProfile) -> Result<ProProfile, MarketplaceError>;
    async fn delete(&self, id: Uuid) -> Result<ProProfile, MarketplaceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProProfile>, MarketplaceError>;
    async fn find_by_user_id(&self, user_id: &str)
    -> Result<Option<ProProfile>, MarketplaceError>;
    async fn find_many(
        &self,
        filter: &ProProfileFilter,
    ) -> Result<Vec<ProProfile>, MarketplaceError>;
}

/// Ids of webhook deliveries that were already applied.
pub trait WebhookEventRepository: Send + Sync {
    async fn is_processed(&self, event_id: &str) -> Result<bool, MarketplaceError>;
    /// Recording the same id twice is a no-op.
    async fn mark_processed(&self, event: &WebhookEvent) -> Result<(), MarketplaceError>;
}

/// Signature check for an inbound webhook body.
pub trait WebhookVerifier: Send + Sync {
    fn verify(&self, payload: &[u8], headers: &WebhookHeaders) -> Result<(), MarketplaceError>;
}
