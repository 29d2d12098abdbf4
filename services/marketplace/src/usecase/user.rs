use booklin_domain::email::Email;
use booklin_domain::user::UserRole;

use crate::domain::repository::{UserFilter, UserRepository};
use crate::domain::user::{NewUser, User, UserProfilePatch};
use crate::error::MarketplaceError;

pub struct UpdateUserInput {
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub profile: UserProfilePatch,
}

impl UpdateUserInput {
    fn is_empty(&self) -> bool {
        self.email.is_none() && self.role.is_none() && self.profile.is_empty()
    }
}

pub struct UserService<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UserService<R> {
    // ── Create ───────────────────────────────────────────────────────────────

    pub async fn create(&self, input: NewUser) -> Result<User, MarketplaceError> {
        // Entity validation runs before any repository access.
        let user = User::create(input)?;
        if self.repo.find_by_id(&user.id).await?.is_some() {
            return Err(MarketplaceError::UserAlreadyExists);
        }
        self.repo.create(&user).await
    }

    // ── Update ───────────────────────────────────────────────────────────────

    pub async fn update(&self, id: &str, input: UpdateUserInput) -> Result<User, MarketplaceError> {
        if input.is_empty() {
            return Err(MarketplaceError::MissingData);
        }
        let mut user = self.get(id).await?;
        if let Some(email) = input.email.as_deref() {
            user.update_email(email)?;
        }
        if let Some(role) = input.role {
            user.change_role(role);
        }
        if !input.profile.is_empty() {
            user.update_profile(input.profile);
        }
        self.repo.update(id, &user).await
    }

    // ── Delete ───────────────────────────────────────────────────────────────

    pub async fn delete(&self, id: &str) -> Result<User, MarketplaceError> {
        self.get(id).await?;
        self.repo.delete(id).await
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub async fn get(&self, id: &str) -> Result<User, MarketplaceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(MarketplaceError::UserNotFound)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, MarketplaceError> {
        let email = Email::parse(email)?;
        self.repo.find_by_email(&email).await
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, MarketplaceError> {
        self.repo.find_many(filter).await
    }
}
