use chrono::{DateTime, Utc};

use booklin_domain::email::Email;
use booklin_domain::user::UserRole;

use crate::error::MarketplaceError;

/// Marketplace account, keyed by the identity provider's user id.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: Option<Email>,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewUser {
    pub id: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Partial profile update. Outer `None` leaves a field untouched,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UserProfilePatch {
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub avatar: Option<Option<String>>,
}

impl UserProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.avatar.is_none()
    }
}

impl User {
    pub fn create(new: NewUser) -> Result<Self, MarketplaceError> {
        Self::create_at(new, Utc::now())
    }

    pub fn create_at(new: NewUser, now: DateTime<Utc>) -> Result<Self, MarketplaceError> {
        let id = new.id.trim();
        if id.is_empty() {
            return Err(MarketplaceError::validation("User id is required"));
        }
        let email = new.email.as_deref().map(Email::parse).transpose()?;
        Ok(Self {
            id: id.to_owned(),
            email,
            role: new.role,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_profile(&mut self, patch: UserProfilePatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        self.touch();
    }

    pub fn update_email(&mut self, email: &str) -> Result<(), MarketplaceError> {
        self.email = Some(Email::parse(email)?);
        self.touch();
        Ok(())
    }

    pub fn change_role(&mut self, role: UserRole) {
        self.role = role;
        self.touch();
    }

    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (None, None) => None,
            (first, last) => Some(
                format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default())
                    .trim()
                    .to_owned(),
            ),
        }
    }

    pub fn is_pro(&self) -> bool {
        self.role == UserRole::Pro
    }

    pub fn is_client(&self) -> bool {
        self.role == UserRole::Client
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
