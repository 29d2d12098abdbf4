use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, sea_query::OnConflict,
};
use uuid::Uuid;

use booklin_domain::email::Email;
use booklin_domain::siret::Siret;
use booklin_marketplace_schema::{pro_profiles, processed_webhook_events, users};

use crate::domain::pro_profile::ProProfile;
use crate::domain::repository::{
    ProProfileFilter, ProProfileRepository, UserFilter, UserRepository, WebhookEventRepository,
};
use crate::domain::user::User;
use crate::domain::webhook::WebhookEvent;
use crate::error::MarketplaceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn create(&self, user: &User) -> Result<User, MarketplaceError> {
        let model = user_to_active_model(user)
            .insert(&self.db)
            .await
            .context("create user")?;
        user_from_model(model)
    }

    async fn update(&self, id: &str, user: &User) -> Result<User, MarketplaceError> {
        let mut am = user_to_active_model(user);
        am.id = Set(id.to_owned());
        let model = am.update(&self.db).await.context("update user")?;
        user_from_model(model)
    }

    async fn delete(&self, id: &str) -> Result<User, MarketplaceError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or(MarketplaceError::UserNotFound)?;
        users::Entity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, MarketplaceError> {
        let model = users::Entity::find_by_id(id.to_owned())
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, MarketplaceError> {
        // Stored lower-cased, so equality is case-insensitive.
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>, MarketplaceError> {
        let condition = Condition::all()
            .add_option(filter.id.as_deref().map(|id| users::Column::Id.eq(id)))
            .add_option(
                filter
                    .email
                    .as_ref()
                    .map(|e| users::Column::Email.eq(e.as_str())),
            )
            .add_option(filter.role.map(|r| users::Column::Role.eq(r.as_str())));
        let models = users::Entity::find()
            .filter(condition)
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }
}

fn user_to_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id.clone()),
        email: Set(user.email.as_ref().map(|e| e.as_str().to_owned())),
        role: Set(user.role.as_str().to_owned()),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        phone: Set(user.phone.clone()),
        avatar: Set(user.avatar.clone()),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

fn user_from_model(model: users::Model) -> Result<User, MarketplaceError> {
    Ok(User {
        email: model.email.as_deref().map(Email::parse).transpose()?,
        role: model.role.parse()?,
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        phone: model.phone,
        avatar: model.avatar,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── ProProfile repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProProfileRepository {
    pub db: DatabaseConnection,
}

impl ProProfileRepository for DbProProfileRepository {
    async fn create(&self, profile: &ProProfile) -> Result<ProProfile, MarketplaceError> {
        let model = pro_profile_to_active_model(profile)?
            .insert(&self.db)
            .await
            .context("create pro profile")?;
        pro_profile_from_model(model)
    }

    async fn update(&self, id: Uuid, profile: &ProProfile) -> Result<ProProfile, MarketplaceError> {
        let mut am = pro_profile_to_active_model(profile)?;
        am.id = Set(id);
        let model = am.update(&self.db).await.context("update pro profile")?;
        pro_profile_from_model(model)
    }

    async fn delete(&self, id: Uuid) -> Result<ProProfile, MarketplaceError> {
        let profile = self
            .find_by_id(id)
            .await?
            .ok_or(MarketplaceError::ProProfileNotFound)?;
        pro_profiles::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete pro profile")?;
        Ok(profile)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProProfile>, MarketplaceError> {
        let model = pro_profiles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find pro profile by id")?;
        model.map(pro_profile_from_model).transpose()
    }

    async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<ProProfile>, MarketplaceError> {
        let model = pro_profiles::Entity::find()
            .filter(pro_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find pro profile by user id")?;
        model.map(pro_profile_from_model).transpose()
    }

    async fn find_many(
        &self,
        filter: &ProProfileFilter,
    ) -> Result<Vec<ProProfile>, MarketplaceError> {
        use pro_profiles::Column;

        let condition = Condition::all()
            .add_option(filter.profession.as_deref().map(|p| Column::Profession.eq(p)))
            .add_option(filter.city.as_deref().map(|c| Column::City.eq(c)))
            .add_option(filter.is_premium.map(|p| Column::IsPremium.eq(p)))
            .add_option(
                filter
                    .validation_status
                    .map(|s| Column::ValidationStatus.eq(s.as_str())),
            )
            .add_option(filter.is_active.map(|a| Column::IsActive.eq(a)));
        let models = pro_profiles::Entity::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list pro profiles")?;
        models.into_iter().map(pro_profile_from_model).collect()
    }
}

fn pro_profile_to_active_model(
    profile: &ProProfile,
) -> Result<pro_profiles::ActiveModel, MarketplaceError> {
    let certifications =
        serde_json::to_value(&profile.certifications).context("encode certifications")?;
    let photos = serde_json::to_value(&profile.photos).context("encode photos")?;
    Ok(pro_profiles::ActiveModel {
        id: Set(profile.id),
        user_id: Set(profile.user_id.clone()),
        business_name: Set(profile.business_name.clone()),
        bio: Set(profile.bio.clone()),
        profession: Set(profile.profession.clone()),
        experience: Set(profile.experience),
        certifications: Set(certifications),
        address: Set(profile.address.clone()),
        postal_code: Set(profile.postal_code.clone()),
        city: Set(profile.city.clone()),
        latitude: Set(profile.latitude),
        longitude: Set(profile.longitude),
        radius: Set(profile.radius),
        siret: Set(profile.siret.as_ref().map(|s| s.as_str().to_owned())),
        corporate_name: Set(profile.corporate_name.clone()),
        legal_form: Set(profile.legal_form.clone()),
        legal_status: Set(profile.legal_status.clone()),
        onboarding_step: Set(profile.onboarding_step.as_str().to_owned()),
        onboarding_progress: Set(i16::from(profile.onboarding_progress)),
        onboarding_complete: Set(profile.onboarding_complete),
        validation_status: Set(profile.validation_status.as_str().to_owned()),
        rejection_reason: Set(profile.rejection_reason.clone()),
        is_active: Set(profile.is_active),
        photos: Set(photos),
        is_premium: Set(profile.is_premium),
        subscription_end: Set(profile.subscription_end),
        rating: Set(profile.rating),
        review_count: Set(profile.review_count),
        created_at: Set(profile.created_at),
        updated_at: Set(profile.updated_at),
    })
}

fn pro_profile_from_model(model: pro_profiles::Model) -> Result<ProProfile, MarketplaceError> {
    let certifications: Vec<String> =
        serde_json::from_value(model.certifications).context("decode certifications")?;
    let photos: Vec<String> = serde_json::from_value(model.photos).context("decode photos")?;
    let onboarding_progress =
        u8::try_from(model.onboarding_progress).context("decode onboarding progress")?;
    Ok(ProProfile {
        id: model.id,
        user_id: model.user_id,
        business_name: model.business_name,
        bio: model.bio,
        profession: model.profession,
        experience: model.experience,
        certifications,
        address: model.address,
        postal_code: model.postal_code,
        city: model.city,
        latitude: model.latitude,
        longitude: model.longitude,
        radius: model.radius,
        siret: model.siret.as_deref().map(Siret::parse).transpose()?,
        corporate_name: model.corporate_name,
        legal_form: model.legal_form,
        legal_status: model.legal_status,
        onboarding_step: model.onboarding_step.parse()?,
        onboarding_progress,
        onboarding_complete: model.onboarding_complete,
        validation_status: model.validation_status.parse()?,
        rejection_reason: model.rejection_reason,
        is_active: model.is_active,
        photos,
        is_premium: model.is_premium,
        subscription_end: model.subscription_end,
        rating: model.rating,
        review_count: model.review_count,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Webhook event repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWebhookEventRepository {
    pub db: DatabaseConnection,
}

impl WebhookEventRepository for DbWebhookEventRepository {
    async fn is_processed(&self, event_id: &str) -> Result<bool, MarketplaceError> {
        let model = processed_webhook_events::Entity::find_by_id(event_id.to_owned())
            .one(&self.db)
            .await
            .context("find processed webhook event")?;
        Ok(model.is_some())
    }

    async fn mark_processed(&self, event: &WebhookEvent) -> Result<(), MarketplaceError> {
        let am = processed_webhook_events::ActiveModel {
            id: Set(event.id.clone()),
            kind: Set(event.kind.as_str().to_owned()),
            processed_at: Set(Utc::now()),
        };
        processed_webhook_events::Entity::insert(am)
            .on_conflict(
                OnConflict::column(processed_webhook_events::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("mark webhook event processed")?;
        Ok(())
    }
}
