use uuid::Uuid;

use booklin_domain::pro_profile::OnboardingStep;

use crate::domain::pro_profile::{
    BusinessInfoPatch, LegalInfoPatch, LocationPatch, NewProProfile, ProProfile,
};
use crate::domain::repository::{ProProfileFilter, ProProfileRepository};
use crate::error::MarketplaceError;

/// Field groups of a profile update. Each group is applied only when it
/// carries at least one change.
#[derive(Debug, Clone, Default)]
pub struct UpdateProProfileInput {
    pub business: BusinessInfoPatch,
    pub legal: LegalInfoPatch,
    pub location: LocationPatch,
    pub certifications: Option<Vec<String>>,
    pub photos: Option<Vec<String>>,
    pub onboarding_step: Option<OnboardingStep>,
}

pub struct ProProfileService<R: ProProfileRepository> {
    pub repo: R,
}

impl<R: ProProfileRepository> ProProfileService<R> {
    /// Load, apply `f`, persist. Nothing is written when `f` fails.
    async fn mutate<F>(&self, id: Uuid, f: F) -> Result<ProProfile, MarketplaceError>
    where
        F: FnOnce(&mut ProProfile) -> Result<(), MarketplaceError>,
    {
        let mut profile = self.get(id).await?;
        f(&mut profile)?;
        self.repo.update(id, &profile).await
    }

    // ── Create ───────────────────────────────────────────────────────────────

    pub async fn create(&self, input: NewProProfile) -> Result<ProProfile, MarketplaceError> {
        if self.repo.find_by_user_id(&input.user_id).await?.is_some() {
            return Err(MarketplaceError::ProProfileAlreadyExists);
        }
        let profile = ProProfile::create(input)?;
        self.repo.create(&profile).await
    }

    // ── Update ───────────────────────────────────────────────────────────────

    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProProfileInput,
    ) -> Result<ProProfile, MarketplaceError> {
        self.mutate(id, |profile| {
            if !input.business.is_empty() {
                profile.update_business_info(input.business)?;
            }
            if !input.legal.is_empty() {
                profile.update_legal_info(input.legal)?;
            }
            if !input.location.is_empty() {
                profile.update_location(input.location)?;
            }
            if let Some(certifications) = input.certifications {
                profile.set_certifications(certifications);
            }
            if let Some(photos) = input.photos {
                profile.set_photos(photos);
            }
            if let Some(step) = input.onboarding_step {
                profile.set_onboarding_step(step);
            }
            Ok(())
        })
        .await
    }

    // ── Delete ───────────────────────────────────────────────────────────────

    pub async fn delete(&self, id: Uuid) -> Result<ProProfile, MarketplaceError> {
        self.get(id).await?;
        self.repo.delete(id).await
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub async fn get(&self, id: Uuid) -> Result<ProProfile, MarketplaceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(MarketplaceError::ProProfileNotFound)
    }

    pub async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<ProProfile>, MarketplaceError> {
        self.repo.find_by_user_id(user_id).await
    }

    pub async fn list(
        &self,
        filter: &ProProfileFilter,
    ) -> Result<Vec<ProProfile>, MarketplaceError> {
        self.repo.find_many(filter).await
    }

    // ── Validation ───────────────────────────────────────────────────────────

    pub async fn approve(&self, id: Uuid) -> Result<ProProfile, MarketplaceError> {
        self.mutate(id, ProProfile::approve).await
    }

    pub async fn reject(&self, id: Uuid, reason: &str) -> Result<ProProfile, MarketplaceError> {
        self.mutate(id, |p| p.reject(reason)).await
    }

    pub async fn reset_validation(&self, id: Uuid) -> Result<ProProfile, MarketplaceError> {
        self.mutate(id, |p| {
            p.reset_validation();
            Ok(())
        })
        .await
    }

    // ── Onboarding ───────────────────────────────────────────────────────────

    pub async fn advance_onboarding(&self, id: Uuid) -> Result<ProProfile, MarketplaceError> {
        self.mutate(id, ProProfile::advance_onboarding_step).await
    }

    pub async fn complete_onboarding(&self, id: Uuid) -> Result<ProProfile, MarketplaceError> {
        self.mutate(id, |p| {
            p.complete_onboarding();
            Ok(())
        })
        .await
    }

    // ── Premium ──────────────────────────────────────────────────────────────

    pub async fn activate_premium(
        &self,
        id: Uuid,
        duration_in_days: i64,
    ) -> Result<ProProfile, MarketplaceError> {
        self.mutate(id, |p| p.activate_premium(duration_in_days))
            .await
    }

    pub async fn renew_premium(
        &self,
        id: Uuid,
        additional_days: i64,
    ) -> Result<ProProfile, MarketplaceError> {
        self.mutate(id, |p| p.renew_premium(additional_days)).await
    }

    pub async fn deactivate_premium(&self, id: Uuid) -> Result<ProProfile, MarketplaceError> {
        self.mutate(id, |p| {
            p.deactivate_premium();
            Ok(())
        })
        .await
    }
}
