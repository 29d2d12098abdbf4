//! Professional profile entity and its three lifecycles: onboarding,
//! admin validation and premium subscription.
//!
//! Every mutator either applies fully and bumps `updated_at`, or returns
//! [`MarketplaceError::Validation`] without touching the profile.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use booklin_domain::pro_profile::{OnboardingStep, ValidationStatus};
use booklin_domain::siret::Siret;

use crate::error::MarketplaceError;

const MS_PER_DAY: i64 = 86_400_000;
const GOOD_RATING: f64 = 4.0;
const EXCELLENT_RATING: f64 = 4.5;
const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ProProfile {
    pub id: Uuid,
    pub user_id: String,
    // business
    pub business_name: Option<String>,
    pub bio: Option<String>,
    pub profession: Option<String>,
    pub experience: Option<i32>,
    pub certifications: Vec<String>,
    // location
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<i32>,
    // legal
    pub siret: Option<Siret>,
    pub corporate_name: Option<String>,
    pub legal_form: Option<String>,
    pub legal_status: Option<String>,
    // onboarding
    pub onboarding_step: OnboardingStep,
    pub onboarding_progress: u8,
    pub onboarding_complete: bool,
    // validation
    pub validation_status: ValidationStatus,
    pub rejection_reason: Option<String>,
    pub is_active: bool,
    pub photos: Vec<String>,
    // premium
    pub is_premium: bool,
    pub subscription_end: Option<DateTime<Utc>>,
    // reviews
    pub rating: Option<f64>,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when a profile is first created. Everything but the
/// owner is optional.
#[derive(Debug, Clone, Default)]
pub struct NewProProfile {
    pub user_id: String,
    pub business_name: Option<String>,
    pub bio: Option<String>,
    pub profession: Option<String>,
    pub experience: Option<i32>,
    pub certifications: Vec<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<i32>,
    pub siret: Option<String>,
    pub corporate_name: Option<String>,
    pub legal_form: Option<String>,
    pub legal_status: Option<String>,
    pub photos: Vec<String>,
}

// Patches: outer `None` = untouched, `Some(None)` = cleared.

#[derive(Debug, Clone, Default)]
pub struct BusinessInfoPatch {
    pub business_name: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub profession: Option<Option<String>>,
    pub experience: Option<Option<i32>>,
}

impl BusinessInfoPatch {
    pub fn is_empty(&self) -> bool {
        self.business_name.is_none()
            && self.bio.is_none()
            && self.profession.is_none()
            && self.experience.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LegalInfoPatch {
    pub siret: Option<Option<String>>,
    pub corporate_name: Option<Option<String>>,
    pub legal_form: Option<Option<String>>,
    pub legal_status: Option<Option<String>>,
}

impl LegalInfoPatch {
    pub fn is_empty(&self) -> bool {
        self.siret.is_none()
            && self.corporate_name.is_none()
            && self.legal_form.is_none()
            && self.legal_status.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationPatch {
    pub address: Option<Option<String>>,
    pub postal_code: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub radius: Option<Option<i32>>,
}

impl LocationPatch {
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.radius.is_none()
    }
}

fn check_experience(experience: Option<i32>) -> Result<(), MarketplaceError> {
    match experience {
        Some(e) if e < 0 => Err(MarketplaceError::validation(
            "Experience cannot be negative",
        )),
        _ => Ok(()),
    }
}

fn check_radius(radius: Option<i32>) -> Result<(), MarketplaceError> {
    match radius {
        Some(r) if r < 0 => Err(MarketplaceError::validation("Radius cannot be negative")),
        _ => Ok(()),
    }
}

fn check_latitude(latitude: Option<f64>) -> Result<(), MarketplaceError> {
    match latitude {
        Some(lat) if !(-90.0..=90.0).contains(&lat) => Err(MarketplaceError::validation(
            "Latitude must be between -90 and 90",
        )),
        _ => Ok(()),
    }
}

fn check_longitude(longitude: Option<f64>) -> Result<(), MarketplaceError> {
    match longitude {
        Some(lon) if !(-180.0..=180.0).contains(&lon) => Err(MarketplaceError::validation(
            "Longitude must be between -180 and 180",
        )),
        _ => Ok(()),
    }
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|v| !v.trim().is_empty()).collect()
}

fn push_unique(
    list: &mut Vec<String>,
    value: &str,
    empty_msg: &'static str,
    duplicate_msg: &'static str,
) -> Result<(), MarketplaceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MarketplaceError::validation(empty_msg));
    }
    if list.iter().any(|v| v == trimmed) {
        return Err(MarketplaceError::validation(duplicate_msg));
    }
    list.push(trimmed.to_owned());
    Ok(())
}

fn remove_exact(
    list: &mut Vec<String>,
    value: &str,
    missing_msg: &'static str,
) -> Result<(), MarketplaceError> {
    let index = list
        .iter()
        .position(|v| v == value)
        .ok_or_else(|| MarketplaceError::validation(missing_msg))?;
    list.remove(index);
    Ok(())
}

impl ProProfile {
    pub fn create(new: NewProProfile) -> Result<Self, MarketplaceError> {
        Self::create_at(new, Utc::now())
    }

    pub fn create_at(new: NewProProfile, now: DateTime<Utc>) -> Result<Self, MarketplaceError> {
        if new.user_id.trim().is_empty() {
            return Err(MarketplaceError::validation("User ID is required"));
        }
        check_experience(new.experience)?;
        check_radius(new.radius)?;
        check_latitude(new.latitude)?;
        check_longitude(new.longitude)?;
        let siret = new.siret.as_deref().map(Siret::parse).transpose()?;

        Ok(Self {
            id: Uuid::now_v7(),
            user_id: new.user_id,
            business_name: new.business_name,
            bio: new.bio,
            profession: new.profession,
            experience: new.experience,
            certifications: non_blank(new.certifications),
            address: new.address,
            postal_code: new.postal_code,
            city: new.city,
            latitude: new.latitude,
            longitude: new.longitude,
            radius: new.radius,
            siret,
            corporate_name: new.corporate_name,
            legal_form: new.legal_form,
            legal_status: new.legal_status,
            onboarding_step: OnboardingStep::FIRST,
            onboarding_progress: 0,
            onboarding_complete: false,
            validation_status: ValidationStatus::Pending,
            rejection_reason: None,
            is_active: false,
            photos: non_blank(new.photos),
            is_premium: false,
            subscription_end: None,
            rating: None,
            review_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // ── Onboarding ───────────────────────────────────────────────────────────

    pub fn advance_onboarding_step(&mut self) -> Result<(), MarketplaceError> {
        let next = self
            .onboarding_step
            .next()
            .ok_or_else(|| MarketplaceError::validation("Already at final onboarding step"))?;
        self.onboarding_step = next;
        self.onboarding_progress = next.progress();
        if next.is_terminal() {
            self.onboarding_complete = true;
        }
        self.touch();
        Ok(())
    }

    /// Jump to any step. Landing anywhere but `COMPLETED` clears the
    /// completion flag so step and flag stay consistent.
    pub fn set_onboarding_step(&mut self, step: OnboardingStep) {
        self.onboarding_step = step;
        self.onboarding_progress = step.progress();
        self.onboarding_complete = step.is_terminal();
        self.touch();
    }

    pub fn complete_onboarding(&mut self) {
        self.onboarding_step = OnboardingStep::Completed;
        self.onboarding_progress = 100;
        self.onboarding_complete = true;
        self.touch();
    }

    pub fn is_onboarding_finished(&self) -> bool {
        self.onboarding_complete || self.onboarding_step.is_terminal()
    }

    // ── Validation ───────────────────────────────────────────────────────────

    pub fn approve(&mut self) -> Result<(), MarketplaceError> {
        if self.is_approved() {
            return Err(MarketplaceError::validation("Profile already approved"));
        }
        if !self.is_onboarding_finished() {
            return Err(MarketplaceError::validation(
                "Cannot approve profile: onboarding not complete",
            ));
        }
        self.validation_status = ValidationStatus::Approved;
        self.rejection_reason = None;
        self.is_active = true;
        self.touch();
        Ok(())
    }

    pub fn reject(&mut self, reason: &str) -> Result<(), MarketplaceError> {
        if reason.trim().is_empty() {
            return Err(MarketplaceError::validation("Rejection reason is required"));
        }
        if self.is_rejected() {
            return Err(MarketplaceError::validation("Profile already rejected"));
        }
        self.validation_status = ValidationStatus::Rejected;
        self.rejection_reason = Some(reason.to_owned());
        self.is_active = false;
        self.touch();
        Ok(())
    }

    pub fn reset_validation(&mut self) {
        self.validation_status = ValidationStatus::Pending;
        self.rejection_reason = None;
        self.is_active = false;
        self.touch();
    }

    pub fn is_approved(&self) -> bool {
        self.validation_status == ValidationStatus::Approved
    }

    pub fn is_rejected(&self) -> bool {
        self.validation_status == ValidationStatus::Rejected
    }

    pub fn is_publicly_visible(&self) -> bool {
        self.is_approved() && self.is_active
    }

    pub fn activate(&mut self) -> Result<(), MarketplaceError> {
        if !self.is_approved() {
            return Err(MarketplaceError::validation(
                "Cannot activate: profile not approved",
            ));
        }
        self.is_active = true;
        self.touch();
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    // ── Premium ──────────────────────────────────────────────────────────────

    pub fn activate_premium(&mut self, duration_in_days: i64) -> Result<(), MarketplaceError> {
        self.activate_premium_at(duration_in_days, Utc::now())
    }

    pub fn activate_premium_at(
        &mut self,
        duration_in_days: i64,
        now: DateTime<Utc>,
    ) -> Result<(), MarketplaceError> {
        if duration_in_days <= 0 {
            return Err(MarketplaceError::validation("Duration must be positive"));
        }
        let end = add_days(now, duration_in_days)?;
        self.is_premium = true;
        self.subscription_end = Some(end);
        self.touch();
        Ok(())
    }

    pub fn is_premium_active(&self) -> bool {
        self.is_premium_active_at(Utc::now())
    }

    pub fn is_premium_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_premium && self.subscription_end.is_some_and(|end| end > now)
    }

    pub fn deactivate_premium(&mut self) {
        self.is_premium = false;
        self.subscription_end = None;
        self.touch();
    }

    pub fn renew_premium(&mut self, additional_days: i64) -> Result<(), MarketplaceError> {
        self.renew_premium_at(additional_days, Utc::now())
    }

    /// Extends an active subscription; an expired or absent one restarts
    /// from `now`.
    pub fn renew_premium_at(
        &mut self,
        additional_days: i64,
        now: DateTime<Utc>,
    ) -> Result<(), MarketplaceError> {
        if additional_days <= 0 {
            return Err(MarketplaceError::validation(
                "Additional days must be positive",
            ));
        }
        match self.subscription_end {
            Some(end) if self.is_premium_active_at(now) => {
                self.subscription_end = Some(add_days(end, additional_days)?);
                self.touch();
                Ok(())
            }
            _ => self.activate_premium_at(additional_days, now),
        }
    }

    pub fn remaining_premium_days(&self) -> i64 {
        self.remaining_premium_days_at(Utc::now())
    }

    pub fn remaining_premium_days_at(&self, now: DateTime<Utc>) -> i64 {
        match self.subscription_end {
            Some(end) if self.is_premium_active_at(now) => {
                let ms = (end - now).num_milliseconds();
                // ceil for positive ms
                ((ms + MS_PER_DAY - 1) / MS_PER_DAY).max(0)
            }
            _ => 0,
        }
    }

    // ── Profile groups ───────────────────────────────────────────────────────

    pub fn update_business_info(&mut self, patch: BusinessInfoPatch) -> Result<(), MarketplaceError> {
        if let Some(experience) = patch.experience {
            check_experience(experience)?;
        }
        if let Some(business_name) = patch.business_name {
            self.business_name = business_name;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(profession) = patch.profession {
            self.profession = profession;
        }
        if let Some(experience) = patch.experience {
            self.experience = experience;
        }
        self.touch();
        Ok(())
    }

    pub fn update_legal_info(&mut self, patch: LegalInfoPatch) -> Result<(), MarketplaceError> {
        let siret = patch
            .siret
            .map(|s| s.as_deref().map(Siret::parse).transpose())
            .transpose()?;
        if let Some(siret) = siret {
            self.siret = siret;
        }
        if let Some(corporate_name) = patch.corporate_name {
            self.corporate_name = corporate_name;
        }
        if let Some(legal_form) = patch.legal_form {
            self.legal_form = legal_form;
        }
        if let Some(legal_status) = patch.legal_status {
            self.legal_status = legal_status;
        }
        self.touch();
        Ok(())
    }

    pub fn update_location(&mut self, patch: LocationPatch) -> Result<(), MarketplaceError> {
        if let Some(latitude) = patch.latitude {
            check_latitude(latitude)?;
        }
        if let Some(longitude) = patch.longitude {
            check_longitude(longitude)?;
        }
        if let Some(radius) = patch.radius {
            check_radius(radius)?;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(postal_code) = patch.postal_code {
            self.postal_code = postal_code;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if let Some(radius) = patch.radius {
            self.radius = radius;
        }
        self.touch();
        Ok(())
    }

    pub fn has_complete_location(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.address)
            && filled(&self.postal_code)
            && filled(&self.city)
            && self.latitude.is_some()
            && self.longitude.is_some()
    }

    // ── Certifications & photos ──────────────────────────────────────────────

    pub fn add_certification(&mut self, certification: &str) -> Result<(), MarketplaceError> {
        push_unique(
            &mut self.certifications,
            certification,
            "Certification cannot be empty",
            "Certification already exists",
        )?;
        self.touch();
        Ok(())
    }

    pub fn remove_certification(&mut self, certification: &str) -> Result<(), MarketplaceError> {
        remove_exact(
            &mut self.certifications,
            certification,
            "Certification not found",
        )?;
        self.touch();
        Ok(())
    }

    pub fn set_certifications(&mut self, certifications: Vec<String>) {
        self.certifications = non_blank(certifications);
        self.touch();
    }

    pub fn add_photo(&mut self, photo_url: &str) -> Result<(), MarketplaceError> {
        push_unique(
            &mut self.photos,
            photo_url,
            "Photo URL cannot be empty",
            "Photo already exists",
        )?;
        self.touch();
        Ok(())
    }

    pub fn remove_photo(&mut self, photo_url: &str) -> Result<(), MarketplaceError> {
        remove_exact(&mut self.photos, photo_url, "Photo not found")?;
        self.touch();
        Ok(())
    }

    pub fn set_photos(&mut self, photo_urls: Vec<String>) {
        self.photos = non_blank(photo_urls);
        self.touch();
    }

    pub fn has_photos(&self) -> bool {
        !self.photos.is_empty()
    }

    // ── Reviews ──────────────────────────────────────────────────────────────

    /// Replace the rating aggregate. The score is rounded to one decimal
    /// and dropped when there are no reviews.
    pub fn update_rating(&mut self, rating: f64, review_count: i32) -> Result<(), MarketplaceError> {
        if !(0.0..=MAX_RATING).contains(&rating) {
            return Err(MarketplaceError::validation("Rating must be between 0 and 5"));
        }
        if review_count < 0 {
            return Err(MarketplaceError::validation(
                "Review count cannot be negative",
            ));
        }
        self.rating = (review_count > 0).then(|| (rating * 10.0).round() / 10.0);
        self.review_count = review_count;
        self.touch();
        Ok(())
    }

    pub fn has_reviews(&self) -> bool {
        self.review_count > 0
    }

    pub fn has_good_rating(&self) -> bool {
        self.rating.is_some_and(|r| r >= GOOD_RATING)
    }

    pub fn has_excellent_rating(&self) -> bool {
        self.rating.is_some_and(|r| r >= EXCELLENT_RATING)
    }

    // ── Summary ──────────────────────────────────────────────────────────────

    /// Ready for admin review.
    pub fn is_complete(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        self.is_onboarding_finished()
            && filled(&self.business_name)
            && filled(&self.profession)
            && self.has_complete_location()
            && self.siret.is_some()
    }

    pub fn display_name(&self) -> &str {
        match self.business_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Professional",
        }
    }
}

fn add_days(from: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, MarketplaceError> {
    Duration::try_days(days)
        .and_then(|span| from.checked_add_signed(span))
        .ok_or_else(|| MarketplaceError::validation("Subscription end is out of range"))
}
