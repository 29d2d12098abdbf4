use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use booklin_auth_types::identity::IdentityHeaders;
use booklin_core::serde::double_option;
use booklin_domain::pro_profile::{OnboardingStep, ValidationStatus};

use crate::domain::pro_profile::{
    BusinessInfoPatch, LegalInfoPatch, LocationPatch, NewProProfile, ProProfile,
};
use crate::domain::repository::ProProfileFilter;
use crate::error::MarketplaceError;
use crate::handlers::extract::{Json, Path};
use crate::handlers::validate::{
    self, MAX_ADDRESS_LEN, MAX_BIO_LEN, MAX_LABEL_LEN, MAX_NAME_LEN, MAX_POSTAL_CODE_LEN,
    MAX_PREMIUM_DAYS, MAX_RADIUS_KM, MAX_REASON_LEN, MAX_YEARS,
};
use crate::state::AppState;
use crate::usecase::pro_profile::UpdateProProfileInput;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProProfileResponse {
    pub id: Uuid,
    pub user_id: String,
    pub business_name: Option<String>,
    pub display_name: String,
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
    pub onboarding_step: OnboardingStep,
    pub onboarding_progress: u8,
    pub onboarding_complete: bool,
    pub is_onboarding_finished: bool,
    pub validation_status: ValidationStatus,
    pub rejection_reason: Option<String>,
    pub is_approved: bool,
    pub is_active: bool,
    pub is_publicly_visible: bool,
    pub photos: Vec<String>,
    pub is_premium: bool,
    pub is_premium_active: bool,
    #[serde(serialize_with = "booklin_core::serde::to_rfc3339_ms_opt")]
    pub subscription_end: Option<DateTime<Utc>>,
    pub remaining_premium_days: i64,
    pub rating: Option<f64>,
    pub review_count: i32,
    #[serde(serialize_with = "booklin_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "booklin_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<ProProfile> for ProProfileResponse {
    fn from(p: ProProfile) -> Self {
        let now = Utc::now();
        Self {
            display_name: p.display_name().to_owned(),
            is_onboarding_finished: p.is_onboarding_finished(),
            is_approved: p.is_approved(),
            is_publicly_visible: p.is_publicly_visible(),
            is_premium_active: p.is_premium_active_at(now),
            remaining_premium_days: p.remaining_premium_days_at(now),
            id: p.id,
            user_id: p.user_id,
            business_name: p.business_name,
            bio: p.bio,
            profession: p.profession,
            experience: p.experience,
            certifications: p.certifications,
            address: p.address,
            postal_code: p.postal_code,
            city: p.city,
            latitude: p.latitude,
            longitude: p.longitude,
            radius: p.radius,
            siret: p.siret.map(String::from),
            corporate_name: p.corporate_name,
            legal_form: p.legal_form,
            legal_status: p.legal_status,
            onboarding_step: p.onboarding_step,
            onboarding_progress: p.onboarding_progress,
            onboarding_complete: p.onboarding_complete,
            validation_status: p.validation_status,
            rejection_reason: p.rejection_reason,
            is_active: p.is_active,
            photos: p.photos,
            is_premium: p.is_premium,
            subscription_end: p.subscription_end,
            rating: p.rating,
            review_count: p.review_count,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

fn text(field: &Option<Option<String>>) -> Option<&str> {
    validate::set_value(field).map(String::as_str)
}

fn check_photos(photos: &[String]) -> Result<(), MarketplaceError> {
    photos
        .iter()
        .try_for_each(|url| validate::absolute_url("photos", url))
}

// ── POST /pro-profiles ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateProProfileRequest {
    pub business_name: Option<String>,
    pub bio: Option<String>,
    pub profession: Option<String>,
    pub experience: Option<i32>,
    #[serde(default)]
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
    #[serde(default)]
    pub photos: Vec<String>,
}

impl CreateProProfileRequest {
    fn validate(&self) -> Result<(), MarketplaceError> {
        validate::opt_length("business_name", self.business_name.as_deref(), 1, MAX_NAME_LEN)?;
        validate::opt_length("bio", self.bio.as_deref(), 0, MAX_BIO_LEN)?;
        validate::opt_length("profession", self.profession.as_deref(), 1, MAX_LABEL_LEN)?;
        validate::opt_range("experience", self.experience, 0, MAX_YEARS)?;
        validate::opt_length("address", self.address.as_deref(), 1, MAX_ADDRESS_LEN)?;
        validate::opt_length(
            "postal_code",
            self.postal_code.as_deref(),
            1,
            MAX_POSTAL_CODE_LEN,
        )?;
        validate::opt_length("city", self.city.as_deref(), 1, MAX_LABEL_LEN)?;
        validate::opt_range("radius", self.radius, 0, MAX_RADIUS_KM)?;
        validate::opt_length(
            "corporate_name",
            self.corporate_name.as_deref(),
            1,
            MAX_NAME_LEN,
        )?;
        validate::opt_length("legal_form", self.legal_form.as_deref(), 1, MAX_LABEL_LEN)?;
        validate::opt_length(
            "legal_status",
            self.legal_status.as_deref(),
            1,
            MAX_LABEL_LEN,
        )?;
        check_photos(&self.photos)
    }
}

pub async fn create_pro_profile(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Json(body): Json<CreateProProfileRequest>,
) -> Result<(StatusCode, Json<ProProfileResponse>), MarketplaceError> {
    body.validate()?;

    // Only clients may open a professional profile.
    let caller = match state.user_service().get(&identity.user_id).await {
        Ok(user) => user,
        Err(MarketplaceError::UserNotFound) => return Err(MarketplaceError::Forbidden),
        Err(e) => return Err(e),
    };
    if !caller.is_client() {
        return Err(MarketplaceError::Forbidden);
    }

    let profile = state
        .pro_profile_service()
        .create(NewProProfile {
            user_id: identity.user_id,
            business_name: body.business_name,
            bio: body.bio,
            profession: body.profession,
            experience: body.experience,
            certifications: body.certifications,
            address: body.address,
            postal_code: body.postal_code,
            city: body.city,
            latitude: body.latitude,
            longitude: body.longitude,
            radius: body.radius,
            siret: body.siret,
            corporate_name: body.corporate_name,
            legal_form: body.legal_form,
            legal_status: body.legal_status,
            photos: body.photos,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

// ── GET /pro-profiles ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ProProfileListQuery {
    pub profession: Option<String>,
    pub city: Option<String>,
    pub is_premium: Option<bool>,
    pub validation_status: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn list_pro_profiles(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<ProProfileResponse>>, MarketplaceError> {
    let query: ProProfileListQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| MarketplaceError::validation(format!("invalid query: {e}")))?
        .unwrap_or_default();
    let filter = ProProfileFilter {
        profession: query.profession,
        city: query.city,
        is_premium: query.is_premium,
        validation_status: query
            .validation_status
            .as_deref()
            .map(str::parse::<ValidationStatus>)
            .transpose()?,
        is_active: query.is_active,
    };
    let profiles = state.pro_profile_service().list(&filter).await?;
    Ok(Json(
        profiles.into_iter().map(ProProfileResponse::from).collect(),
    ))
}

// ── GET /pro-profiles/{id} ───────────────────────────────────────────────────

pub async fn get_pro_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    let profile = state.pro_profile_service().get(id).await?;
    Ok(Json(profile.into()))
}

// ── GET /pro-profiles/user/{user_id} ─────────────────────────────────────────

pub async fn get_pro_profile_by_user(
    State(state): State<AppState>,
    _identity: IdentityHeaders,
    Path(user_id): Path<String>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    let profile = state
        .pro_profile_service()
        .find_by_user_id(&user_id)
        .await?
        .ok_or(MarketplaceError::ProProfileNotFound)?;
    Ok(Json(profile.into()))
}

// ── PATCH /pro-profiles/{id} ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProProfileRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub business_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub profession: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub experience: Option<Option<i32>>,
    pub certifications: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub postal_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub radius: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub siret: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub corporate_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub legal_form: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub legal_status: Option<Option<String>>,
    pub photos: Option<Vec<String>>,
    pub onboarding_step: Option<String>,
}

impl UpdateProProfileRequest {
    fn validate(&self) -> Result<(), MarketplaceError> {
        validate::opt_length("business_name", text(&self.business_name), 1, MAX_NAME_LEN)?;
        validate::opt_length("bio", text(&self.bio), 0, MAX_BIO_LEN)?;
        validate::opt_length("profession", text(&self.profession), 1, MAX_LABEL_LEN)?;
        validate::opt_range(
            "experience",
            validate::set_value(&self.experience).copied(),
            0,
            MAX_YEARS,
        )?;
        validate::opt_length("address", text(&self.address), 1, MAX_ADDRESS_LEN)?;
        validate::opt_length("postal_code", text(&self.postal_code), 1, MAX_POSTAL_CODE_LEN)?;
        validate::opt_length("city", text(&self.city), 1, MAX_LABEL_LEN)?;
        validate::opt_range(
            "radius",
            validate::set_value(&self.radius).copied(),
            0,
            MAX_RADIUS_KM,
        )?;
        validate::opt_length("corporate_name", text(&self.corporate_name), 1, MAX_NAME_LEN)?;
        validate::opt_length("legal_form", text(&self.legal_form), 1, MAX_LABEL_LEN)?;
        validate::opt_length("legal_status", text(&self.legal_status), 1, MAX_LABEL_LEN)?;
        self.photos.as_deref().map_or(Ok(()), check_photos)
    }
}

impl TryFrom<UpdateProProfileRequest> for UpdateProProfileInput {
    type Error = MarketplaceError;

    fn try_from(body: UpdateProProfileRequest) -> Result<Self, Self::Error> {
        let onboarding_step = body
            .onboarding_step
            .as_deref()
            .map(str::parse::<OnboardingStep>)
            .transpose()?;
        Ok(Self {
            business: BusinessInfoPatch {
                business_name: body.business_name,
                bio: body.bio,
                profession: body.profession,
                experience: body.experience,
            },
            legal: LegalInfoPatch {
                siret: body.siret,
                corporate_name: body.corporate_name,
                legal_form: body.legal_form,
                legal_status: body.legal_status,
            },
            location: LocationPatch {
                address: body.address,
                postal_code: body.postal_code,
                city: body.city,
                latitude: body.latitude,
                longitude: body.longitude,
                radius: body.radius,
            },
            certifications: body.certifications,
            photos: body.photos,
            onboarding_step,
        })
    }
}

pub async fn update_pro_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProProfileRequest>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    body.validate()?;
    let input = UpdateProProfileInput::try_from(body)?;
    let profile = state.pro_profile_service().update(id, input).await?;
    Ok(Json(profile.into()))
}

// ── DELETE /pro-profiles/{id} ────────────────────────────────────────────────

pub async fn delete_pro_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    let profile = state.pro_profile_service().delete(id).await?;
    Ok(Json(profile.into()))
}

// ── Validation ───────────────────────────────────────────────────────────────

pub async fn approve_pro_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    let profile = state.pro_profile_service().approve(id).await?;
    Ok(Json(profile.into()))
}

#[derive(Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

pub async fn reject_pro_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    validate::length("reason", &body.reason, 1, MAX_REASON_LEN)?;
    let profile = state.pro_profile_service().reject(id, &body.reason).await?;
    Ok(Json(profile.into()))
}

pub async fn reset_pro_profile_validation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    let profile = state.pro_profile_service().reset_validation(id).await?;
    Ok(Json(profile.into()))
}

// ── Onboarding ───────────────────────────────────────────────────────────────

pub async fn advance_onboarding(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    let profile = state.pro_profile_service().advance_onboarding(id).await?;
    Ok(Json(profile.into()))
}

pub async fn complete_onboarding(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    let profile = state.pro_profile_service().complete_onboarding(id).await?;
    Ok(Json(profile.into()))
}

// ── Premium ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ActivatePremiumRequest {
    pub duration_in_days: i64,
}

pub async fn activate_premium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ActivatePremiumRequest>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    validate::range("duration_in_days", body.duration_in_days, 1, MAX_PREMIUM_DAYS)?;
    let profile = state
        .pro_profile_service()
        .activate_premium(id, body.duration_in_days)
        .await?;
    Ok(Json(profile.into()))
}

#[derive(Deserialize)]
pub struct RenewPremiumRequest {
    pub additional_days: i64,
}

pub async fn renew_premium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RenewPremiumRequest>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    validate::range("additional_days", body.additional_days, 1, MAX_PREMIUM_DAYS)?;
    let profile = state
        .pro_profile_service()
        .renew_premium(id, body.additional_days)
        .await?;
    Ok(Json(profile.into()))
}

pub async fn deactivate_premium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProProfileResponse>, MarketplaceError> {
    let profile = state.pro_profile_service().deactivate_premium(id).await?;
    Ok(Json(profile.into()))
}
