use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use booklin_core::serde::double_option;
use booklin_domain::email::Email;
use booklin_domain::user::UserRole;

use crate::domain::repository::UserFilter;
use crate::domain::user::{NewUser, User, UserProfilePatch};
use crate::error::MarketplaceError;
use crate::handlers::extract::{Json, Path};
use crate::handlers::validate::{self, MAX_NAME_LEN};
use crate::state::AppState;
use crate::usecase::user::UpdateUserInput;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    #[serde(serialize_with = "booklin_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "booklin_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            id: user.id,
            email: user.email.map(Email::into_inner),
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            avatar: user.avatar,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn parse_role(raw: Option<&str>) -> Result<Option<UserRole>, MarketplaceError> {
    Ok(raw.map(str::parse::<UserRole>).transpose()?)
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), MarketplaceError> {
    validate::opt_length("first_name", body.first_name.as_deref(), 1, MAX_NAME_LEN)?;
    validate::opt_length("last_name", body.last_name.as_deref(), 1, MAX_NAME_LEN)?;
    let role = parse_role(body.role.as_deref())?.unwrap_or(UserRole::Client);
    let user = state
        .user_service()
        .create(NewUser {
            id: body.id,
            email: body.email,
            role,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct UserListQuery {
    pub id: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<UserResponse>>, MarketplaceError> {
    let query: UserListQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| MarketplaceError::validation(format!("invalid query: {e}")))?
        .unwrap_or_default();
    let filter = UserFilter {
        id: query.id,
        email: query.email.as_deref().map(Email::parse).transpose()?,
        role: parse_role(query.role.as_deref())?,
    };
    let users = state.user_service().list(&filter).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, MarketplaceError> {
    let user = state.user_service().get(&id).await?;
    Ok(Json(user.into()))
}

// ── GET /users/email/{email} ─────────────────────────────────────────────────

pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, MarketplaceError> {
    let user = state
        .user_service()
        .find_by_email(&email)
        .await?
        .ok_or(MarketplaceError::UserNotFound)?;
    Ok(Json(user.into()))
}

// ── PATCH /users/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar: Option<Option<String>>,
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, MarketplaceError> {
    validate::opt_length(
        "first_name",
        validate::set_value(&body.first_name).map(String::as_str),
        1,
        MAX_NAME_LEN,
    )?;
    validate::opt_length(
        "last_name",
        validate::set_value(&body.last_name).map(String::as_str),
        1,
        MAX_NAME_LEN,
    )?;
    if let Some(avatar) = validate::set_value(&body.avatar) {
        validate::absolute_url("avatar", avatar)?;
    }
    let input = UpdateUserInput {
        email: body.email,
        role: parse_role(body.role.as_deref())?,
        profile: UserProfilePatch {
            first_name: body.first_name,
            last_name: body.last_name,
            phone: body.phone,
            avatar: body.avatar,
        },
    };
    let user = state.user_service().update(&id, input).await?;
    Ok(Json(user.into()))
}

// ── DELETE /users/{id} ───────────────────────────────────────────────────────

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, MarketplaceError> {
    let user = state.user_service().delete(&id).await?;
    Ok(Json(user.into()))
}
