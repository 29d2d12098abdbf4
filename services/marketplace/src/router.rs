use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use booklin_core::health::healthz;
use booklin_core::middleware::{cors_layer, propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    health::readyz,
    pro_profile::{
        activate_premium, advance_onboarding, approve_pro_profile, complete_onboarding,
        create_pro_profile, deactivate_premium, delete_pro_profile, get_pro_profile,
        get_pro_profile_by_user, list_pro_profiles, reject_pro_profile, renew_premium,
        reset_pro_profile_validation, update_pro_profile,
    },
    user::{create_user, delete_user, get_user, get_user_by_email, list_users, update_user},
    webhook::clerk_webhook,
};
use crate::state::AppState;

/// `allowed_origins` is the raw `ALLOWED_ORIGINS` value; no CORS layer when `None`.
pub fn build_router(state: AppState, allowed_origins: Option<&str>) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Webhooks
        .route("/webhooks/clerk", post(clerk_webhook))
        // Users
        .route("/users", post(create_user))
        .route("/users", get(list_users))
        .route("/users/email/{email}", get(get_user_by_email))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}", patch(update_user))
        .route("/users/{id}", delete(delete_user))
        // Pro profiles
        .route("/pro-profiles", post(create_pro_profile))
        .route("/pro-profiles", get(list_pro_profiles))
        .route("/pro-profiles/user/{user_id}", get(get_pro_profile_by_user))
        .route("/pro-profiles/{id}", get(get_pro_profile))
        .route("/pro-profiles/{id}", patch(update_pro_profile))
        .route("/pro-profiles/{id}", delete(delete_pro_profile))
        // Validation
        .route("/pro-profiles/{id}/approve", post(approve_pro_profile))
        .route("/pro-profiles/{id}/reject", post(reject_pro_profile))
        .route(
            "/pro-profiles/{id}/validation/reset",
            post(reset_pro_profile_validation),
        )
        // Onboarding
        .route("/pro-profiles/{id}/onboarding/advance", post(advance_onboarding))
        .route(
            "/pro-profiles/{id}/onboarding/complete",
            post(complete_onboarding),
        )
        // Premium
        .route("/pro-profiles/{id}/premium/activate", post(activate_premium))
        .route("/pro-profiles/{id}/premium/renew", post(renew_premium))
        .route(
            "/pro-profiles/{id}/premium/deactivate",
            post(deactivate_premium),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer());

    match allowed_origins {
        Some(origins) => router.layer(cors_layer(origins)),
        None => router,
    }
}
