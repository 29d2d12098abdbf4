//! Routes exercised here fail or answer before any query runs, so the
//! router is served against a disconnected database.

use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use booklin_marketplace::infra::svix::SvixVerifier;
use booklin_marketplace::router::build_router;
use booklin_marketplace::state::AppState;
use booklin_testing::auth::MockAuth;

use crate::helpers::{signed_headers, signed_headers_at, user_event, verifier};

const PROFILE_ID: &str = "0190a3c4-5b6d-7e8f-9a0b-1c2d3e4f5a6b";

fn server_with(webhook_verifier: Option<SvixVerifier>) -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        webhook_verifier,
    };
    TestServer::new(build_router(state, Some("http://localhost:3000"))).unwrap()
}

fn server() -> TestServer {
    server_with(Some(verifier()))
}

fn assert_error(response: &TestResponse, status: StatusCode, kind: &str) {
    assert_eq!(response.status_code(), status);
    let body: Value = response.json();
    assert_eq!(body["kind"], kind, "unexpected body {body}");
}

async fn post_webhook(
    server: &TestServer,
    headers: axum::http::HeaderMap,
    body: Vec<u8>,
) -> TestResponse {
    let mut request = server.post("/webhooks/clerk").bytes(Bytes::from(body));
    for (name, value) in &headers {
        request = request.add_header(name.clone(), value.clone());
    }
    request.await
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_live_and_stamp_request_id() {
    let response = server().get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let response = server().get("/readyz").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

// ── Webhooks ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_webhook_without_svix_headers() {
    let body = user_event("user.created", "user_1", "a@booklin.fr", "A");
    let response = post_webhook(&server(), axum::http::HeaderMap::new(), body).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "MISSING_WEBHOOK_HEADERS");
}

#[tokio::test]
async fn should_reject_webhook_with_bad_signature() {
    let signed = user_event("user.created", "user_1", "a@booklin.fr", "A");
    let tampered = user_event("user.created", "user_2", "a@booklin.fr", "A");
    let response = post_webhook(&server(), signed_headers("msg_1", &signed), tampered).await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "INVALID_WEBHOOK_SIGNATURE");
}

#[tokio::test]
async fn should_reject_stale_webhook() {
    let body = user_event("user.created", "user_1", "a@booklin.fr", "A");
    let headers = signed_headers_at("msg_1", Utc::now().timestamp() - 3600, &body);
    let response = post_webhook(&server(), headers, body).await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "STALE_WEBHOOK");
}

#[tokio::test]
async fn should_fail_webhook_when_secret_is_not_configured() {
    let body = user_event("user.created", "user_1", "a@booklin.fr", "A");
    let response = post_webhook(&server_with(None), signed_headers("msg_1", &body), body).await;
    assert_error(
        &response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "WEBHOOK_SECRET_MISSING",
    );
}

// ── Users ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_user_with_invalid_email() {
    let response = server()
        .post("/users")
        .json(&json!({ "id": "user_1", "email": "nope" }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_unknown_role_filter() {
    let response = server().get("/users?role=ADMIN").await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_relative_avatar_url() {
    let response = server()
        .patch("/users/user_1")
        .json(&json!({ "avatar": "avatar.png" }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

// ── Pro profiles ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_identity_to_create_profile() {
    let response = server()
        .post("/pro-profiles")
        .json(&json!({ "business_name": "Atelier" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_validate_profile_body_before_loading_caller() {
    let (name, value): (HeaderName, HeaderValue) = MockAuth::new("user_1").header();
    let response = server()
        .post("/pro-profiles")
        .add_header(name, value)
        .json(&json!({ "experience": 150 }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_require_identity_to_read_profile_by_owner() {
    let response = server().get("/pro-profiles/user/user_1").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_relative_photo_urls() {
    let response = server()
        .patch(&format!("/pro-profiles/{PROFILE_ID}"))
        .json(&json!({ "photos": ["https://cdn.booklin.fr/1.jpg", "2.jpg"] }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_empty_rejection_reason() {
    let response = server()
        .post(&format!("/pro-profiles/{PROFILE_ID}/reject"))
        .json(&json!({ "reason": "" }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_premium_duration_out_of_range() {
    let server = server();
    let response = server
        .post(&format!("/pro-profiles/{PROFILE_ID}/premium/activate"))
        .json(&json!({ "duration_in_days": 0 }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

    let response = server
        .post(&format!("/pro-profiles/{PROFILE_ID}/premium/renew"))
        .json(&json!({ "additional_days": 3651 }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_unknown_validation_status_filter() {
    let response = server().get("/pro-profiles?validation-status=MAYBE").await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_unknown_onboarding_step() {
    let response = server()
        .patch(&format!("/pro-profiles/{PROFILE_ID}"))
        .json(&json!({ "onboarding_step": "FINISHED" }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_missing_rejection_reason() {
    let response = server()
        .post(&format!("/pro-profiles/{PROFILE_ID}/reject"))
        .json(&json!({}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_malformed_json_body() {
    let server = server();
    let response = server
        .post(&format!("/pro-profiles/{PROFILE_ID}/premium/activate"))
        .json(&json!({ "duration_in_days": "thirty" }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

    let response = server
        .post("/users")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{\"id\":"))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

    let response = server
        .post("/users")
        .text(r#"{"id":"user_1"}"#)
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_non_uuid_profile_id() {
    let response = server().get("/pro-profiles/not-a-uuid").await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}
