use axum::http::HeaderMap;
use chrono::{DateTime, Utc};

use booklin_domain::user::UserRole;
use booklin_marketplace::error::MarketplaceError;
use booklin_marketplace::infra::svix::SvixVerifier;
use booklin_marketplace::usecase::user::UserService;
use booklin_marketplace::usecase::webhook::{WebhookOutcome, WebhookService};

use crate::helpers::{
    MockUserRepo, MockWebhookEventRepo, signed_headers, signed_headers_at, test_user, user_event,
    verifier,
};

fn service(
    users: MockUserRepo,
    events: MockWebhookEventRepo,
) -> WebhookService<MockUserRepo, MockWebhookEventRepo, SvixVerifier> {
    WebhookService {
        users: UserService { repo: users },
        events,
        verifier: Some(verifier()),
    }
}

#[tokio::test]
async fn should_create_client_on_user_created() {
    let users = MockUserRepo::empty();
    let users_handle = users.users_handle();
    let events = MockWebhookEventRepo::empty();
    let processed = events.processed_handle();
    let svc = service(users, events);

    let body = user_event("user.created", "user_2abc", "Camille@Booklin.fr", "Camille");
    let outcome = svc
        .handle(&signed_headers("msg_1", &body), &body)
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Applied);
    let users = users_handle.lock().unwrap();
    assert_eq!(users.len(), 1);
    let user = &users[0];
    assert_eq!(user.id, "user_2abc");
    assert_eq!(user.role, UserRole::Client);
    assert_eq!(user.email.as_ref().unwrap().as_str(), "camille@booklin.fr");
    assert_eq!(user.first_name.as_deref(), Some("Camille"));
    assert_eq!(user.last_name, None, "empty provider names are stored as absent");
    assert_eq!(*processed.lock().unwrap(), vec!["msg_1".to_owned()]);
}

#[tokio::test]
async fn should_update_names_and_email_on_user_updated() {
    let existing = test_user("user_2abc", UserRole::Pro);
    let users = MockUserRepo::new(vec![existing]);
    let users_handle = users.users_handle();
    let svc = service(users, MockWebhookEventRepo::empty());

    let body = user_event("user.updated", "user_2abc", "new@booklin.fr", "Alex");
    let outcome = svc
        .handle(&signed_headers("msg_2", &body), &body)
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Applied);
    let users = users_handle.lock().unwrap();
    assert_eq!(users[0].email.as_ref().unwrap().as_str(), "new@booklin.fr");
    assert_eq!(users[0].first_name.as_deref(), Some("Alex"));
    assert_eq!(users[0].last_name, None);
    assert_eq!(users[0].role, UserRole::Pro, "role is not touched by sync");
}

#[tokio::test]
async fn should_delete_user_on_user_deleted() {
    let users = MockUserRepo::new(vec![test_user("user_2abc", UserRole::Client)]);
    let users_handle = users.users_handle();
    let svc = service(users, MockWebhookEventRepo::empty());

    let body = serde_json::json!({
        "type": "user.deleted",
        "data": { "id": "user_2abc", "deleted": true },
    })
    .to_string()
    .into_bytes();
    let outcome = svc
        .handle(&signed_headers("msg_3", &body), &body)
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Applied);
    assert!(users_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_apply_duplicate_delivery_once() {
    let users = MockUserRepo::empty();
    let writes = users.writes_handle();
    let svc = service(users, MockWebhookEventRepo::empty());

    let body = user_event("user.created", "user_2abc", "a@booklin.fr", "A");
    let headers = signed_headers("msg_dup", &body);
    let first = svc.handle(&headers, &body).await.unwrap();
    let second = svc.handle(&headers, &body).await.unwrap();

    assert_eq!(first, WebhookOutcome::Applied);
    assert_eq!(second, WebhookOutcome::Duplicate);
    assert_eq!(*writes.lock().unwrap(), 1);
}

#[tokio::test]
async fn should_settle_redelivered_create_for_existing_user() {
    let users = MockUserRepo::new(vec![test_user("user_2abc", UserRole::Client)]);
    let writes = users.writes_handle();
    let events = MockWebhookEventRepo::empty();
    let processed = events.processed_handle();
    let svc = service(users, events);

    let body = user_event("user.created", "user_2abc", "a@booklin.fr", "A");
    let headers = signed_headers("msg_1", &body);
    let first = svc.handle(&headers, &body).await;
    let second = svc.handle(&headers, &body).await.unwrap();

    assert!(
        matches!(first, Ok(WebhookOutcome::Applied)),
        "expected Applied, got {first:?}"
    );
    assert_eq!(second, WebhookOutcome::Duplicate);
    assert_eq!(*writes.lock().unwrap(), 0);
    assert_eq!(*processed.lock().unwrap(), vec!["msg_1".to_owned()]);
}

#[tokio::test]
async fn should_settle_redelivered_delete_for_missing_user() {
    let events = MockWebhookEventRepo::empty();
    let processed = events.processed_handle();
    let svc = service(MockUserRepo::empty(), events);

    let body = serde_json::json!({
        "type": "user.deleted",
        "data": { "id": "user_gone", "deleted": true },
    })
    .to_string()
    .into_bytes();
    let outcome = svc
        .handle(&signed_headers("msg_12", &body), &body)
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Applied);
    assert_eq!(*processed.lock().unwrap(), vec!["msg_12".to_owned()]);
}

#[tokio::test]
async fn should_ignore_unhandled_event_types() {
    let users = MockUserRepo::empty();
    let writes = users.writes_handle();
    let events = MockWebhookEventRepo::empty();
    let processed = events.processed_handle();
    let svc = service(users, events);

    let body = serde_json::json!({ "type": "session.created", "data": { "id": "sess_1" } })
        .to_string()
        .into_bytes();
    let outcome = svc
        .handle(&signed_headers("msg_4", &body), &body)
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Ignored);
    assert_eq!(*writes.lock().unwrap(), 0);
    assert_eq!(processed.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_tampered_body_without_touching_storage() {
    let users = MockUserRepo::empty();
    let writes = users.writes_handle();
    let events = MockWebhookEventRepo::empty();
    let processed = events.processed_handle();
    let svc = service(users, events);

    let signed = user_event("user.created", "user_2abc", "a@booklin.fr", "A");
    let tampered = user_event("user.created", "user_evil", "a@booklin.fr", "A");
    let result = svc.handle(&signed_headers("msg_5", &signed), &tampered).await;

    assert!(
        matches!(result, Err(MarketplaceError::InvalidWebhookSignature)),
        "expected InvalidWebhookSignature, got {result:?}"
    );
    assert_eq!(*writes.lock().unwrap(), 0);
    assert!(processed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_stale_timestamp() {
    let svc = service(MockUserRepo::empty(), MockWebhookEventRepo::empty());

    let body = user_event("user.created", "user_2abc", "a@booklin.fr", "A");
    let old = Utc::now().timestamp() - 301;
    let result = svc.handle(&signed_headers_at("msg_6", old, &body), &body).await;

    assert!(
        matches!(result, Err(MarketplaceError::StaleWebhook)),
        "expected StaleWebhook, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_timestamp_too_far_in_future() {
    let svc = service(MockUserRepo::empty(), MockWebhookEventRepo::empty());

    let body = user_event("user.created", "user_2abc", "a@booklin.fr", "A");
    let ahead = Utc::now().timestamp() + 600;
    let result = svc
        .handle(&signed_headers_at("msg_7", ahead, &body), &body)
        .await;

    assert!(matches!(result, Err(MarketplaceError::StaleWebhook)));
}

#[test]
fn should_enforce_tolerance_to_the_millisecond() {
    let svc = service(MockUserRepo::empty(), MockWebhookEventRepo::empty());

    let body = user_event("user.created", "user_2abc", "a@booklin.fr", "A");
    let signed_at = 1_700_000_000;
    let headers = signed_headers_at("msg_13", signed_at, &body);
    let at = |offset_ms: i64| {
        DateTime::from_timestamp_millis(signed_at * 1000 + offset_ms).unwrap()
    };

    assert!(svc.verify_at(&headers, &body, at(300_000)).is_ok());
    assert!(svc.verify_at(&headers, &body, at(-300_000)).is_ok());
    let result = svc.verify_at(&headers, &body, at(300_900));
    assert!(
        matches!(result, Err(MarketplaceError::StaleWebhook)),
        "expected StaleWebhook, got {result:?}"
    );
    assert!(matches!(
        svc.verify_at(&headers, &body, at(-300_001)),
        Err(MarketplaceError::StaleWebhook)
    ));
}

#[tokio::test]
async fn should_reject_missing_headers() {
    let svc = service(MockUserRepo::empty(), MockWebhookEventRepo::empty());

    let body = user_event("user.created", "user_2abc", "a@booklin.fr", "A");
    let mut headers = signed_headers("msg_8", &body);
    headers.remove("svix-signature");
    let result = svc.handle(&headers, &body).await;
    assert!(matches!(result, Err(MarketplaceError::MissingWebhookHeaders)));

    let result = svc.handle(&HeaderMap::new(), &body).await;
    assert!(matches!(result, Err(MarketplaceError::MissingWebhookHeaders)));
}

#[tokio::test]
async fn should_refuse_deliveries_without_secret() {
    let svc: WebhookService<MockUserRepo, MockWebhookEventRepo, SvixVerifier> = WebhookService {
        users: UserService {
            repo: MockUserRepo::empty(),
        },
        events: MockWebhookEventRepo::empty(),
        verifier: None,
    };

    let body = user_event("user.created", "user_2abc", "a@booklin.fr", "A");
    let result = svc.handle(&signed_headers("msg_9", &body), &body).await;

    assert!(matches!(result, Err(MarketplaceError::WebhookSecretMissing)));
}

#[tokio::test]
async fn should_reject_signed_but_malformed_payload() {
    let svc = service(MockUserRepo::empty(), MockWebhookEventRepo::empty());

    let body = br#"{"data":{}}"#.to_vec();
    let result = svc.handle(&signed_headers("msg_10", &body), &body).await;

    assert!(matches!(result, Err(MarketplaceError::Validation(_))));
}

#[tokio::test]
async fn should_accept_rotated_signature_list() {
    let svc = service(MockUserRepo::empty(), MockWebhookEventRepo::empty());

    let body = user_event("user.created", "user_2abc", "a@booklin.fr", "A");
    let mut headers = signed_headers("msg_11", &body);
    let valid = headers["svix-signature"].to_str().unwrap().to_owned();
    headers.insert(
        "svix-signature",
        format!("v1,b3V0ZGF0ZWQ= {valid}").parse().unwrap(),
    );

    let outcome = svc.handle(&headers, &body).await.unwrap();
    assert_eq!(outcome, WebhookOutcome::Applied);
}
