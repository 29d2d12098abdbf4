use booklin_domain::user::UserRole;
use booklin_marketplace::domain::repository::UserFilter;
use booklin_marketplace::domain::user::{NewUser, UserProfilePatch};
use booklin_marketplace::error::MarketplaceError;
use booklin_marketplace::usecase::user::{UpdateUserInput, UserService};

use crate::helpers::{MockUserRepo, test_user};

#[tokio::test]
async fn should_reject_invalid_email_before_repository_access() {
    let repo = MockUserRepo::empty();
    let writes = repo.writes_handle();
    let svc = UserService { repo };

    let result = svc
        .create(NewUser {
            id: "user_1".to_owned(),
            email: Some("not-an-email".to_owned()),
            role: UserRole::Client,
            first_name: None,
            last_name: None,
        })
        .await;

    assert!(
        matches!(result, Err(MarketplaceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
    assert_eq!(*writes.lock().unwrap(), 0);
}

#[tokio::test]
async fn should_reject_taken_user_id() {
    let svc = UserService {
        repo: MockUserRepo::new(vec![test_user("user_1", UserRole::Client)]),
    };

    let result = svc
        .create(NewUser {
            id: "user_1".to_owned(),
            email: None,
            role: UserRole::Client,
            first_name: None,
            last_name: None,
        })
        .await;

    assert!(matches!(result, Err(MarketplaceError::UserAlreadyExists)));
}

#[tokio::test]
async fn should_find_user_by_email_case_insensitively() {
    let svc = UserService {
        repo: MockUserRepo::new(vec![test_user("user_1", UserRole::Client)]),
    };

    let found = svc.find_by_email("  USER_1@Booklin.FR ").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some("user_1".to_owned()));
}

#[tokio::test]
async fn should_promote_client_and_clear_phone() {
    let mut user = test_user("user_1", UserRole::Client);
    user.phone = Some("+33600000000".to_owned());
    let repo = MockUserRepo::new(vec![user]);
    let users = repo.users_handle();
    let svc = UserService { repo };

    let updated = svc
        .update(
            "user_1",
            UpdateUserInput {
                email: None,
                role: Some(UserRole::Pro),
                profile: UserProfilePatch {
                    phone: Some(None),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();

    assert!(updated.is_pro());
    assert_eq!(updated.phone, None);
    assert_eq!(users.lock().unwrap()[0], updated);
}

#[tokio::test]
async fn should_list_users_by_role() {
    let svc = UserService {
        repo: MockUserRepo::new(vec![
            test_user("user_1", UserRole::Client),
            test_user("user_2", UserRole::Pro),
            test_user("user_3", UserRole::Client),
        ]),
    };

    let clients = svc
        .list(&UserFilter {
            role: Some(UserRole::Client),
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<_> = clients.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["user_1", "user_3"]);
}

#[tokio::test]
async fn should_return_deleted_user() {
    let repo = MockUserRepo::new(vec![test_user("user_1", UserRole::Client)]);
    let users = repo.users_handle();
    let svc = UserService { repo };

    let deleted = svc.delete("user_1").await.unwrap();
    assert_eq!(deleted.id, "user_1");
    assert!(users.lock().unwrap().is_empty());
    assert!(matches!(
        svc.delete("user_1").await,
        Err(MarketplaceError::UserNotFound)
    ));
}
