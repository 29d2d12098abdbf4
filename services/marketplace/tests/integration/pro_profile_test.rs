use booklin_domain::pro_profile::{OnboardingStep, ValidationStatus};
use booklin_marketplace::domain::pro_profile::{BusinessInfoPatch, LocationPatch, NewProProfile};
use booklin_marketplace::domain::repository::ProProfileFilter;
use booklin_marketplace::error::MarketplaceError;
use booklin_marketplace::usecase::pro_profile::{ProProfileService, UpdateProProfileInput};

use crate::helpers::MockProProfileRepo;

fn new_profile(user_id: &str) -> NewProProfile {
    NewProProfile {
        user_id: user_id.to_owned(),
        business_name: Some("Atelier Durand".to_owned()),
        profession: Some("Plombier".to_owned()),
        city: Some("Lyon".to_owned()),
        ..Default::default()
    }
}

#[tokio::test]
async fn should_walk_profile_from_onboarding_to_premium() {
    let repo = MockProProfileRepo::empty();
    let profiles = repo.profiles_handle();
    let svc = ProProfileService { repo };

    let profile = svc.create(new_profile("user_1")).await.unwrap();
    assert_eq!(profile.onboarding_step, OnboardingStep::EnterpriseInfo);
    assert_eq!(profile.validation_status, ValidationStatus::Pending);

    let early = svc.approve(profile.id).await;
    assert!(
        matches!(early, Err(MarketplaceError::Validation(_))),
        "approval before onboarding must fail, got {early:?}"
    );

    for _ in 0..4 {
        svc.advance_onboarding(profile.id).await.unwrap();
    }
    let finished = svc.get(profile.id).await.unwrap();
    assert_eq!(finished.onboarding_step, OnboardingStep::Completed);
    assert_eq!(finished.onboarding_progress, 100);
    assert!(finished.onboarding_complete);
    assert!(svc.advance_onboarding(profile.id).await.is_err());

    let approved = svc.approve(profile.id).await.unwrap();
    assert!(approved.is_publicly_visible());

    let premium = svc.activate_premium(profile.id, 30).await.unwrap();
    assert!(premium.is_premium_active());
    assert!((29..=30).contains(&premium.remaining_premium_days()));

    let renewed = svc.renew_premium(profile.id, 10).await.unwrap();
    assert!((39..=40).contains(&renewed.remaining_premium_days()));

    let stored = profiles.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].subscription_end, renewed.subscription_end);
}

#[tokio::test]
async fn should_not_write_duplicate_profile_for_same_user() {
    let repo = MockProProfileRepo::empty();
    let writes = repo.writes_handle();
    let svc = ProProfileService { repo };

    svc.create(new_profile("user_1")).await.unwrap();
    let result = svc.create(new_profile("user_1")).await;

    assert!(
        matches!(result, Err(MarketplaceError::ProProfileAlreadyExists)),
        "expected ProProfileAlreadyExists, got {result:?}"
    );
    assert_eq!(*writes.lock().unwrap(), 1);
}

#[tokio::test]
async fn should_leave_profile_untouched_when_update_is_invalid() {
    let repo = MockProProfileRepo::empty();
    let writes = repo.writes_handle();
    let svc = ProProfileService { repo };
    let profile = svc.create(new_profile("user_1")).await.unwrap();

    let result = svc
        .update(
            profile.id,
            UpdateProProfileInput {
                business: BusinessInfoPatch {
                    business_name: Some(Some("Renamed".to_owned())),
                    ..Default::default()
                },
                location: LocationPatch {
                    latitude: Some(Some(120.0)),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(MarketplaceError::Validation(_))));
    assert_eq!(*writes.lock().unwrap(), 1, "only the create was written");
    let stored = svc.get(profile.id).await.unwrap();
    assert_eq!(stored.business_name.as_deref(), Some("Atelier Durand"));
}

#[tokio::test]
async fn should_clear_completion_when_stepping_back() {
    let svc = ProProfileService {
        repo: MockProProfileRepo::empty(),
    };
    let profile = svc.create(new_profile("user_1")).await.unwrap();
    svc.complete_onboarding(profile.id).await.unwrap();

    let updated = svc
        .update(
            profile.id,
            UpdateProProfileInput {
                onboarding_step: Some(OnboardingStep::Location),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.onboarding_step, OnboardingStep::Location);
    assert!(!updated.onboarding_complete);
    assert!(!updated.is_onboarding_finished());
}

#[tokio::test]
async fn should_reject_then_reset_validation() {
    let svc = ProProfileService {
        repo: MockProProfileRepo::empty(),
    };
    let profile = svc.create(new_profile("user_1")).await.unwrap();

    assert!(svc.reject(profile.id, "   ").await.is_err());
    let rejected = svc.reject(profile.id, "Missing insurance").await.unwrap();
    assert_eq!(rejected.validation_status, ValidationStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Missing insurance"));
    assert!(svc.reject(profile.id, "Again").await.is_err());

    let reset = svc.reset_validation(profile.id).await.unwrap();
    assert_eq!(reset.validation_status, ValidationStatus::Pending);
    assert_eq!(reset.rejection_reason, None);
}

#[tokio::test]
async fn should_filter_profiles_by_city_and_status() {
    let svc = ProProfileService {
        repo: MockProProfileRepo::empty(),
    };
    svc.create(new_profile("user_1")).await.unwrap();
    let paris = svc
        .create(NewProProfile {
            city: Some("Paris".to_owned()),
            ..new_profile("user_2")
        })
        .await
        .unwrap();
    svc.complete_onboarding(paris.id).await.unwrap();
    svc.approve(paris.id).await.unwrap();

    let lyon = svc
        .list(&ProProfileFilter {
            city: Some("Lyon".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(lyon.len(), 1);
    assert_eq!(lyon[0].user_id, "user_1");

    let approved = svc
        .list(&ProProfileFilter {
            validation_status: Some(ValidationStatus::Approved),
            is_active: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, paris.id);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_profile() {
    let svc = ProProfileService {
        repo: MockProProfileRepo::empty(),
    };

    let result = svc.deactivate_premium(uuid::Uuid::now_v7()).await;
    assert!(matches!(result, Err(MarketplaceError::ProProfileNotFound)));
    assert!(svc.find_by_user_id("user_x").await.unwrap().is_none());
}
