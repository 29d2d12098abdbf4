use sea_orm::DatabaseConnection;

use crate::infra::db::{DbProProfileRepository, DbUserRepository, DbWebhookEventRepository};
use crate::infra::svix::SvixVerifier;
use crate::usecase::pro_profile::ProProfileService;
use crate::usecase::user::UserService;
use crate::usecase::webhook::WebhookService;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// `None` when `CLERK_WEBHOOK_SECRET` is unset.
    pub webhook_verifier: Option<SvixVerifier>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn pro_profile_repo(&self) -> DbProProfileRepository {
        DbProProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn webhook_event_repo(&self) -> DbWebhookEventRepository {
        DbWebhookEventRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_service(&self) -> UserService<DbUserRepository> {
        UserService {
            repo: self.user_repo(),
        }
    }

    pub fn pro_profile_service(&self) -> ProProfileService<DbProProfileRepository> {
        ProProfileService {
            repo: self.pro_profile_repo(),
        }
    }

    pub fn webhook_service(
        &self,
    ) -> WebhookService<DbUserRepository, DbWebhookEventRepository, SvixVerifier> {
        WebhookService {
            users: self.user_service(),
            events: self.webhook_event_repo(),
            verifier: self.webhook_verifier.clone(),
        }
    }
}
