use sea_orm::Database;
use tracing::info;

use booklin_core::config::Config;
use booklin_core::tracing::init_tracing;

use booklin_marketplace::config::MarketplaceConfig;
use booklin_marketplace::infra::svix::SvixVerifier;
use booklin_marketplace::router::build_router;
use booklin_marketplace::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = MarketplaceConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let webhook_verifier = config
        .clerk_webhook_secret
        .as_deref()
        .map(SvixVerifier::new)
        .transpose()
        .expect("invalid CLERK_WEBHOOK_SECRET");
    if webhook_verifier.is_none() {
        tracing::warn!("CLERK_WEBHOOK_SECRET unset, webhook deliveries will be refused");
    }

    let state = AppState {
        db,
        webhook_verifier,
    };

    let router = build_router(state, config.allowed_origins.as_deref());
    let addr = format!("0.0.0.0:{}", config.marketplace_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("marketplace service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
