use serde::Deserialize;

use booklin_core::config::Config;

/// Marketplace service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct MarketplaceConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 4000). Env var: `MARKETPLACE_PORT`.
    #[serde(default = "default_port")]
    pub marketplace_port: u16,
    /// Svix signing secret (`whsec_...`) for Clerk webhooks.
    pub clerk_webhook_secret: Option<String>,
    /// Comma-separated CORS origins. No CORS layer when unset.
    pub allowed_origins: Option<String>,
}

fn default_port() -> u16 {
    4000
}

impl Config for MarketplaceConfig {}
