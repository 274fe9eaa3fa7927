use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::TokenService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let tokens = Arc::new(TokenService::new(&settings.tokens));
    let state = AppState::new(pool, tokens);

    if let Some(email) = settings.bootstrap_admin_email.as_deref() {
        match state
            .auth_service
            .promote_to_admin(email)
            .await
            .context("failed to promote bootstrap admin")?
        {
            Some(user) => info!(user_id = user.id, "bootstrap admin ready"),
            None => warn!(%email, "bootstrap admin is not registered yet"),
        }
    }

    server::run_http(&settings, state).await
}
