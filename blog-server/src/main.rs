mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;
use server::{AppState, start_rest_server};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;

    let keys = JwtKeys::new(config.jwt_secret.clone(), config.jwt_expiration_hours);
    let state = AppState::postgres(pool, keys);

    start_rest_server(config, state).await
}
