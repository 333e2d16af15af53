use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::infrastructure::config::AppConfig;

pub async fn create_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(config.db_acquire_timeout())
        .connect(&config.database_url)
        .await?;
    info!(
        max_connections = config.db_max_connections,
        "connected to PostgreSQL"
    );
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");
    sqlx::migrate!().run(pool).await?;
    info!("migrations completed");
    Ok(())
}
