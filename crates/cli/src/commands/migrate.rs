//! Database migration command.
//!
//! Migrations are embedded from `crates/shop/migrations/` at compile time and
//! applied against the configured shop database.
//!
//! # Environment Variables
//!
//! - `SHOP_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use thiserror::Error;
use tracing::info;

use wildbriar_shop::config::{ConfigError, ShopConfig};
use wildbriar_shop::db::create_pool;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed to apply.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run shop database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if configuration is missing, the database is
/// unreachable, or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let config = ShopConfig::from_env()?;

    info!("Connecting to shop database...");
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;

    info!("Running shop migrations...");
    sqlx::migrate!("../shop/migrations").run(&pool).await?;

    info!("Shop migrations complete");
    Ok(())
}
