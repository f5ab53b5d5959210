//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL` when unset)
//!
//! ## Optional
//! - `SHOP_DB_MAX_CONNECTIONS` - Connection pool upper bound (default: 10)

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop application configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Connection pool upper bound
    pub db_max_connections: u32,
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or a variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SHOP_DATABASE_URL")?;
        let db_max_connections = get_env_or_default("SHOP_DB_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOP_DB_MAX_CONNECTIONS".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            db_max_connections,
        })
    }
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by hosted
/// Postgres attach flows).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_database_url_is_reported() {
        let err = get_database_url("WILDBRIAR_TEST_UNSET_DB_URL_VAR");
        // DATABASE_URL may be present in CI; only assert the error shape when
        // neither variable exists.
        if std::env::var("DATABASE_URL").is_err() {
            assert!(matches!(err, Err(ConfigError::MissingEnvVar(_))));
        }
    }

    #[test]
    fn test_default_applies_when_unset() {
        assert_eq!(
            get_env_or_default("WILDBRIAR_TEST_UNSET_MAX_CONN_VAR", "10"),
            "10"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("SHOP_DATABASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: SHOP_DATABASE_URL"
        );
    }
}
