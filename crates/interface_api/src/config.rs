//! API configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `ledger.toml` in the working directory, then `LEDGER_*` environment
//! variables (`LEDGER_PORT`, `LEDGER_STORAGE=postgres`, ...).

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use core_kernel::{Currency, StorageBackend};
use domain_ledger::DispatchConfig;
use infra_db::DatabaseConfig;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Transaction store backend
    pub storage: StorageBackend,
    /// PostgreSQL URL, required when `storage` is `postgres`
    pub database_url: String,
    pub db_max_connections: u32,
    /// Bucket reports are uploaded to
    pub report_bucket: String,
    /// Directory the filesystem blob store writes under
    pub blob_root: String,
    pub dispatch_timeout_secs: u64,
    pub dispatch_max_in_flight: usize,
    /// Currency used when rendering reports
    pub currency: Currency,
    /// How long shutdown waits for report uploads
    pub shutdown_grace_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_json: false,
            storage: StorageBackend::Memory,
            database_url: String::new(),
            db_max_connections: 10,
            report_bucket: "finance-tracker-reports".to_string(),
            blob_root: "./data/blobs".to_string(),
            dispatch_timeout_secs: 30,
            dispatch_max_in_flight: 16,
            currency: Currency::USD,
            shutdown_grace_secs: 10,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `ledger.toml` and `LEDGER_*` variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Environment::with_prefix("LEDGER"))
    }

    /// Loads configuration with the given environment source
    pub fn load_from(environment: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config: Self = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_json", defaults.log_json)?
            .set_default("storage", defaults.storage.as_str())?
            .set_default("database_url", defaults.database_url)?
            .set_default("db_max_connections", defaults.db_max_connections)?
            .set_default("report_bucket", defaults.report_bucket)?
            .set_default("blob_root", defaults.blob_root)?
            .set_default("dispatch_timeout_secs", defaults.dispatch_timeout_secs)?
            .set_default("dispatch_max_in_flight", defaults.dispatch_max_in_flight as u64)?
            .set_default("currency", defaults.currency.code())?
            .set_default("shutdown_grace_secs", defaults.shutdown_grace_secs)?
            .add_source(File::with_name("ledger").required(false))
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.requires_database() && self.database_url.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "database_url is required when storage is '{}'",
                self.storage
            )));
        }
        if self.report_bucket.trim().is_empty() {
            return Err(ConfigError::Message("report_bucket must not be empty".to_string()));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig::new(self.report_bucket.clone())
            .timeout(Duration::from_secs(self.dispatch_timeout_secs))
            .max_in_flight(self.dispatch_max_in_flight)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone()).max_connections(self.db_max_connections)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("LEDGER").source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::load_from(env(&[])).unwrap();

        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.dispatch_config().bucket, "finance-tracker-reports");
        assert_eq!(config.dispatch_config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_environment_overrides() {
        let config = ApiConfig::load_from(env(&[
            ("LEDGER_PORT", "9090"),
            ("LEDGER_STORAGE", "postgres"),
            ("LEDGER_DATABASE_URL", "postgres://db/ledger"),
            ("LEDGER_LOG_JSON", "true"),
            ("LEDGER_CURRENCY", "eur"),
            ("LEDGER_DISPATCH_MAX_IN_FLIGHT", "4"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.database_config().url, "postgres://db/ledger");
        assert!(config.log_json);
        assert_eq!(config.currency, Currency::EUR);
        assert_eq!(config.dispatch_config().max_in_flight, 4);
    }

    #[test]
    fn test_postgres_requires_url() {
        let err = ApiConfig::load_from(env(&[("LEDGER_STORAGE", "postgres")])).unwrap_err();
        assert!(err.to_string().contains("database_url"));
    }

    #[test]
    fn test_unknown_storage_is_rejected() {
        assert!(ApiConfig::load_from(env(&[("LEDGER_STORAGE", "redis")])).is_err());
    }
}
