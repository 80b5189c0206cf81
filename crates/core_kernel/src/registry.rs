//! Storage backend selection
//!
//! The process owns exactly one transaction store, chosen at startup from
//! configuration and injected into the ledger service.
//!
//! ```rust,ignore
//! let store: Arc<dyn TransactionStore> = match config.storage {
//!     StorageBackend::Memory => Arc::new(InMemoryTransactionStore::new()),
//!     StorageBackend::Postgres => Arc::new(PostgresTransactionStore::new(pool)),
//! };
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Which transaction store implementation to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on restart
    #[default]
    Memory,
    /// PostgreSQL through a connection pool
    Postgres,
}

impl StorageBackend {
    /// Returns true if this backend needs a database connection URL
    pub fn requires_database(&self) -> bool {
        matches!(self, StorageBackend::Postgres)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres => "postgres",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            _ => Err(CoreError::unknown_variant(
                "storage backend",
                s,
                "'memory' or 'postgres'",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backends() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("Postgres".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert_eq!("postgresql".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_default_is_memory() {
        assert_eq!(StorageBackend::default(), StorageBackend::Memory);
        assert!(!StorageBackend::Memory.requires_database());
        assert!(StorageBackend::Postgres.requires_database());
    }

    #[test]
    fn test_deserializes_lowercase() {
        let backend: StorageBackend = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(backend, StorageBackend::Postgres);
    }
}
