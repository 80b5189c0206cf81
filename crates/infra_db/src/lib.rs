//! Infrastructure Database Layer
//!
//! PostgreSQL backend for the ledger using SQLx.
//!
//! # Architecture
//!
//! - `pool`: connection pool configuration and creation
//! - `repositories`: SQL access returning row types
//! - `adapters`: `TransactionStore` implementation over the repository
//! - `migrations/`: embedded schema, applied with [`run_migrations`]
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresTransactionStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/ledger")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresTransactionStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use repositories::TransactionRepository;
pub use adapters::PostgresTransactionStore;
