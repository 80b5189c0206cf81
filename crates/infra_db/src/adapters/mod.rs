//! Domain Adapters
//!
//! Implementations of domain ports over the PostgreSQL repositories.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresTransactionStore;
//! use domain_ledger::TransactionStore;
//!
//! let store: Arc<dyn TransactionStore> = Arc::new(PostgresTransactionStore::new(pool));
//! let listed = store.list_by_period(from, to).await?;
//! ```

pub mod transactions;

pub use transactions::PostgresTransactionStore;
