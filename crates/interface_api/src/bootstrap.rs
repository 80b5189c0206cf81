//! Service construction from configuration
//!
//! The process owns one transaction store, chosen by `storage`, and one
//! filesystem blob store under `blob_root`. Both are built here and injected
//! into the `LedgerService`.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use core_kernel::StorageBackend;
use domain_ledger::{InMemoryTransactionStore, LedgerService, ReportDispatcher, TransactionStore};
use infra_blob::FsBlobStore;
use infra_db::{create_pool, run_migrations, DatabaseError, PostgresTransactionStore};

use crate::config::ApiConfig;

/// Errors raised while wiring the service
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database setup failed: {0}")]
    Database(#[from] DatabaseError),
}

/// Builds the configured transaction store
///
/// For `postgres` this connects the pool and applies pending migrations.
pub async fn build_store(config: &ApiConfig) -> Result<Arc<dyn TransactionStore>, BootstrapError> {
    let store: Arc<dyn TransactionStore> = match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryTransactionStore::new()),
        StorageBackend::Postgres => {
            let pool = create_pool(config.database_config()).await?;
            run_migrations(&pool).await?;
            Arc::new(PostgresTransactionStore::new(pool))
        }
    };

    info!(storage = %config.storage, "transaction store ready");
    Ok(store)
}

/// Builds the ledger service with its store and report dispatcher
pub async fn build_service(config: &ApiConfig) -> Result<LedgerService, BootstrapError> {
    let store = build_store(config).await?;
    let blobs = Arc::new(FsBlobStore::new(&config.blob_root));
    let dispatcher = ReportDispatcher::new(blobs, config.dispatch_config());

    info!(
        bucket = %config.report_bucket,
        blob_root = %config.blob_root,
        "report dispatcher ready"
    );

    Ok(LedgerService::new(store, dispatcher).with_currency(config.currency))
}
