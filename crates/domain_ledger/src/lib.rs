//! Ledger Domain
//!
//! Records income and expense transactions for a single tenant and derives
//! monthly aggregates and textual reports from them.
//!
//! # Components
//!
//! - `transaction`: the immutable transaction entity
//! - `summary`: stateless monthly aggregation
//! - `ports`: `TransactionStore` and `BlobStore` interfaces
//! - `memory`: in-memory implementations of both ports
//! - `report`: deterministic report rendering
//! - `dispatch`: detached, bounded report upload
//! - `service`: validation and orchestration over a store
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{LedgerService, InMemoryTransactionStore, ReportDispatcher};
//!
//! let store = Arc::new(InMemoryTransactionStore::new());
//! let dispatcher = ReportDispatcher::new(blob_store, DispatchConfig::default());
//! let service = LedgerService::new(store, dispatcher);
//!
//! let report = service.generate_monthly_report(2025, 11).await?;
//! ```

pub mod transaction;
pub mod summary;
pub mod ports;
pub mod memory;
pub mod report;
pub mod dispatch;
pub mod service;
pub mod error;

pub use transaction::{CreateTransaction, Transaction, TransactionType};
pub use summary::{summarize, MonthlySummary, SummaryAccumulator};
pub use ports::{BlobStore, TransactionStore};
pub use memory::{InMemoryBlobStore, InMemoryTransactionStore, StoredObject};
pub use report::{render_report, ReportStatus};
pub use dispatch::{
    DispatchConfig, DispatchOutcome, DispatchStats, ReportDispatcher, REPORT_CONTENT_TYPE,
};
pub use service::{LedgerService, MonthlyReport};
pub use error::LedgerError;
