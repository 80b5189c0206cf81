//! Repository implementations
//!
//! Repositories own the SQL. They take and return row types and know nothing
//! about ports; the adapters in `crate::adapters` translate to domain types.

pub mod transactions;

pub use transactions::TransactionRepository;
