//! Test Utilities Crate
//!
//! Shared test infrastructure for the ledger workspace.
//!
//! # Modules
//!
//! - `fixtures`: fixed instants and periods used across tests
//! - `builders`: `TestTransactionBuilder` for fully-formed transactions
//! - `assertions`: summary and listing assertions with readable failures
//! - `generators`: proptest strategies for transactions
//! - `blobs`: a blob store with scripted latency and failures
//! - `contract`: the behavioral suite every `TransactionStore` must pass
//! - `database`: PostgreSQL test containers with migrations applied

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;
pub mod blobs;
pub mod contract;
pub mod database;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
pub use blobs::*;
pub use database::*;
