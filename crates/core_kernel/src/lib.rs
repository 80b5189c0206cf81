//! Core Kernel - Foundational types shared by every ledger crate
//!
//! This crate provides the building blocks used across the workspace:
//! - Transaction identifiers
//! - Cent amounts with exact decimal display
//! - Calendar months, date ranges and time zones
//! - Port error and health-check abstractions
//! - Storage backend selection

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;
pub mod registry;

pub use money::{Cents, Currency, MoneyError};
pub use temporal::{Clock, DateRange, FixedClock, MonthPeriod, SystemClock, TemporalError, Timezone};
pub use identifiers::TransactionId;
pub use error::CoreError;
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
pub use registry::StorageBackend;
