//! Request and response bodies

pub mod transactions;
pub mod reports;
