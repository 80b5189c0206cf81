//! Request handlers

pub mod health;
pub mod transactions;
pub mod summary;
pub mod reports;
