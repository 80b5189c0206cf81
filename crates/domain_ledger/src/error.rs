//! Ledger domain errors

use core_kernel::{MoneyError, PortError, TemporalError};
use thiserror::Error;

/// Errors surfaced by the ledger service
///
/// Store failures collapse to `Internal`, except a missing record on delete
/// which stays `NotFound`.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The caller supplied invalid input; nothing was stored or queried
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The referenced transaction does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store or another collaborator failed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        LedgerError::BadRequest(message.into())
    }

    pub fn is_bad_request(&self) -> bool {
        matches!(self, LedgerError::BadRequest(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_))
    }
}

impl From<PortError> for LedgerError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { .. } => LedgerError::NotFound(error.to_string()),
            other => LedgerError::Internal(other.to_string()),
        }
    }
}

impl From<TemporalError> for LedgerError {
    fn from(error: TemporalError) -> Self {
        LedgerError::BadRequest(error.to_string())
    }
}

impl From<MoneyError> for LedgerError {
    fn from(error: MoneyError) -> Self {
        LedgerError::BadRequest(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_not_found_stays_not_found() {
        let error: LedgerError = PortError::not_found("Transaction", "TXN-1").into();
        assert!(error.is_not_found());
    }

    #[test]
    fn test_other_port_errors_become_internal() {
        let error: LedgerError = PortError::connection("refused").into();
        assert!(matches!(error, LedgerError::Internal(_)));

        let error: LedgerError = PortError::validation("bad row").into();
        assert!(matches!(error, LedgerError::Internal(_)));
    }

    #[test]
    fn test_invalid_month_is_bad_request() {
        let error: LedgerError = TemporalError::InvalidMonth(13).into();
        assert!(error.is_bad_request());
    }
}
