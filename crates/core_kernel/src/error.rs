//! Kernel error type
//!
//! Lets code outside the kernel hold any failure raised by its value types
//! or by parsing its configuration enums as one type.

use thiserror::Error;
use crate::money::MoneyError;
use crate::temporal::TemporalError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    /// A configuration string matched none of the known variants
    #[error("unknown {kind} '{value}', expected {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl CoreError {
    pub fn unknown_variant(kind: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        CoreError::UnknownVariant {
            kind,
            value: value.into(),
            expected,
        }
    }

    /// True when the failure came from a calendar or time zone value
    pub fn is_temporal(&self) -> bool {
        matches!(self, CoreError::Temporal(_))
    }
}
