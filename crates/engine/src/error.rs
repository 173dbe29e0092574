//! The module contains the errors the engine can throw.
//!
//! Filtering itself never fails: a record that cannot be evaluated is simply
//! excluded. Errors are reserved for programming mistakes at the boundaries
//! (unknown column labels, an update of the wrong kind for a column) and for
//! user input that has to be parsed, such as amounts and dates in the entry
//! form.
//!
//! - [`UnknownColumn`] thrown when a column label is not in the registry.
//! - [`KindMismatch`] thrown when a filter update does not fit the column.
//!
//!  [`UnknownColumn`]: EngineError::UnknownColumn
//!  [`KindMismatch`]: EngineError::KindMismatch
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("\"{0}\" column not found!")]
    UnknownColumn(String),
    #[error("Filter kind mismatch: {0}")]
    KindMismatch(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
}
