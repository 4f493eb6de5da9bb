//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidPolicy`] thrown when a settlement is requested with an unknown
//!   fairness policy name.
//! - [`KeyNotFound`] thrown when the snapshot store does not know a group.
//!
//! Data inconsistencies found while computing a settlement are *not* errors:
//! they are reported as [`DataIntegrityWarning`] values next to the result.
//!
//!  [`InvalidPolicy`]: EngineError::InvalidPolicy
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`DataIntegrityWarning`]: crate::DataIntegrityWarning
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Invalid income bracket: {0}")]
    InvalidIncomeBracket(String),
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),
    #[error("Snapshot store failure: {0}")]
    Store(String),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
