//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] thrown when a numeric input is not a valid currency
//!   figure.
//! - [`UnbalancedLedger`] thrown when the net positions of an event do not
//!   sum to zero.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`UnbalancedLedger`]: EngineError::UnbalancedLedger
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unbalanced ledger: {0}")]
    UnbalancedLedger(String),
}
