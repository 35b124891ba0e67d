//! Error types for mineral and formula lookups

use thiserror::Error;

/// Errors raised by the mineral database and formula parser
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MineralError {
    /// No mineral with the given name
    #[error("Mineral not found: {0}")]
    NotFound(String),

    /// Formula text could not be parsed
    #[error("Invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },

    /// Element symbol is not in the element table
    #[error("Unknown element symbol: {0}")]
    UnknownElement(String),
}

impl MineralError {
    pub(crate) fn invalid(formula: &str, reason: impl Into<String>) -> Self {
        MineralError::InvalidFormula {
            formula: formula.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for mineral operations
pub type MineralResult<T> = Result<T, MineralError>;
