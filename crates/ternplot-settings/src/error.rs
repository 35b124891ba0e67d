//! Error types for the settings system

use thiserror::Error;

/// Errors that can occur when building or validating settings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingError {
    /// Invalid value for a setting
    #[error("Invalid value for setting '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Mode string that does not name any known estimation mode
    #[error("Unknown mode: '{0}'")]
    UnknownMode(String),

    /// Aspect string that does not name a known ternary aspect
    #[error("Unknown aspect: '{0}' (expected 'unit' or 'equilateral')")]
    UnknownAspect(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl SettingError {
    /// Create an invalid value error
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        SettingError::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
