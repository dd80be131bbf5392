//! Error types for MAC pool operations

use thiserror::Error;

/// Main error type for MAC pool operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacPoolError {
    #[error("Invalid MAC address '{value}': {reason}")]
    InvalidFormat { value: String, reason: String },
}

impl MacPoolError {
    pub(crate) fn invalid(value: &str, reason: impl Into<String>) -> Self {
        MacPoolError::InvalidFormat {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
