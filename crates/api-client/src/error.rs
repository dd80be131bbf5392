//! Error types for API and configuration handling

use thiserror::Error;

/// Engine API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Authentication failed")]
    Authentication,

    #[error("API returned error: {status} - {reason}: {detail}")]
    Status {
        status: u16,
        reason: String,
        detail: String,
    },

    #[error("Response parsing failed: {0}")]
    ParseError(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("Failed to load CA certificate {path}: {message}")]
    Certificate { path: String, message: String },
}

/// Connection configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing required setting: {0}")]
    MissingField(&'static str),
}
