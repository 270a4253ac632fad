//! Error handling for the practice service

use practice_core::CoreError;
use thiserror::Error;

/// Service error types
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ServiceError {
    /// Stable machine-readable kind for callers that map errors to responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Store(_) => "store_error",
            ServiceError::Serialization(_) => "serialization_error",
            ServiceError::Config(_) => "config_error",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Core(_) => "invalid_data",
        }
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
