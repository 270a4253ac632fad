//! Error types for practice-core.
//!
//! The grading, scheduling and composition functions are total and never fail.
//! Errors only arise at the edges: turning stored strings back into closed-set
//! enums, and validating settings.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("unknown attempt result: {0}")]
    UnknownResult(String),

    #[error("unknown reason code: {0}")]
    UnknownReasonCode(String),

    #[error("unknown exercise type: {0}")]
    UnknownExerciseType(String),

    #[error("unknown exercise modality: {0}")]
    UnknownModality(String),

    #[error("unknown answer mode: {0}")]
    UnknownAnswerMode(String),

    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}
