//! # AppError
//!
//! Centralized error handling for the CivicVoice crates.
//! Store operations never fail; these errors come from the session-aware
//! service layer and from loading fixtures.

use thiserror::Error;

/// The primary error type for all cv-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Resource not found (e.g., Suggestion, Poll)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., blank title, too many poll options)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Nobody is logged in, or the session user lacks the required role
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure (e.g., malformed seed fixture)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: &str, id: impl ToString) -> Self {
        AppError::NotFound(kind.to_string(), id.to_string())
    }
}

/// A specialized Result type for CivicVoice logic.
pub type Result<T> = std::result::Result<T, AppError>;
