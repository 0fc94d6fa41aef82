//! Application-wide error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Validation errors are raised before any mutation is attempted and
/// never leave partial state. `Conflict` is only surfaced after the
/// store's transaction layer has exhausted its retries.
#[derive(Debug, Error)]
pub enum AppError {
    /// Journal entry debits and credits do not match.
    #[error("Journal entry is not balanced. Debits: {debits}, Credits: {credits}")]
    ImbalancedEntry {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Document is locked awaiting governance authorization.
    #[error("{0} is locked awaiting governance authorization")]
    GovernanceLock(String),

    /// Operation attempted from a lifecycle state that does not permit it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Referenced entity missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Required account mapping absent from tenant setup.
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Concurrent modification persisted past the retry budget.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ImbalancedEntry { .. } => "IMBALANCED_ENTRY",
            Self::GovernanceLock(_) => "GOVERNANCE_LOCK",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ConfigurationMissing(_) => "CONFIGURATION_MISSING",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ImbalancedEntry { .. } | Self::Validation(_) => 400,
            Self::GovernanceLock(_) => 423,
            Self::InvalidState(_) | Self::ConfigurationMissing(_) => 422,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }
}
