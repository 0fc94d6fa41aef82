//! Approval workflow error types.

use thiserror::Error;
use kitabu_shared::AppError;

use super::types::ApprovalStatus;

/// Errors that can occur during approval processing.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// Decision submitted against a request that is no longer pending.
    #[error("Approval request is {current:?} and cannot be re-processed")]
    NotPending {
        /// The terminal status the request is already in.
        current: ApprovalStatus,
    },

    /// A workflow policy must define at least one level.
    #[error("Approval workflow must define at least one level")]
    NoLevels,
}

impl ApprovalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotPending { .. } => "APPROVAL_NOT_PENDING",
            Self::NoLevels => "APPROVAL_NO_LEVELS",
        }
    }
}

impl From<ApprovalError> for AppError {
    fn from(err: ApprovalError) -> Self {
        match err {
            ApprovalError::NotPending { .. } => Self::InvalidState(err.to_string()),
            ApprovalError::NoLevels => Self::Validation(err.to_string()),
        }
    }
}
