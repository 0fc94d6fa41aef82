//! Payroll error types.

use thiserror::Error;
use kitabu_shared::AppError;

use super::types::PayrollRunStatus;

/// Errors that can occur during payroll processing.
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Lifecycle operation attempted from the wrong run status.
    #[error("Payroll run is {current:?}; {action} requires {required:?}")]
    InvalidRunState {
        /// The run's current status.
        current: PayrollRunStatus,
        /// The operation attempted.
        action: &'static str,
        /// The status the operation requires.
        required: PayrollRunStatus,
    },

    /// Basic pay cannot be negative.
    #[error("Basic pay cannot be negative")]
    NegativeBasicPay,

    /// No active employees to run payroll for.
    #[error("No active employees found for payroll run")]
    NoActiveEmployees,
}

impl PayrollError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRunState { .. } => "INVALID_RUN_STATE",
            Self::NegativeBasicPay => "NEGATIVE_BASIC_PAY",
            Self::NoActiveEmployees => "NO_ACTIVE_EMPLOYEES",
        }
    }
}

impl From<PayrollError> for AppError {
    fn from(err: PayrollError) -> Self {
        match err {
            PayrollError::InvalidRunState { .. } => Self::InvalidState(err.to_string()),
            PayrollError::NegativeBasicPay | PayrollError::NoActiveEmployees => {
                Self::Validation(err.to_string())
            }
        }
    }
}
