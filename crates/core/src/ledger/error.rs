//! Ledger error types for validation errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;
use kitabu_shared::AppError;

/// Errors that can occur during ledger validation.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Journal entry must have at least one item.
    #[error("Journal entry must have at least one item")]
    EmptyEntry,

    /// Item amount cannot be negative.
    #[error("Journal item amount cannot be negative")]
    NegativeAmount,

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debits: {debits}, Credits: {credits}")]
    Imbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(Uuid),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::Imbalanced { .. } => "IMBALANCED_ENTRY",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Imbalanced { debits, credits } => {
                Self::ImbalancedEntry { debits, credits }
            }
            LedgerError::AccountNotFound(id) => Self::NotFound(format!("Account {id}")),
            LedgerError::EmptyEntry | LedgerError::NegativeAmount | LedgerError::AccountInactive(_) => {
                Self::Validation(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::EmptyEntry.error_code(), "EMPTY_ENTRY");
        assert_eq!(
            LedgerError::Imbalanced {
                debits: dec!(100),
                credits: dec!(50),
            }
            .error_code(),
            "IMBALANCED_ENTRY"
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::Imbalanced {
            debits: dec!(100.00),
            credits: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debits: 100.00, Credits: 50.00"
        );
    }
}
