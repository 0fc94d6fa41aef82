//! Inventory error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;
use kitabu_shared::AppError;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Batch not found.
    #[error("Batch not found: {0}")]
    BatchNotFound(Uuid),

    /// Movement would drive stock negative.
    #[error("Movement would drive stock negative: on hand {on_hand}, delta {delta}")]
    InsufficientStock {
        /// Current on-hand quantity.
        on_hand: Decimal,
        /// The signed delta requested.
        delta: Decimal,
    },
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::BatchNotFound(_) => "BATCH_NOT_FOUND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
        }
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotFound(id) => Self::NotFound(format!("Product {id}")),
            InventoryError::BatchNotFound(id) => Self::NotFound(format!("Batch {id}")),
            InventoryError::InsufficientStock { .. } => Self::Validation(err.to_string()),
        }
    }
}
