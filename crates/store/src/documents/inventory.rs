//! Products, stock batches, and append-only stock movements.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kitabu_core::inventory::{MovementStatus, MovementType};
use kitabu_shared::types::{ApprovalRequestId, BatchId, ProductId, StockMovementId, UserId};

/// A stocked product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,
    /// Stock keeping unit code.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Unit cost used to value movements.
    pub unit_cost: Decimal,
    /// On-hand quantity across all batches.
    pub total_stock: Decimal,
    /// Whether the product accepts movements.
    pub is_active: bool,
}

/// A dated batch of one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Unique identifier.
    pub id: BatchId,
    /// The product this batch holds.
    pub product_id: ProductId,
    /// Batch number (e.g. "B-2024-07").
    pub batch_number: String,
    /// On-hand quantity in this batch.
    pub quantity: Decimal,
    /// Expiry date, when applicable.
    pub expiry_date: Option<NaiveDate>,
}

/// An append-only stock movement audit record.
///
/// Movements are never edited or deleted; corrections are new
/// movements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    /// Unique identifier.
    pub id: StockMovementId,
    /// The product moved.
    pub product_id: ProductId,
    /// The batch moved, when batch-tracked.
    pub batch_id: Option<BatchId>,
    /// Movement classification.
    pub movement_type: MovementType,
    /// Movement quantity as supplied by the caller.
    pub quantity: Decimal,
    /// Pending or completed.
    pub status: MovementStatus,
    /// Reason or narrative.
    pub description: String,
    /// The governance request gating this movement, when any.
    pub approval_request_id: Option<ApprovalRequestId>,
    /// The recording user.
    pub moved_by: UserId,
    /// Recording timestamp.
    pub moved_at: DateTime<Utc>,
}
