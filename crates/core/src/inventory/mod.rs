//! Stock movement deltas and ledger impact polarity.

pub mod error;
pub mod types;

pub use error::InventoryError;
pub use types::{LedgerImpactDirection, MovementStatus, MovementType};
