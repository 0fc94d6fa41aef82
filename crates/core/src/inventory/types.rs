//! Inventory movement domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Goods received into stock.
    In,
    /// Goods issued out of stock.
    Out,
    /// Location move; net-zero effect on total stock.
    Transfer,
    /// Signed correction to the on-hand quantity.
    Adjustment,
    /// Shrinkage write-off.
    Damage,
}

impl MovementType {
    /// The signed quantity delta this movement applies to
    /// `Product.total_stock` for a given (signed) input quantity.
    ///
    /// In: +qty, Out/Damage: -qty, Adjustment: qty as signed,
    /// Transfer: zero at the product level.
    #[must_use]
    pub fn signed_delta(self, quantity: Decimal) -> Decimal {
        match self {
            Self::In => quantity.abs(),
            Self::Out | Self::Damage => -quantity.abs(),
            Self::Adjustment => quantity,
            Self::Transfer => Decimal::ZERO,
        }
    }
}

/// Lifecycle status of a stock movement.
///
/// Pending movements record the audit entry only; stock and ledger
/// effects are deferred until approval resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    /// Awaiting governance authorization; no stock/ledger effect yet.
    Pending,
    /// Effects applied.
    Completed,
}

/// Ledger polarity for a movement with monetary impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerImpactDirection {
    /// Stock decreased: debit shrinkage/expense, credit inventory asset.
    WriteDown,
    /// Stock increased: debit inventory asset, credit adjustment equity.
    WriteUp,
    /// No quantity change; no ledger impact.
    None,
}

impl LedgerImpactDirection {
    /// Resolves the ledger polarity from a signed quantity delta.
    #[must_use]
    pub fn from_delta(delta: Decimal) -> Self {
        match delta.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Less => Self::WriteDown,
            std::cmp::Ordering::Greater => Self::WriteUp,
            std::cmp::Ordering::Equal => Self::None,
        }
    }
}
