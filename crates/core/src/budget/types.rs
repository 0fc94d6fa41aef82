//! Budget domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kitabu_shared::types::AccountId;

/// A per-account spending ceiling owned by a fiscal period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAllocation {
    /// The budget-tracked account this ceiling applies to.
    pub account_id: AccountId,
    /// The allocated ceiling for the period.
    pub limit: Decimal,
}

/// Variance of actual ledger activity against an allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationVariance {
    /// The account the figures apply to.
    pub account_id: AccountId,
    /// The allocated ceiling.
    pub limit: Decimal,
    /// Aggregated ledger activity (debits increase, credits decrease).
    pub actual: Decimal,
    /// limit - actual.
    pub variance: Decimal,
    /// actual / limit * 100, zero when the limit is zero.
    pub utilization_percent: Decimal,
}

impl AllocationVariance {
    /// Returns true if actual activity exceeds the allocated ceiling.
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.actual > self.limit
    }
}
