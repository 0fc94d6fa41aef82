//! Variance math for budget allocations.

use rust_decimal::Decimal;
use kitabu_shared::types::AccountId;

use crate::ledger::EntrySide;

use super::types::AllocationVariance;

/// The signed contribution of one journal item to budget `actual`:
/// debits increase actual spend, credits decrease it.
#[must_use]
pub fn signed_actual_delta(side: EntrySide, amount: Decimal) -> Decimal {
    side.signed_delta(amount)
}

/// Computes the variance figures for one allocation.
#[must_use]
pub fn allocation_variance(
    account_id: AccountId,
    limit: Decimal,
    actual: Decimal,
) -> AllocationVariance {
    let utilization_percent = if limit.is_zero() {
        Decimal::ZERO
    } else {
        (actual / limit * Decimal::ONE_HUNDRED).round_dp(2)
    };

    AllocationVariance {
        account_id,
        limit,
        actual,
        variance: limit - actual,
        utilization_percent,
    }
}
