//! Monetary rounding helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All intermediate payroll and ledger values stay at full `Decimal`
//! precision; rounding to the currency's minor unit happens only at
//! posting/presentation time via [`round_minor`].

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of minor-unit decimal places (cents).
pub const MINOR_UNIT_DP: u32 = 2;

/// Rounds an amount to the currency's minor unit using Banker's Rounding.
///
/// Used only at the posting/presentation boundary, never mid-computation.
#[must_use]
pub fn round_minor(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_DP, RoundingStrategy::MidpointNearestEven)
}

/// Applies a percentage rate to a value at full precision.
///
/// `rate` is expressed in percent (e.g. `6` means 6%).
#[must_use]
pub fn percent_of(value: Decimal, rate: Decimal) -> Decimal {
    value * rate / Decimal::ONE_HUNDRED
}
