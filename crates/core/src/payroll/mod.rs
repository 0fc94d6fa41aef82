//! Gross-to-net statutory payroll computation.
//!
//! This module implements the payroll engine:
//!
//! - `types` - Statutory settings, pay components, loans, breakdowns,
//!   and the payroll run lifecycle
//! - `calc` - The pure gross-to-net computation (PAYE bands, NSSF,
//!   SHA, housing levy)
//! - `error` - Payroll-specific error types
//!
//! All monetary intermediates stay at full `Decimal` precision;
//! rounding to the minor unit happens only at posting time.

pub mod calc;
pub mod error;
pub mod types;

#[cfg(test)]
mod calc_props;

pub use calc::{calculate_net_salary, compute_paye};
pub use error::PayrollError;
pub use types::{
    DeductionCategory, DeductionComponent, EarningCategory, EarningComponent, Loan, LoanStatus,
    PayrollRunStatus, SalaryBreakdown, StatutorySettings, TaxBand,
};
