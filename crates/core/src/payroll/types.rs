//! Payroll domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kitabu_shared::types::{ComponentId, LoanId};

/// One graduated marginal tax band.
///
/// Bands are non-overlapping and evaluated in ascending `min` order;
/// `max = None` marks the unbounded top band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBand {
    /// Lower bound of the band (exclusive for tax accrual, income at
    /// or under `min` pays nothing in this band).
    pub min: Decimal,
    /// Upper bound of the band, `None` for the top band.
    pub max: Option<Decimal>,
    /// Marginal rate in percent applied within the band.
    pub rate: Decimal,
}

/// Per-tenant statutory parameters for payroll computation.
///
/// Immutable during a payroll run: read once at run-creation time and
/// snapshotted onto the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatutorySettings {
    /// Graduated PAYE bands in ascending `min` order.
    pub paye_bands: Vec<TaxBand>,
    /// Monthly personal relief subtracted from gross PAYE.
    pub personal_relief: Decimal,
    /// NSSF pension contribution rate in percent.
    pub nssf_rate: Decimal,
    /// NSSF tier II cap applied to the monthly contribution.
    pub nssf_tier_ii_limit: Decimal,
    /// SHA health contribution rate in percent of gross pay.
    pub sha_rate: Decimal,
    /// Affordable housing levy rate in percent of gross pay.
    pub housing_levy_rate: Decimal,
}

impl StatutorySettings {
    /// The 2024 Kenyan statutory defaults.
    #[must_use]
    pub fn kenya_2024() -> Self {
        Self {
            paye_bands: vec![
                TaxBand {
                    min: Decimal::ZERO,
                    max: Some(Decimal::from(24_000)),
                    rate: Decimal::from(10),
                },
                TaxBand {
                    min: Decimal::from(24_000),
                    max: Some(Decimal::from(32_333)),
                    rate: Decimal::from(25),
                },
                TaxBand {
                    min: Decimal::from(32_333),
                    max: Some(Decimal::from(500_000)),
                    rate: Decimal::from(30),
                },
                TaxBand {
                    min: Decimal::from(500_000),
                    max: Some(Decimal::from(800_000)),
                    rate: Decimal::new(325, 1),
                },
                TaxBand {
                    min: Decimal::from(800_000),
                    max: None,
                    rate: Decimal::from(35),
                },
            ],
            personal_relief: Decimal::from(2_400),
            nssf_rate: Decimal::from(6),
            nssf_tier_ii_limit: Decimal::from(36_000),
            sha_rate: Decimal::new(275, 2),
            housing_levy_rate: Decimal::new(15, 1),
        }
    }
}

/// Closed classification of a recurring earning.
///
/// Taxability and pensionability are resolved once when the component
/// is recorded, never inferred from loosely-typed flags at
/// computation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningCategory {
    /// Taxable and counted toward the pension-eligible base.
    TaxablePensionable,
    /// Taxable but outside the pension-eligible base.
    Taxable,
    /// Outside both PAYE and the pension-eligible base.
    NonTaxable,
}

impl EarningCategory {
    /// Returns true if the earning enters taxable income.
    #[must_use]
    pub fn is_taxable(&self) -> bool {
        matches!(self, Self::TaxablePensionable | Self::Taxable)
    }

    /// Returns true if the earning enters the pension-eligible base.
    #[must_use]
    pub fn is_pensionable(&self) -> bool {
        matches!(self, Self::TaxablePensionable)
    }
}

/// A recurring earning attached to an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningComponent {
    /// Unique identifier.
    pub id: ComponentId,
    /// Component name (e.g. "House Allowance").
    pub name: String,
    /// Monthly amount.
    pub amount: Decimal,
    /// Tax/pension classification.
    pub category: EarningCategory,
}

/// Closed classification of a recurring deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionCategory {
    /// Mandated by statute (e.g. a union levy).
    Statutory,
    /// Elected by the employee (e.g. sacco savings).
    Voluntary,
}

/// A recurring deduction attached to an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionComponent {
    /// Unique identifier.
    pub id: ComponentId,
    /// Component name (e.g. "Sacco Savings").
    pub name: String,
    /// Monthly amount.
    pub amount: Decimal,
    /// Classification.
    pub category: DeductionCategory,
}

/// Loan lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Recoveries are deducted each run.
    Active,
    /// Balance fully recovered.
    Cleared,
}

/// An employee loan recovered through payroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier.
    pub id: LoanId,
    /// Original principal.
    pub principal: Decimal,
    /// Outstanding balance.
    pub balance: Decimal,
    /// Amount recovered per payroll run.
    pub monthly_recovery: Decimal,
    /// Lifecycle status.
    pub status: LoanStatus,
}

impl Loan {
    /// The recovery this run will deduct: the monthly recovery,
    /// clamped to the remaining balance; zero for cleared loans.
    #[must_use]
    pub fn recovery_due(&self) -> Decimal {
        match self.status {
            LoanStatus::Active => self.monthly_recovery.min(self.balance),
            LoanStatus::Cleared => Decimal::ZERO,
        }
    }
}

/// Computed gross-to-net breakdown for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// Contractual base salary.
    pub basic_pay: Decimal,
    /// Sum of taxable recurring earnings.
    pub taxable_earnings: Decimal,
    /// Sum of non-taxable recurring earnings.
    pub non_taxable_earnings: Decimal,
    /// basic + taxable + non-taxable earnings.
    pub gross_pay: Decimal,
    /// basic + pensionable earnings (uncapped).
    pub pensionable_base: Decimal,
    /// NSSF pension contribution (capped).
    pub nssf: Decimal,
    /// SHA health contribution on uncapped gross.
    pub sha: Decimal,
    /// Housing levy on uncapped gross.
    pub housing_levy: Decimal,
    /// (basic + taxable earnings) - NSSF.
    pub taxable_income: Decimal,
    /// PAYE before personal relief.
    pub gross_paye: Decimal,
    /// PAYE after relief, floored at zero.
    pub net_paye: Decimal,
    /// Recurring deductions plus loan recoveries.
    pub total_deductions: Decimal,
    /// Take-home pay.
    pub net_salary: Decimal,
}

/// Payroll run lifecycle status: `Draft -> Posted -> Settled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollRunStatus {
    /// Items computed, nothing committed downstream.
    Draft,
    /// Totals finalized, payslips emitted, ledger posted.
    Posted,
    /// Net pay disbursed from a funding account.
    Settled,
}

impl PayrollRunStatus {
    /// Returns true if the run can be finalized and posted.
    #[must_use]
    pub fn can_finalize(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the run can be settled.
    #[must_use]
    pub fn can_settle(&self) -> bool {
        matches!(self, Self::Posted)
    }

    /// Returns true if items and payslips are immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Settled)
    }
}
