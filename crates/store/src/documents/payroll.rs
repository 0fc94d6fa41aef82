//! Employees, payroll runs, and payslips.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kitabu_core::payroll::{
    DeductionComponent, EarningComponent, Loan, PayrollRunStatus, SalaryBreakdown,
    StatutorySettings,
};
use kitabu_shared::types::{EmployeeId, FiscalPeriodId, LoanId, PayrollRunId, PayslipId};

/// An employee with their recurring pay components and loans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier.
    pub id: EmployeeId,
    /// Staff number (e.g. "EMP-0042").
    pub staff_number: String,
    /// Full name.
    pub name: String,
    /// Contractual monthly base salary.
    pub basic_pay: Decimal,
    /// Only active employees enter payroll runs.
    pub is_active: bool,
    /// Recurring earnings.
    pub earnings: Vec<EarningComponent>,
    /// Recurring deductions.
    pub deductions: Vec<DeductionComponent>,
    /// Loans recovered through payroll.
    pub loans: Vec<Loan>,
}

/// One loan recovery applied within a payroll item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecovery {
    /// The recovered loan.
    pub loan_id: LoanId,
    /// The amount deducted this run.
    pub amount: Decimal,
}

/// One employee's computed line within a payroll run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollItem {
    /// The employee this line covers.
    pub employee_id: EmployeeId,
    /// Gross-to-net breakdown.
    pub breakdown: SalaryBreakdown,
    /// Loan recoveries folded into the breakdown's deductions.
    pub loan_recoveries: Vec<LoanRecovery>,
}

/// Aggregated run totals, computed at finalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunTotals {
    /// Sum of gross pay.
    pub gross_pay: Decimal,
    /// Sum of NSSF contributions.
    pub nssf: Decimal,
    /// Sum of SHA contributions.
    pub sha: Decimal,
    /// Sum of housing levy.
    pub housing_levy: Decimal,
    /// Sum of net PAYE.
    pub net_paye: Decimal,
    /// Sum of recurring deductions and loan recoveries.
    pub other_deductions: Decimal,
    /// Sum of take-home pay.
    pub net_salary: Decimal,
}

impl RunTotals {
    /// Combined statutory liability (NSSF + SHA + housing levy).
    #[must_use]
    pub fn statutory_total(&self) -> Decimal {
        self.nssf + self.sha + self.housing_levy
    }
}

/// A payroll run with its owned items and snapshotted settings.
///
/// Settings are read once at creation; later settings changes never
/// affect an existing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier.
    pub id: PayrollRunId,
    /// Sequence-issued run number.
    pub run_number: String,
    /// The fiscal period the run belongs to.
    pub period_id: FiscalPeriodId,
    /// Lifecycle status.
    pub status: PayrollRunStatus,
    /// Statutory settings snapshot taken at creation.
    pub settings: StatutorySettings,
    /// One line per active employee.
    pub items: Vec<PayrollItem>,
    /// Aggregated totals; `None` until finalization.
    pub totals: Option<RunTotals>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An immutable payslip emitted at finalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier.
    pub id: PayslipId,
    /// The run that emitted this payslip.
    pub run_id: PayrollRunId,
    /// The run number, for display.
    pub run_number: String,
    /// The employee paid.
    pub employee_id: EmployeeId,
    /// The final breakdown.
    pub breakdown: SalaryBreakdown,
    /// Emission timestamp.
    pub issued_at: DateTime<Utc>,
}
