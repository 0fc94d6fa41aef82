//! Payroll run lifecycle: create, finalize-and-post, settle.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use kitabu_core::ledger::{EntrySide, JournalEntryInput, JournalItemInput};
use kitabu_core::payroll::{
    calculate_net_salary, DeductionCategory, DeductionComponent, LoanStatus, PayrollError,
    PayrollRunStatus,
};
use kitabu_shared::types::money::round_minor;
use kitabu_shared::types::{AccountId, ComponentId, FiscalPeriodId, JournalEntryId, PayrollRunId, PayslipId};
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::documents::payroll::{LoanRecovery, PayrollItem, PayrollRun, Payslip, RunTotals};
use kitabu_store::DocumentStore;

use crate::ledger::post_in_tx;
use crate::sequence::{issue_in_tx, PAYROLL_SEQUENCE};

/// Payroll run orchestration service.
#[derive(Clone)]
pub struct PayrollService {
    store: Arc<DocumentStore>,
}

impl PayrollService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates a draft payroll run for one fiscal period.
    ///
    /// Statutory settings are snapshotted onto the run; one item is
    /// computed per active employee with recurring components and
    /// active loan recoveries folded into deductions. Loan balances
    /// are untouched until finalization.
    ///
    /// Run membership is a committed snapshot of the active employees
    /// at call time: a hire landing after the snapshot joins the next
    /// run. Every included employee is read back through the
    /// transaction, so a concurrent edit to one of them retries the
    /// whole run, and an employee deactivated or removed between
    /// snapshot and read is excluded.
    pub fn create_payroll_run(
        &self,
        ctx: &TenantCtx,
        period_id: FiscalPeriodId,
    ) -> AppResult<PayrollRunId> {
        let store = self.store.as_ref();
        let run_id = store.run_transaction(|tx| {
            let period = tx
                .read(&store.fiscal_periods, ctx.institution_id, &period_id)
                .ok_or_else(|| AppError::NotFound(format!("Fiscal period {period_id}")))?;
            if !period.status.is_open() {
                return Err(AppError::InvalidState(format!(
                    "Fiscal period {} is closed",
                    period.name
                )));
            }
            let settings = tx
                .read(&store.statutory_settings, ctx.institution_id, &())
                .ok_or_else(|| {
                    AppError::ConfigurationMissing("statutory settings".to_string())
                })?;

            let employee_ids: Vec<_> = store
                .employees
                .scan(ctx.institution_id, |_, employee| employee.is_active)
                .into_iter()
                .map(|(id, _)| id)
                .collect();

            let mut items = Vec::with_capacity(employee_ids.len());
            for employee_id in employee_ids {
                let Some(employee) = tx.read(&store.employees, ctx.institution_id, &employee_id)
                else {
                    continue;
                };
                if !employee.is_active {
                    continue;
                }
                let recoveries: Vec<LoanRecovery> = employee
                    .loans
                    .iter()
                    .filter(|loan| loan.recovery_due() > Decimal::ZERO)
                    .map(|loan| LoanRecovery {
                        loan_id: loan.id,
                        amount: loan.recovery_due(),
                    })
                    .collect();

                // Loan recoveries enter the computation as voluntary
                // deductions with ids derived from the loan.
                let mut deductions = employee.deductions.clone();
                deductions.extend(employee.loans.iter().filter_map(|loan| {
                    let due = loan.recovery_due();
                    (due > Decimal::ZERO).then(|| DeductionComponent {
                        id: ComponentId::from_uuid(loan.id.into_inner()),
                        name: "Loan recovery".to_string(),
                        amount: due,
                        category: DeductionCategory::Voluntary,
                    })
                }));

                let breakdown = calculate_net_salary(
                    employee.basic_pay,
                    &settings,
                    &employee.earnings,
                    &deductions,
                )?;
                items.push(PayrollItem {
                    employee_id,
                    breakdown,
                    loan_recoveries: recoveries,
                });
            }
            if items.is_empty() {
                return Err(PayrollError::NoActiveEmployees.into());
            }

            let run = PayrollRun {
                id: PayrollRunId::new(),
                run_number: issue_in_tx(tx, store, ctx.institution_id, PAYROLL_SEQUENCE),
                period_id,
                status: PayrollRunStatus::Draft,
                settings: settings.clone(),
                items,
                totals: None,
                created_at: Utc::now(),
            };
            let run_id = run.id;
            tx.put(&store.payroll_runs, ctx.institution_id, run_id, run);
            Ok(run_id)
        })?;
        tracing::info!(%run_id, "payroll run created");
        Ok(run_id)
    }

    /// Finalizes a draft run atomically: totals, one immutable payslip
    /// per item, loan balance decrements, and (when auto-posting is
    /// configured) exactly one balanced journal entry.
    pub fn finalize_and_post_payroll(&self, ctx: &TenantCtx, run_id: PayrollRunId) -> AppResult<()> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| -> AppResult<()> {
            let mut run = tx
                .read(&store.payroll_runs, ctx.institution_id, &run_id)
                .ok_or_else(|| AppError::NotFound(format!("Payroll run {run_id}")))?;
            if !run.status.can_finalize() {
                return Err(PayrollError::InvalidRunState {
                    current: run.status,
                    action: "finalize",
                    required: PayrollRunStatus::Draft,
                }
                .into());
            }

            let mut totals = RunTotals::default();
            for item in &run.items {
                totals.gross_pay += item.breakdown.gross_pay;
                totals.nssf += item.breakdown.nssf;
                totals.sha += item.breakdown.sha;
                totals.housing_levy += item.breakdown.housing_levy;
                totals.net_paye += item.breakdown.net_paye;
                totals.other_deductions += item.breakdown.total_deductions;
                totals.net_salary += item.breakdown.net_salary;
            }

            for item in &run.items {
                let payslip = Payslip {
                    id: PayslipId::new(),
                    run_id,
                    run_number: run.run_number.clone(),
                    employee_id: item.employee_id,
                    breakdown: item.breakdown.clone(),
                    issued_at: Utc::now(),
                };
                tx.put(&store.payslips, ctx.institution_id, payslip.id, payslip);
            }

            // Recoveries clamp against the balance a second time in
            // case another run settled the loan since draft creation.
            for item in &run.items {
                if item.loan_recoveries.is_empty() {
                    continue;
                }
                let Some(mut employee) =
                    tx.read(&store.employees, ctx.institution_id, &item.employee_id)
                else {
                    continue;
                };
                for recovery in &item.loan_recoveries {
                    if let Some(loan) = employee
                        .loans
                        .iter_mut()
                        .find(|loan| loan.id == recovery.loan_id)
                    {
                        let applied = recovery.amount.min(loan.balance);
                        loan.balance -= applied;
                        if loan.balance == Decimal::ZERO {
                            loan.status = LoanStatus::Cleared;
                        }
                    }
                }
                tx.put(&store.employees, ctx.institution_id, item.employee_id, employee);
            }

            let setup = tx.read(&store.tenant_setup, ctx.institution_id, &());
            let auto_post = setup.as_ref().is_some_and(|setup| setup.auto_post_payroll);
            if auto_post {
                let accounts = *setup
                    .as_ref()
                    .ok_or_else(|| AppError::ConfigurationMissing("tenant setup".to_string()))?
                    .payroll()?;
                let mut items = Vec::new();
                let mut credit = |account_id: AccountId, amount: Decimal| {
                    let amount = round_minor(amount);
                    if amount > Decimal::ZERO {
                        items.push(JournalItemInput {
                            account_id,
                            amount,
                            side: EntrySide::Credit,
                        });
                    }
                };
                credit(accounts.net_salaries_payable, totals.net_salary);
                credit(accounts.paye_payable, totals.net_paye);
                credit(accounts.statutory_payable, totals.statutory_total());
                credit(accounts.deductions_payable, totals.other_deductions);

                // The gross debit is the sum of the rounded credit
                // legs, so the entry balances exactly.
                let gross: Decimal = items.iter().map(|item| item.amount).sum();
                items.insert(
                    0,
                    JournalItemInput {
                        account_id: accounts.salary_expense,
                        amount: gross,
                        side: EntrySide::Debit,
                    },
                );
                post_in_tx(
                    tx,
                    store,
                    ctx,
                    &JournalEntryInput {
                        date: Utc::now().date_naive(),
                        description: format!("Payroll {} gross pay", run.run_number),
                        reference: Some(format!("PAY-{run_id}")),
                        items,
                    },
                )?;
            }

            run.status = PayrollRunStatus::Posted;
            run.totals = Some(totals);
            tx.put(&store.payroll_runs, ctx.institution_id, run_id, run);
            Ok(())
        })?;
        tracing::info!(%run_id, "payroll run finalized and posted");
        Ok(())
    }

    /// Settles a posted run: debits net-salaries payable and credits
    /// the funding account for the total net pay.
    pub fn settle_payroll_run(
        &self,
        ctx: &TenantCtx,
        run_id: PayrollRunId,
        funding_account_id: AccountId,
    ) -> AppResult<JournalEntryId> {
        let store = self.store.as_ref();
        let entry_id = store.run_transaction(|tx| -> AppResult<JournalEntryId> {
            let mut run = tx
                .read(&store.payroll_runs, ctx.institution_id, &run_id)
                .ok_or_else(|| AppError::NotFound(format!("Payroll run {run_id}")))?;
            if !run.status.can_settle() {
                return Err(PayrollError::InvalidRunState {
                    current: run.status,
                    action: "settle",
                    required: PayrollRunStatus::Posted,
                }
                .into());
            }
            let totals = run.totals.clone().ok_or_else(|| {
                AppError::Internal(format!("Posted run {run_id} has no totals"))
            })?;
            let accounts = *tx
                .read(&store.tenant_setup, ctx.institution_id, &())
                .ok_or_else(|| AppError::ConfigurationMissing("tenant setup".to_string()))?
                .payroll()?;

            let net = round_minor(totals.net_salary);
            let entry_id = post_in_tx(
                tx,
                store,
                ctx,
                &JournalEntryInput {
                    date: Utc::now().date_naive(),
                    description: format!("Payroll {} settlement", run.run_number),
                    reference: Some(format!("SETTLE-{run_id}")),
                    items: vec![
                        JournalItemInput {
                            account_id: accounts.net_salaries_payable,
                            amount: net,
                            side: EntrySide::Debit,
                        },
                        JournalItemInput {
                            account_id: funding_account_id,
                            amount: net,
                            side: EntrySide::Credit,
                        },
                    ],
                },
            )?;

            run.status = PayrollRunStatus::Settled;
            tx.put(&store.payroll_runs, ctx.institution_id, run_id, run);
            Ok(entry_id)
        })?;
        tracing::info!(%run_id, %entry_id, "payroll run settled");
        Ok(entry_id)
    }
}
