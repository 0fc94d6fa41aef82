//! Budget variance reporting over posted ledger activity.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use kitabu_core::budget::{allocation_variance, signed_actual_delta, AllocationVariance};
use kitabu_core::fiscal::contains_date;
use kitabu_shared::types::{AccountId, FiscalPeriodId};
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::documents::ledger::FiscalPeriod;
use kitabu_store::DocumentStore;

/// Sums posted ledger activity for one account over a date range.
/// Debits increase the actual, credits decrease it.
fn actual_for_account(
    store: &DocumentStore,
    ctx: &TenantCtx,
    account_id: AccountId,
    start: NaiveDate,
    end: NaiveDate,
) -> Decimal {
    store
        .journal_entries
        .scan(ctx.institution_id, |_, entry| {
            contains_date(start, end, entry.date)
        })
        .into_iter()
        .flat_map(|(_, entry)| entry.items)
        .filter(|item| item.account_id == account_id)
        .map(|item| signed_actual_delta(item.side, item.amount))
        .sum()
}

/// Read-only budget variance service.
#[derive(Clone)]
pub struct BudgetService {
    store: Arc<DocumentStore>,
}

impl BudgetService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Computes per-allocation variance for one fiscal period.
    ///
    /// Only budget-tracked accounts with an allocation appear in the
    /// report. Reads committed state; no transaction is opened.
    pub fn calculate_period_variance(
        &self,
        ctx: &TenantCtx,
        period_id: FiscalPeriodId,
    ) -> AppResult<Vec<AllocationVariance>> {
        let period = self
            .store
            .fiscal_periods
            .get(ctx.institution_id, &period_id)
            .ok_or_else(|| AppError::NotFound(format!("Fiscal period {period_id}")))?;

        let mut report = Vec::with_capacity(period.allocations.len());
        for allocation in &period.allocations {
            let tracked = self
                .store
                .accounts
                .get(ctx.institution_id, &allocation.account_id)
                .is_some_and(|account| account.is_tracked_for_budget);
            if !tracked {
                continue;
            }
            let actual = actual_for_account(
                &self.store,
                ctx,
                allocation.account_id,
                period.start_date,
                period.end_date,
            );
            report.push(allocation_variance(
                allocation.account_id,
                allocation.limit,
                actual,
            ));
        }
        Ok(report)
    }

    /// Whether charging `additional` to an account would exceed its
    /// allocation in the open period covering `date`.
    ///
    /// No open period or no allocation means no ceiling applies.
    pub fn would_exceed_allocation(
        &self,
        ctx: &TenantCtx,
        date: NaiveDate,
        account_id: AccountId,
        additional: Decimal,
    ) -> bool {
        let Some(period) = self.open_period_for(ctx, date) else {
            return false;
        };
        let Some(allocation) = period
            .allocations
            .iter()
            .find(|allocation| allocation.account_id == account_id)
        else {
            return false;
        };
        let actual = actual_for_account(&self.store, ctx, account_id, period.start_date, period.end_date);
        actual + additional > allocation.limit
    }

    fn open_period_for(&self, ctx: &TenantCtx, date: NaiveDate) -> Option<FiscalPeriod> {
        self.store
            .fiscal_periods
            .scan(ctx.institution_id, |_, period| {
                period.status.is_open() && contains_date(period.start_date, period.end_date, date)
            })
            .into_iter()
            .map(|(_, period)| period)
            .next()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use kitabu_core::budget::BudgetAllocation;
    use kitabu_core::fiscal::FiscalPeriodStatus;
    use kitabu_core::ledger::{AccountType, EntrySide, JournalEntryInput, JournalItemInput};
    use kitabu_shared::types::{InstitutionId, UserId};
    use kitabu_store::documents::ledger::Account;

    use crate::ledger::LedgerService;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    struct Fixture {
        store: Arc<DocumentStore>,
        ctx: TenantCtx,
        period_id: FiscalPeriodId,
        stationery: AccountId,
        cash: AccountId,
    }

    fn seeded() -> Fixture {
        let store = Arc::new(DocumentStore::default());
        let ctx = TenantCtx::new(InstitutionId::new(), UserId::new());

        let mut stationery = Account::new("5100", "Stationery", AccountType::Expense);
        stationery.is_tracked_for_budget = true;
        let cash = Account::new("1000", "Cash", AccountType::Asset);
        let (stationery_id, cash_id) = (stationery.id, cash.id);

        let period = FiscalPeriod {
            id: FiscalPeriodId::new(),
            name: "June 2024".to_string(),
            start_date: date(1),
            end_date: date(30),
            status: FiscalPeriodStatus::Open,
            allocations: vec![BudgetAllocation {
                account_id: stationery_id,
                limit: dec!(10000),
            }],
        };
        let period_id = period.id;

        store
            .run_transaction(|tx| -> AppResult<()> {
                tx.put(&store.accounts, ctx.institution_id, stationery_id, stationery.clone());
                tx.put(&store.accounts, ctx.institution_id, cash_id, cash.clone());
                tx.put(&store.fiscal_periods, ctx.institution_id, period_id, period.clone());
                Ok(())
            })
            .unwrap();

        Fixture {
            store,
            ctx,
            period_id,
            stationery: stationery_id,
            cash: cash_id,
        }
    }

    fn spend(fixture: &Fixture, day: u32, amount: Decimal) {
        let ledger = LedgerService::new(Arc::clone(&fixture.store));
        ledger
            .post_journal_entry(
                &fixture.ctx,
                &JournalEntryInput {
                    date: date(day),
                    description: "Stationery purchase".to_string(),
                    reference: None,
                    items: vec![
                        JournalItemInput {
                            account_id: fixture.stationery,
                            amount,
                            side: EntrySide::Debit,
                        },
                        JournalItemInput {
                            account_id: fixture.cash,
                            amount,
                            side: EntrySide::Credit,
                        },
                    ],
                },
            )
            .unwrap();
    }

    #[test]
    fn test_variance_aggregates_in_range_activity() {
        let fixture = seeded();
        spend(&fixture, 5, dec!(3000));
        spend(&fixture, 20, dec!(4500));

        let service = BudgetService::new(Arc::clone(&fixture.store));
        let report = service
            .calculate_period_variance(&fixture.ctx, fixture.period_id)
            .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].actual, dec!(7500));
        assert_eq!(report[0].variance, dec!(2500));
        assert_eq!(report[0].utilization_percent, dec!(75.00));
        assert!(!report[0].is_over_budget());
    }

    #[test]
    fn test_unknown_period_is_not_found() {
        let fixture = seeded();
        let service = BudgetService::new(Arc::clone(&fixture.store));
        let err = service
            .calculate_period_variance(&fixture.ctx, FiscalPeriodId::new())
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_untracked_account_excluded() {
        let fixture = seeded();
        let store = fixture.store.as_ref();
        store
            .run_transaction(|tx| -> AppResult<()> {
                let mut account = tx
                    .read(&store.accounts, fixture.ctx.institution_id, &fixture.stationery)
                    .unwrap();
                account.is_tracked_for_budget = false;
                tx.put(
                    &store.accounts,
                    fixture.ctx.institution_id,
                    fixture.stationery,
                    account,
                );
                Ok(())
            })
            .unwrap();

        let service = BudgetService::new(Arc::clone(&fixture.store));
        let report = service
            .calculate_period_variance(&fixture.ctx, fixture.period_id)
            .unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_would_exceed_allocation() {
        let fixture = seeded();
        spend(&fixture, 5, dec!(8000));

        let service = BudgetService::new(Arc::clone(&fixture.store));
        assert!(!service.would_exceed_allocation(&fixture.ctx, date(10), fixture.stationery, dec!(2000)));
        assert!(service.would_exceed_allocation(&fixture.ctx, date(10), fixture.stationery, dec!(2000.01)));
        // No allocation for cash, so no ceiling applies.
        assert!(!service.would_exceed_allocation(&fixture.ctx, date(10), fixture.cash, dec!(1_000_000)));
    }
}
