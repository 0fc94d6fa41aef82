//! Journal entry posting: the single entry point for balance mutation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use kitabu_core::ledger::{validate_items, JournalEntryInput, LedgerError};
use kitabu_shared::types::{AccountId, JournalEntryId};
use kitabu_shared::{AppResult, TenantCtx};
use kitabu_store::documents::ledger::{JournalEntry, JournalItem};
use kitabu_store::{DocumentStore, Tx};

use crate::sequence::{issue_in_tx, JOURNAL_SEQUENCE};

/// Posts a journal entry inside an open transaction.
///
/// Validation (non-empty, non-negative, balanced) runs before any
/// write is staged. Account balances receive their signed deltas in
/// the same transaction that persists the entry, so a conflict or a
/// validation failure leaves nothing behind. The caller-supplied
/// reference is an idempotency key: re-posting it returns the prior
/// entry id untouched.
pub(crate) fn post_in_tx<'s>(
    tx: &mut Tx<'s>,
    store: &'s DocumentStore,
    ctx: &TenantCtx,
    input: &JournalEntryInput,
) -> AppResult<JournalEntryId> {
    validate_items(&input.items)?;

    if let Some(reference) = &input.reference
        && let Some(existing) = tx.read(&store.journal_entry_refs, ctx.institution_id, reference)
    {
        tracing::debug!(%existing, reference, "reference already posted, returning existing entry");
        return Ok(existing);
    }

    // An account may appear on several lines; fold to one delta each.
    let mut deltas: HashMap<AccountId, Decimal> = HashMap::new();
    for item in &input.items {
        *deltas.entry(item.account_id).or_insert(Decimal::ZERO) +=
            item.side.signed_delta(item.amount);
    }
    for (account_id, delta) in deltas {
        let mut account = tx
            .read(&store.accounts, ctx.institution_id, &account_id)
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.into_inner()))?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(account_id.into_inner()).into());
        }
        account.balance += delta;
        tx.put(&store.accounts, ctx.institution_id, account_id, account);
    }

    let entry = JournalEntry {
        id: JournalEntryId::new(),
        entry_number: issue_in_tx(tx, store, ctx.institution_id, JOURNAL_SEQUENCE),
        date: input.date,
        description: input.description.clone(),
        reference: input.reference.clone(),
        items: input
            .items
            .iter()
            .map(|item| JournalItem {
                account_id: item.account_id,
                amount: item.amount,
                side: item.side,
            })
            .collect(),
        created_by: ctx.user_id,
        created_at: Utc::now(),
    };
    let id = entry.id;
    if let Some(reference) = &input.reference {
        tx.put(
            &store.journal_entry_refs,
            ctx.institution_id,
            reference.clone(),
            id,
        );
    }
    tx.put(&store.journal_entries, ctx.institution_id, id, entry);
    Ok(id)
}

/// Double-entry ledger posting service.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<DocumentStore>,
}

impl LedgerService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Validates and posts one balanced journal entry atomically.
    pub fn post_journal_entry(
        &self,
        ctx: &TenantCtx,
        input: &JournalEntryInput,
    ) -> AppResult<JournalEntryId> {
        let store = self.store.as_ref();
        let id = store.run_transaction(|tx| post_in_tx(tx, store, ctx, input))?;
        tracing::info!(%id, items = input.items.len(), "journal entry posted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use kitabu_core::ledger::{AccountType, EntrySide, JournalItemInput};
    use kitabu_shared::types::{InstitutionId, UserId};
    use kitabu_shared::AppError;
    use kitabu_store::documents::ledger::Account;

    use super::*;

    fn seeded() -> (LedgerService, TenantCtx, AccountId, AccountId) {
        let store = Arc::new(DocumentStore::default());
        let ctx = TenantCtx::new(InstitutionId::new(), UserId::new());
        let cash = Account::new("1000", "Cash", AccountType::Asset);
        let income = Account::new("4000", "Tuition Income", AccountType::Income);
        let (cash_id, income_id) = (cash.id, income.id);
        store
            .run_transaction(|tx| -> AppResult<()> {
                tx.put(&store.accounts, ctx.institution_id, cash_id, cash.clone());
                tx.put(&store.accounts, ctx.institution_id, income_id, income.clone());
                Ok(())
            })
            .unwrap();
        (LedgerService::new(store), ctx, cash_id, income_id)
    }

    fn entry(cash: AccountId, income: AccountId, amount: Decimal) -> JournalEntryInput {
        JournalEntryInput {
            date: chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            description: "Tuition received".to_string(),
            reference: None,
            items: vec![
                JournalItemInput {
                    account_id: cash,
                    amount,
                    side: EntrySide::Debit,
                },
                JournalItemInput {
                    account_id: income,
                    amount,
                    side: EntrySide::Credit,
                },
            ],
        }
    }

    #[test]
    fn test_posting_applies_signed_deltas() {
        let (service, ctx, cash, income) = seeded();
        service
            .post_journal_entry(&ctx, &entry(cash, income, dec!(2500.00)))
            .unwrap();

        let store = &service.store;
        assert_eq!(
            store.accounts.get(ctx.institution_id, &cash).unwrap().balance,
            dec!(2500.00)
        );
        assert_eq!(
            store.accounts.get(ctx.institution_id, &income).unwrap().balance,
            dec!(-2500.00)
        );
    }

    #[test]
    fn test_imbalanced_entry_rejected_without_side_effects() {
        let (service, ctx, cash, income) = seeded();
        let mut input = entry(cash, income, dec!(100));
        input.items[1].amount = dec!(90);

        let err = service.post_journal_entry(&ctx, &input).unwrap_err();
        assert!(matches!(err, AppError::ImbalancedEntry { .. }));

        let store = &service.store;
        assert_eq!(
            store.accounts.get(ctx.institution_id, &cash).unwrap().balance,
            Decimal::ZERO
        );
        assert_eq!(store.journal_entries.scan(ctx.institution_id, |_, _| true).len(), 0);
    }

    #[test]
    fn test_empty_entry_rejected() {
        let (service, ctx, _, _) = seeded();
        let input = JournalEntryInput {
            date: chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            description: "Nothing".to_string(),
            reference: None,
            items: vec![],
        };
        let err = service.post_journal_entry(&ctx, &input).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_unknown_account_rejected() {
        let (service, ctx, cash, _) = seeded();
        let input = entry(cash, AccountId::new(), dec!(100));
        let err = service.post_journal_entry(&ctx, &input).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_inactive_account_rejected() {
        let (service, ctx, cash, income) = seeded();
        let store = Arc::clone(&service.store);
        store
            .run_transaction(|tx| -> AppResult<()> {
                let mut account = tx.read(&store.accounts, ctx.institution_id, &income).unwrap();
                account.is_active = false;
                tx.put(&store.accounts, ctx.institution_id, income, account);
                Ok(())
            })
            .unwrap();

        let err = service
            .post_journal_entry(&ctx, &entry(cash, income, dec!(100)))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_repeated_reference_is_idempotent() {
        let (service, ctx, cash, income) = seeded();
        let mut input = entry(cash, income, dec!(500.00));
        input.reference = Some("RCPT-9001".to_string());

        let first = service.post_journal_entry(&ctx, &input).unwrap();
        let second = service.post_journal_entry(&ctx, &input).unwrap();
        assert_eq!(first, second);

        // Deltas applied exactly once.
        let store = &service.store;
        assert_eq!(
            store.accounts.get(ctx.institution_id, &cash).unwrap().balance,
            dec!(500.00)
        );
    }

    #[test]
    fn test_same_account_on_both_sides_folds_deltas() {
        let (service, ctx, cash, income) = seeded();
        let input = JournalEntryInput {
            date: chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            description: "Split receipt".to_string(),
            reference: None,
            items: vec![
                JournalItemInput {
                    account_id: cash,
                    amount: dec!(300),
                    side: EntrySide::Debit,
                },
                JournalItemInput {
                    account_id: cash,
                    amount: dec!(100),
                    side: EntrySide::Credit,
                },
                JournalItemInput {
                    account_id: income,
                    amount: dec!(200),
                    side: EntrySide::Credit,
                },
            ],
        };
        service.post_journal_entry(&ctx, &input).unwrap();

        let store = &service.store;
        assert_eq!(
            store.accounts.get(ctx.institution_id, &cash).unwrap().balance,
            dec!(200)
        );
    }
}
