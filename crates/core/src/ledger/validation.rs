//! Business rule validation for journal entries.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntrySide, EntryTotals, JournalItemInput};

/// Validates a set of journal items before any write happens.
///
/// Checks that the items are non-empty, every amount is non-negative,
/// and total debits equal total credits.
///
/// # Errors
///
/// Returns an error if the items violate any of the above rules.
pub fn validate_items(items: &[JournalItemInput]) -> Result<EntryTotals, LedgerError> {
    if items.is_empty() {
        return Err(LedgerError::EmptyEntry);
    }

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;

    for item in items {
        if item.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        match item.side {
            EntrySide::Debit => debits += item.amount,
            EntrySide::Credit => credits += item.amount,
        }
    }

    let totals = EntryTotals::new(debits, credits);
    if !totals.is_balanced {
        return Err(LedgerError::Imbalanced { debits, credits });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitabu_shared::types::AccountId;
    use rust_decimal_macros::dec;

    fn make_item(side: EntrySide, amount: Decimal) -> JournalItemInput {
        JournalItemInput {
            account_id: AccountId::new(),
            amount,
            side,
        }
    }

    #[test]
    fn test_balanced_items() {
        let items = vec![
            make_item(EntrySide::Debit, dec!(100.00)),
            make_item(EntrySide::Credit, dec!(100.00)),
        ];
        let totals = validate_items(&items).unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.debits, dec!(100.00));
    }

    #[test]
    fn test_multi_leg_balanced() {
        // One debit split across three credits.
        let items = vec![
            make_item(EntrySide::Debit, dec!(50000)),
            make_item(EntrySide::Credit, dec!(42000)),
            make_item(EntrySide::Credit, dec!(5000)),
            make_item(EntrySide::Credit, dec!(3000)),
        ];
        assert!(validate_items(&items).is_ok());
    }

    #[test]
    fn test_unbalanced_items() {
        let items = vec![
            make_item(EntrySide::Debit, dec!(100.00)),
            make_item(EntrySide::Credit, dec!(50.00)),
        ];
        assert!(matches!(
            validate_items(&items),
            Err(LedgerError::Imbalanced { .. })
        ));
    }

    #[test]
    fn test_empty_entry() {
        let items: Vec<JournalItemInput> = vec![];
        assert!(matches!(validate_items(&items), Err(LedgerError::EmptyEntry)));
    }

    #[test]
    fn test_negative_amount() {
        let items = vec![
            make_item(EntrySide::Debit, dec!(-100)),
            make_item(EntrySide::Credit, dec!(-100)),
        ];
        assert!(matches!(
            validate_items(&items),
            Err(LedgerError::NegativeAmount)
        ));
    }

    #[test]
    fn test_zero_amounts_allowed() {
        // Amounts are non-negative; zero legs are tolerated.
        let items = vec![
            make_item(EntrySide::Debit, Decimal::ZERO),
            make_item(EntrySide::Credit, Decimal::ZERO),
        ];
        assert!(validate_items(&items).is_ok());
    }
}
