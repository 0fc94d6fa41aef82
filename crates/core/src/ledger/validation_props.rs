//! Property tests for journal entry validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{EntrySide, JournalItemInput};
use super::validation::validate_items;
use kitabu_shared::types::AccountId;

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn amounts_strategy(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(amount_strategy(), 1..=max_len)
}

fn mirrored_entry(amounts: &[Decimal]) -> Vec<JournalItemInput> {
    let mut items = Vec::with_capacity(amounts.len() * 2);
    for amount in amounts {
        items.push(JournalItemInput {
            account_id: AccountId::new(),
            amount: *amount,
            side: EntrySide::Debit,
        });
        items.push(JournalItemInput {
            account_id: AccountId::new(),
            amount: *amount,
            side: EntrySide::Credit,
        });
    }
    items
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any entry whose credit legs mirror its debit legs validates.
    #[test]
    fn prop_mirrored_entries_are_balanced(amounts in amounts_strategy(10)) {
        let items = mirrored_entry(&amounts);
        let totals = validate_items(&items).unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debits, totals.credits);
    }

    /// Perturbing one leg of a balanced non-trivial entry always fails
    /// validation with an imbalance.
    #[test]
    fn prop_perturbed_entries_are_rejected(
        amounts in amounts_strategy(10),
        delta in 1i64..1_000_000i64,
    ) {
        let mut items = mirrored_entry(&amounts);
        items[0].amount += Decimal::new(delta, 2);
        let rejected_as_imbalanced = matches!(
            validate_items(&items),
            Err(super::error::LedgerError::Imbalanced { .. })
        );
        prop_assert!(rejected_as_imbalanced);
    }

    /// Totals reported by validation equal the arithmetic sums of the legs.
    #[test]
    fn prop_totals_match_leg_sums(amounts in amounts_strategy(10)) {
        let items = mirrored_entry(&amounts);
        let totals = validate_items(&items).unwrap();
        let expected: Decimal = amounts.iter().copied().sum();
        prop_assert_eq!(totals.debits, expected);
        prop_assert_eq!(totals.credits, expected);
    }

    /// Signed deltas across a balanced entry sum to zero, so posting a
    /// balanced entry never changes the net of all account balances.
    #[test]
    fn prop_signed_deltas_sum_to_zero(amounts in amounts_strategy(10)) {
        let items = mirrored_entry(&amounts);
        let net: Decimal = items
            .iter()
            .map(|i| i.side.signed_delta(i.amount))
            .sum();
        prop_assert_eq!(net, Decimal::ZERO);
    }
}
