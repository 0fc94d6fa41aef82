//! Property tests for the gross-to-net computation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calc::{calculate_net_salary, compute_paye};
use super::types::StatutorySettings;
use kitabu_shared::types::percent_of;

fn pay_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..200_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The breakdown always reconciles: net pay plus every withholding
    /// equals gross pay.
    #[test]
    fn prop_breakdown_reconciles(basic in pay_strategy()) {
        let settings = StatutorySettings::kenya_2024();
        let b = calculate_net_salary(basic, &settings, &[], &[]).unwrap();
        prop_assert_eq!(
            b.net_salary + b.nssf + b.sha + b.housing_levy + b.net_paye + b.total_deductions,
            b.gross_pay
        );
    }

    /// PAYE is monotonically non-decreasing in taxable income.
    #[test]
    fn prop_paye_monotonic(a in pay_strategy(), b in pay_strategy()) {
        let settings = StatutorySettings::kenya_2024();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            compute_paye(lo, &settings.paye_bands) <= compute_paye(hi, &settings.paye_bands)
        );
    }

    /// Marginal schedule bound: PAYE never exceeds the top rate applied
    /// to the whole income.
    #[test]
    fn prop_paye_bounded_by_top_rate(income in pay_strategy()) {
        let settings = StatutorySettings::kenya_2024();
        let paye = compute_paye(income, &settings.paye_bands);
        prop_assert!(paye <= percent_of(income, Decimal::from(35)));
        prop_assert!(paye >= Decimal::ZERO);
    }

    /// NSSF never exceeds the tier II limit.
    #[test]
    fn prop_nssf_capped(basic in pay_strategy()) {
        let settings = StatutorySettings::kenya_2024();
        let b = calculate_net_salary(basic, &settings, &[], &[]).unwrap();
        prop_assert!(b.nssf <= settings.nssf_tier_ii_limit);
        prop_assert_eq!(
            b.nssf,
            percent_of(b.pensionable_base, settings.nssf_rate)
                .min(settings.nssf_tier_ii_limit)
        );
    }

    /// Identical inputs always produce identical breakdowns.
    #[test]
    fn prop_deterministic(basic in pay_strategy()) {
        let settings = StatutorySettings::kenya_2024();
        let first = calculate_net_salary(basic, &settings, &[], &[]).unwrap();
        let second = calculate_net_salary(basic, &settings, &[], &[]).unwrap();
        prop_assert_eq!(first, second);
    }
}
