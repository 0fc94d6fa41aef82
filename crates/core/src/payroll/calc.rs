//! Pure gross-to-net salary computation.
//!
//! Statutory model (Kenyan-style, parameterized per tenant):
//! NSSF is tax-deductible; SHA and the housing levy are computed on
//! uncapped gross and are not. PAYE is a graduated marginal schedule
//! with a personal relief floored at zero.

use rust_decimal::Decimal;
use kitabu_shared::types::percent_of;

use super::error::PayrollError;
use super::types::{
    DeductionComponent, EarningComponent, SalaryBreakdown, StatutorySettings, TaxBand,
};

/// Computes the gross-to-net breakdown for one employee.
///
/// All intermediates stay at full `Decimal` precision; callers round
/// to the minor unit only at posting/presentation time.
///
/// # Errors
///
/// Returns `PayrollError::NegativeBasicPay` if `basic_pay` is negative.
pub fn calculate_net_salary(
    basic_pay: Decimal,
    settings: &StatutorySettings,
    recurring_earnings: &[EarningComponent],
    recurring_deductions: &[DeductionComponent],
) -> Result<SalaryBreakdown, PayrollError> {
    if basic_pay < Decimal::ZERO {
        return Err(PayrollError::NegativeBasicPay);
    }

    let taxable_earnings: Decimal = recurring_earnings
        .iter()
        .filter(|e| e.category.is_taxable())
        .map(|e| e.amount)
        .sum();
    let non_taxable_earnings: Decimal = recurring_earnings
        .iter()
        .filter(|e| !e.category.is_taxable())
        .map(|e| e.amount)
        .sum();
    let gross_pay = basic_pay + taxable_earnings + non_taxable_earnings;

    let pensionable_earnings: Decimal = recurring_earnings
        .iter()
        .filter(|e| e.category.is_pensionable())
        .map(|e| e.amount)
        .sum();
    let pensionable_base = basic_pay + pensionable_earnings;

    // The tier II limit caps the monthly contribution.
    let nssf = percent_of(pensionable_base, settings.nssf_rate).min(settings.nssf_tier_ii_limit);

    // SHA and the housing levy apply to uncapped gross.
    let housing_levy = percent_of(gross_pay, settings.housing_levy_rate);
    let sha = percent_of(gross_pay, settings.sha_rate);

    // NSSF is tax-deductible; SHA and housing levy are not.
    let taxable_income = basic_pay + taxable_earnings - nssf;

    let gross_paye = compute_paye(taxable_income, &settings.paye_bands);
    let net_paye = (gross_paye - settings.personal_relief).max(Decimal::ZERO);

    let total_deductions: Decimal = recurring_deductions.iter().map(|d| d.amount).sum();

    let net_salary = gross_pay - (nssf + sha + housing_levy + net_paye) - total_deductions;

    Ok(SalaryBreakdown {
        basic_pay,
        taxable_earnings,
        non_taxable_earnings,
        gross_pay,
        pensionable_base,
        nssf,
        sha,
        housing_levy,
        taxable_income,
        gross_paye,
        net_paye,
        total_deductions,
        net_salary,
    })
}

/// Applies a graduated marginal tax schedule to taxable income.
///
/// For each band where `taxable_income > band.min`, the slice between
/// `band.min` and `min(taxable_income, band.max)` accrues tax at the
/// band's rate. Bands are evaluated in ascending `min` order.
#[must_use]
pub fn compute_paye(taxable_income: Decimal, bands: &[TaxBand]) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut ordered: Vec<&TaxBand> = bands.iter().collect();
    ordered.sort_by(|a, b| a.min.cmp(&b.min));

    let mut paye = Decimal::ZERO;
    for band in ordered {
        if taxable_income <= band.min {
            break;
        }
        let upper = band
            .max
            .map_or(taxable_income, |max| taxable_income.min(max));
        if upper > band.min {
            paye += percent_of(upper - band.min, band.rate);
        }
    }
    paye
}
