//! Per-tenant setup: module account mappings and document sequences.

use serde::{Deserialize, Serialize};

use kitabu_shared::types::AccountId;
use kitabu_shared::{AppError, AppResult};

/// Account mappings for payroll posting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayrollAccounts {
    /// Debited for total gross pay at finalization.
    pub salary_expense: AccountId,
    /// Credited for total net pay; cleared at settlement.
    pub net_salaries_payable: AccountId,
    /// Credited for total net PAYE.
    pub paye_payable: AccountId,
    /// Credited for combined NSSF, SHA, and housing levy.
    pub statutory_payable: AccountId,
    /// Credited for recurring deductions and loan recoveries.
    pub deductions_payable: AccountId,
}

/// Account mappings for sales invoicing and wallet operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SalesAccounts {
    /// Debited when an invoice posts.
    pub accounts_receivable: AccountId,
    /// Credited when an invoice posts.
    pub revenue: AccountId,
    /// Debited when an invoice is paid or a wallet is topped up.
    pub cash: AccountId,
    /// Credited on wallet top-up, debited on redemption.
    pub wallet_liability: AccountId,
}

/// Account mappings for purchasing and goods receipt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PurchasingAccounts {
    /// Credited when goods are received.
    pub accounts_payable: AccountId,
}

/// Account mappings for inventory ledger impact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InventoryAccounts {
    /// The stock-on-hand asset account.
    pub stock_asset: AccountId,
    /// Debited for write-downs (damage, shrinkage).
    pub shrinkage_expense: AccountId,
    /// Credited for positive adjustments.
    pub adjustment_equity: AccountId,
}

/// Account mappings for expense disbursal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExpenseAccounts {
    /// Credited when an approved requisition is disbursed.
    pub cash: AccountId,
}

/// Account mappings for fixed-asset depreciation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssetAccounts {
    /// Debited for the monthly charge.
    pub depreciation_expense: AccountId,
    /// Credited for the monthly charge (contra-asset).
    pub accumulated_depreciation: AccountId,
}

/// The tenant's typed module configuration.
///
/// Each orchestration service resolves its own mapping up front and
/// fails with a configuration error naming the missing module before
/// touching any document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantSetup {
    /// Payroll posting accounts.
    pub payroll: Option<PayrollAccounts>,
    /// Whether payroll finalization auto-posts to the ledger.
    pub auto_post_payroll: bool,
    /// Sales posting accounts.
    pub sales: Option<SalesAccounts>,
    /// Purchasing posting accounts.
    pub purchasing: Option<PurchasingAccounts>,
    /// Inventory posting accounts.
    pub inventory: Option<InventoryAccounts>,
    /// Expense posting accounts.
    pub expenses: Option<ExpenseAccounts>,
    /// Depreciation posting accounts.
    pub assets: Option<AssetAccounts>,
}

impl TenantSetup {
    /// Payroll mapping or a configuration error naming the gap.
    pub fn payroll(&self) -> AppResult<&PayrollAccounts> {
        self.payroll
            .as_ref()
            .ok_or_else(|| AppError::ConfigurationMissing("payroll accounts".to_string()))
    }

    /// Sales mapping or a configuration error naming the gap.
    pub fn sales(&self) -> AppResult<&SalesAccounts> {
        self.sales
            .as_ref()
            .ok_or_else(|| AppError::ConfigurationMissing("sales accounts".to_string()))
    }

    /// Purchasing mapping or a configuration error naming the gap.
    pub fn purchasing(&self) -> AppResult<&PurchasingAccounts> {
        self.purchasing
            .as_ref()
            .ok_or_else(|| AppError::ConfigurationMissing("purchasing accounts".to_string()))
    }

    /// Inventory mapping or a configuration error naming the gap.
    pub fn inventory(&self) -> AppResult<&InventoryAccounts> {
        self.inventory
            .as_ref()
            .ok_or_else(|| AppError::ConfigurationMissing("inventory accounts".to_string()))
    }

    /// Expense mapping or a configuration error naming the gap.
    pub fn expenses(&self) -> AppResult<&ExpenseAccounts> {
        self.expenses
            .as_ref()
            .ok_or_else(|| AppError::ConfigurationMissing("expense accounts".to_string()))
    }

    /// Asset mapping or a configuration error naming the gap.
    pub fn assets(&self) -> AppResult<&AssetAccounts> {
        self.assets
            .as_ref()
            .ok_or_else(|| AppError::ConfigurationMissing("asset accounts".to_string()))
    }
}

/// A gapless per-document-type number sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSequence {
    /// Number prefix (e.g. "INV-").
    pub prefix: String,
    /// Zero-padding width.
    pub padding: usize,
    /// The next number to issue.
    pub next_number: u64,
}
