//! Tenant administration: chart of accounts, fiscal periods,
//! workflows, sequences, statutory settings, and master records.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use kitabu_core::approval::WorkflowPolicy;
use kitabu_core::budget::BudgetAllocation;
use kitabu_core::fiscal::FiscalPeriodStatus;
use kitabu_core::ledger::AccountType;
use kitabu_core::payroll::StatutorySettings;
use kitabu_shared::types::{
    AccountId, ApprovalWorkflowId, AssetId, BatchId, FiscalPeriodId, ProductId, WalletId,
};
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::documents::governance::ApprovalWorkflow;
use kitabu_store::documents::inventory::{Batch, Product};
use kitabu_store::documents::ledger::{Account, FiscalPeriod};
use kitabu_store::documents::setup::{DocumentSequence, TenantSetup};
use kitabu_store::documents::trade::{CustomerWallet, FixedAsset};
use kitabu_store::DocumentStore;

/// Input for registering a fixed asset.
#[derive(Debug, Clone)]
pub struct RegisterAssetInput {
    /// Asset name.
    pub name: String,
    /// Acquisition cost.
    pub cost: Decimal,
    /// Residual value at end of life.
    pub salvage_value: Decimal,
    /// Depreciation horizon in months.
    pub useful_life_months: u32,
    /// Acquisition date.
    pub acquired_on: NaiveDate,
}

/// Tenant administration service.
#[derive(Clone)]
pub struct AdminService {
    store: Arc<DocumentStore>,
}

impl AdminService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates an active, zero-balance account.
    pub fn create_account(
        &self,
        ctx: &TenantCtx,
        code: &str,
        name: &str,
        account_type: AccountType,
    ) -> AppResult<AccountId> {
        let account = Account::new(code, name, account_type);
        let id = account.id;
        self.put(move |store, tx| {
            tx.put(&store.accounts, ctx.institution_id, id, account.clone());
        })?;
        Ok(id)
    }

    /// Marks an account as budget-tracked.
    pub fn track_account_for_budget(&self, ctx: &TenantCtx, account_id: AccountId) -> AppResult<()> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            let mut account = tx
                .read(&store.accounts, ctx.institution_id, &account_id)
                .ok_or_else(|| AppError::NotFound(format!("Account {account_id}")))?;
            account.is_tracked_for_budget = true;
            tx.put(&store.accounts, ctx.institution_id, account_id, account);
            Ok(())
        })
    }

    /// Creates an open fiscal period with its budget allocations.
    pub fn create_fiscal_period(
        &self,
        ctx: &TenantCtx,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        allocations: Vec<BudgetAllocation>,
    ) -> AppResult<FiscalPeriodId> {
        if end_date < start_date {
            return Err(AppError::Validation(
                "Fiscal period end date precedes its start date".to_string(),
            ));
        }
        let period = FiscalPeriod {
            id: FiscalPeriodId::new(),
            name: name.to_string(),
            start_date,
            end_date,
            status: FiscalPeriodStatus::Open,
            allocations,
        };
        let id = period.id;
        self.put(move |store, tx| {
            tx.put(&store.fiscal_periods, ctx.institution_id, id, period.clone());
        })?;
        Ok(id)
    }

    /// Closes a fiscal period to further activity.
    pub fn close_fiscal_period(&self, ctx: &TenantCtx, period_id: FiscalPeriodId) -> AppResult<()> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            let mut period = tx
                .read(&store.fiscal_periods, ctx.institution_id, &period_id)
                .ok_or_else(|| AppError::NotFound(format!("Fiscal period {period_id}")))?;
            period.status = FiscalPeriodStatus::Closed;
            tx.put(&store.fiscal_periods, ctx.institution_id, period_id, period);
            Ok(())
        })
    }

    /// Registers an approval workflow policy.
    pub fn create_workflow(
        &self,
        ctx: &TenantCtx,
        policy: WorkflowPolicy,
    ) -> AppResult<ApprovalWorkflowId> {
        if policy.levels.is_empty() {
            return Err(kitabu_core::approval::ApprovalError::NoLevels.into());
        }
        let workflow = ApprovalWorkflow {
            id: ApprovalWorkflowId::new(),
            policy,
        };
        let id = workflow.id;
        self.put(move |store, tx| {
            tx.put(&store.workflows, ctx.institution_id, id, workflow.clone());
        })?;
        Ok(id)
    }

    /// Creates or replaces a document number sequence.
    pub fn create_sequence(
        &self,
        ctx: &TenantCtx,
        sequence_id: &str,
        prefix: &str,
        padding: usize,
    ) -> AppResult<()> {
        let sequence = DocumentSequence {
            prefix: prefix.to_string(),
            padding,
            next_number: 1,
        };
        let key = sequence_id.to_string();
        self.put(move |store, tx| {
            tx.put(&store.sequences, ctx.institution_id, key.clone(), sequence.clone());
        })
    }

    /// Sets the tenant's statutory payroll parameters.
    pub fn set_statutory_settings(
        &self,
        ctx: &TenantCtx,
        settings: StatutorySettings,
    ) -> AppResult<()> {
        self.put(move |store, tx| {
            tx.put(&store.statutory_settings, ctx.institution_id, (), settings.clone());
        })
    }

    /// Sets the tenant's module account mappings.
    pub fn set_tenant_setup(&self, ctx: &TenantCtx, setup: TenantSetup) -> AppResult<()> {
        self.put(move |store, tx| {
            tx.put(&store.tenant_setup, ctx.institution_id, (), setup.clone());
        })
    }

    /// Registers a product.
    pub fn create_product(
        &self,
        ctx: &TenantCtx,
        sku: &str,
        name: &str,
        unit_cost: Decimal,
    ) -> AppResult<ProductId> {
        let product = Product {
            id: ProductId::new(),
            sku: sku.to_string(),
            name: name.to_string(),
            unit_cost,
            total_stock: Decimal::ZERO,
            is_active: true,
        };
        let id = product.id;
        self.put(move |store, tx| {
            tx.put(&store.products, ctx.institution_id, id, product.clone());
        })?;
        Ok(id)
    }

    /// Registers an empty batch for a product.
    pub fn create_batch(
        &self,
        ctx: &TenantCtx,
        product_id: ProductId,
        batch_number: &str,
        expiry_date: Option<NaiveDate>,
    ) -> AppResult<BatchId> {
        let store = self.store.as_ref();
        let batch_id = BatchId::new();
        store.run_transaction(|tx| -> AppResult<()> {
            tx.read(&store.products, ctx.institution_id, &product_id)
                .ok_or_else(|| AppError::NotFound(format!("Product {product_id}")))?;
            tx.put(
                &store.batches,
                ctx.institution_id,
                batch_id,
                Batch {
                    id: batch_id,
                    product_id,
                    batch_number: batch_number.to_string(),
                    quantity: Decimal::ZERO,
                    expiry_date,
                },
            );
            Ok(())
        })?;
        Ok(batch_id)
    }

    /// Opens a customer wallet.
    pub fn create_wallet(&self, ctx: &TenantCtx, customer_name: &str) -> AppResult<WalletId> {
        let wallet = CustomerWallet {
            id: WalletId::new(),
            customer_name: customer_name.to_string(),
            balance: Decimal::ZERO,
            loyalty_points: Decimal::ZERO,
        };
        let id = wallet.id;
        self.put(move |store, tx| {
            tx.put(&store.wallets, ctx.institution_id, id, wallet.clone());
        })?;
        Ok(id)
    }

    /// Registers a depreciable fixed asset.
    pub fn register_asset(&self, ctx: &TenantCtx, input: &RegisterAssetInput) -> AppResult<AssetId> {
        if input.salvage_value > input.cost {
            return Err(AppError::Validation(
                "Salvage value cannot exceed cost".to_string(),
            ));
        }
        let asset = FixedAsset {
            id: AssetId::new(),
            name: input.name.clone(),
            cost: input.cost,
            salvage_value: input.salvage_value,
            useful_life_months: input.useful_life_months,
            accumulated_depreciation: Decimal::ZERO,
            acquired_on: input.acquired_on,
            is_active: true,
        };
        let id = asset.id;
        self.put(move |store, tx| {
            tx.put(&store.fixed_assets, ctx.institution_id, id, asset.clone());
        })?;
        Ok(id)
    }

    fn put(
        &self,
        stage: impl for<'s> Fn(&'s DocumentStore, &mut kitabu_store::Tx<'s>),
    ) -> AppResult<()> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            stage(store, tx);
            Ok(())
        })
    }
}
