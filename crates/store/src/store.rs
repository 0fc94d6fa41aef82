//! The tenant-partitioned document store.

use parking_lot::Mutex;

use kitabu_core::payroll::StatutorySettings;
use kitabu_shared::config::StoreConfig;
use kitabu_shared::types::{
    AccountId, ApprovalRequestId, ApprovalWorkflowId, AssetId, BatchId, EmployeeId,
    FiscalPeriodId, InvoiceId, JournalEntryId, PayrollRunId, PayslipId, ProductId,
    PurchaseOrderId, RequisitionId, StockMovementId, WalletId,
};

use crate::documents::governance::{ApprovalRequest, ApprovalWorkflow};
use crate::documents::inventory::{Batch, Product, StockMovement};
use crate::documents::ledger::{Account, FiscalPeriod, JournalEntry};
use crate::documents::payroll::{Employee, PayrollRun, Payslip};
use crate::documents::setup::{DocumentSequence, TenantSetup};
use crate::documents::trade::{
    CustomerWallet, ExpenseRequisition, FixedAsset, Invoice, PurchaseOrder,
};
use crate::tx::{Collection, StoreError, Tx};

/// All collections plus the commit lock and retry budget.
///
/// Services hold the store behind an `Arc` and run every
/// multi-document mutation through [`DocumentStore::run_transaction`].
/// Collections are public for reads; writes outside a transaction are
/// not representable because the mutating methods are crate-private.
pub struct DocumentStore {
    config: StoreConfig,
    commit_lock: Mutex<()>,

    /// Chart of accounts.
    pub accounts: Collection<AccountId, Account>,
    /// Posted journal entries.
    pub journal_entries: Collection<JournalEntryId, JournalEntry>,
    /// Idempotency index: caller-supplied reference to posted entry.
    pub journal_entry_refs: Collection<String, JournalEntryId>,
    /// Fiscal periods with budget allocations.
    pub fiscal_periods: Collection<FiscalPeriodId, FiscalPeriod>,
    /// Approval workflow policies.
    pub workflows: Collection<ApprovalWorkflowId, ApprovalWorkflow>,
    /// Approval request instances.
    pub approval_requests: Collection<ApprovalRequestId, ApprovalRequest>,
    /// Per-tenant statutory settings singleton.
    pub statutory_settings: Collection<(), StatutorySettings>,
    /// Per-tenant module configuration singleton.
    pub tenant_setup: Collection<(), TenantSetup>,
    /// Document number sequences, keyed by sequence id.
    pub sequences: Collection<String, DocumentSequence>,
    /// Employees.
    pub employees: Collection<EmployeeId, Employee>,
    /// Payroll runs with owned items.
    pub payroll_runs: Collection<PayrollRunId, PayrollRun>,
    /// Immutable payslips.
    pub payslips: Collection<PayslipId, Payslip>,
    /// Products.
    pub products: Collection<ProductId, Product>,
    /// Stock batches.
    pub batches: Collection<BatchId, Batch>,
    /// Append-only stock movements.
    pub stock_movements: Collection<StockMovementId, StockMovement>,
    /// Sales invoices.
    pub invoices: Collection<InvoiceId, Invoice>,
    /// Purchase orders.
    pub purchase_orders: Collection<PurchaseOrderId, PurchaseOrder>,
    /// Expense requisitions.
    pub requisitions: Collection<RequisitionId, ExpenseRequisition>,
    /// Customer wallets.
    pub wallets: Collection<WalletId, CustomerWallet>,
    /// Fixed assets.
    pub fixed_assets: Collection<AssetId, FixedAsset>,
}

impl DocumentStore {
    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            commit_lock: Mutex::new(()),
            accounts: Collection::new("accounts"),
            journal_entries: Collection::new("journal_entries"),
            journal_entry_refs: Collection::new("journal_entry_refs"),
            fiscal_periods: Collection::new("fiscal_periods"),
            workflows: Collection::new("workflows"),
            approval_requests: Collection::new("approval_requests"),
            statutory_settings: Collection::new("statutory_settings"),
            tenant_setup: Collection::new("tenant_setup"),
            sequences: Collection::new("sequences"),
            employees: Collection::new("employees"),
            payroll_runs: Collection::new("payroll_runs"),
            payslips: Collection::new("payslips"),
            products: Collection::new("products"),
            batches: Collection::new("batches"),
            stock_movements: Collection::new("stock_movements"),
            invoices: Collection::new("invoices"),
            purchase_orders: Collection::new("purchase_orders"),
            requisitions: Collection::new("requisitions"),
            wallets: Collection::new("wallets"),
            fixed_assets: Collection::new("fixed_assets"),
        }
    }

    /// Runs a closure as one atomic optimistic transaction.
    ///
    /// The closure reads through the transaction (recording versions)
    /// and stages writes. On commit, the read set is validated under
    /// the commit lock; a conflict re-runs the whole closure, up to
    /// the configured retry budget. A business error returned by the
    /// closure propagates immediately and commits nothing.
    ///
    /// # Errors
    ///
    /// Returns the closure's error unchanged, or a conflict error once
    /// retries are exhausted.
    pub fn run_transaction<'s, R, E>(
        &'s self,
        f: impl Fn(&mut Tx<'s>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let attempts = self.config.max_transaction_retries.max(1);
        for attempt in 1..=attempts {
            let mut tx = Tx::new();
            let result = f(&mut tx)?;

            let guard = self.commit_lock.lock();
            if tx.validate() {
                tx.commit();
                drop(guard);
                return Ok(result);
            }
            drop(guard);
            tracing::debug!(attempt, "transaction read set went stale, retrying");
        }
        Err(StoreError::Conflict { attempts }.into())
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
