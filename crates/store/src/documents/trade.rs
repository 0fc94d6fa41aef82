//! Sales invoices, purchase orders, expense requisitions, customer
//! wallets, and fixed assets.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kitabu_shared::types::{
    AccountId, ApprovalRequestId, AssetId, InvoiceId, JournalEntryId, ProductId, PurchaseOrderId,
    RequisitionId, UserId, WalletId,
};
use kitabu_shared::types::money::round_minor;

/// Sales invoice lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Created, not yet posted.
    Draft,
    /// Locked behind a pending approval request.
    PendingApproval,
    /// Receivable and income posted.
    Posted,
    /// Cash received against the receivable.
    Paid,
}

/// One invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Line narrative.
    pub description: String,
    /// Quantity billed.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
}

impl InvoiceLine {
    /// Line total rounded to the minor unit.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        round_minor(self.quantity * self.unit_price)
    }
}

/// A sequence-numbered sales invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Sequence-issued invoice number.
    pub invoice_number: String,
    /// The billed customer.
    pub customer_name: String,
    /// Billed lines.
    pub lines: Vec<InvoiceLine>,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Governance request gating this invoice, when any.
    pub approval_request_id: Option<ApprovalRequestId>,
    /// The posting entry, once posted.
    pub journal_entry_id: Option<JournalEntryId>,
    /// Invoice date.
    pub issued_on: NaiveDate,
    /// The creating user.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Invoice total: sum of rounded line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::line_total).sum()
    }
}

/// Purchase order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    /// Within budget, or approval resolved; awaiting goods.
    Approved,
    /// Over budget; locked behind a pending approval request.
    PendingApproval,
    /// Rejected at some approval level.
    Rejected,
    /// Goods receipt recorded.
    Received,
}

/// One purchase order line, charged to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    /// The account this line will be charged to.
    pub account_id: AccountId,
    /// The stocked product received, when the line is stock.
    pub product_id: Option<ProductId>,
    /// Line narrative.
    pub description: String,
    /// Quantity ordered.
    pub quantity: Decimal,
    /// Cost per unit.
    pub unit_cost: Decimal,
}

impl PurchaseOrderLine {
    /// Line total rounded to the minor unit.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        round_minor(self.quantity * self.unit_cost)
    }
}

/// A sequence-numbered purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Unique identifier.
    pub id: PurchaseOrderId,
    /// Sequence-issued order number.
    pub po_number: String,
    /// The supplier.
    pub supplier_name: String,
    /// Ordered lines.
    pub lines: Vec<PurchaseOrderLine>,
    /// Lifecycle status.
    pub status: PurchaseOrderStatus,
    /// Governance request gating this order, when any.
    pub approval_request_id: Option<ApprovalRequestId>,
    /// The goods receipt entry, once received.
    pub journal_entry_id: Option<JournalEntryId>,
    /// Order date.
    pub ordered_on: NaiveDate,
    /// The creating user.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Order total: sum of rounded line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(PurchaseOrderLine::line_total).sum()
    }
}

/// Expense requisition lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequisitionStatus {
    /// Locked behind a pending approval request.
    PendingApproval,
    /// Authorized, not yet paid out.
    Approved,
    /// Rejected at some approval level.
    Rejected,
    /// Paid out; expense posted.
    Disbursed,
}

/// A sequence-numbered expense requisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRequisition {
    /// Unique identifier.
    pub id: RequisitionId,
    /// Sequence-issued requisition number.
    pub requisition_number: String,
    /// What the spend is for.
    pub purpose: String,
    /// Requested amount.
    pub amount: Decimal,
    /// The expense account to charge on disbursal.
    pub expense_account_id: AccountId,
    /// Lifecycle status.
    pub status: RequisitionStatus,
    /// Governance request gating this requisition, when any.
    pub approval_request_id: Option<ApprovalRequestId>,
    /// The disbursal entry, once disbursed.
    pub journal_entry_id: Option<JournalEntryId>,
    /// The requesting user.
    pub requested_by: UserId,
    /// Creation timestamp.
    pub requested_at: DateTime<Utc>,
}

/// A customer wallet with a loyalty point balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerWallet {
    /// Unique identifier.
    pub id: WalletId,
    /// The wallet holder.
    pub customer_name: String,
    /// Prepaid balance held as a liability.
    pub balance: Decimal,
    /// Accrued loyalty points.
    pub loyalty_points: Decimal,
}

/// A depreciable fixed asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedAsset {
    /// Unique identifier.
    pub id: AssetId,
    /// Asset name.
    pub name: String,
    /// Acquisition cost.
    pub cost: Decimal,
    /// Residual value at end of life.
    pub salvage_value: Decimal,
    /// Depreciation horizon in months.
    pub useful_life_months: u32,
    /// Depreciation charged to date.
    pub accumulated_depreciation: Decimal,
    /// Acquisition date.
    pub acquired_on: NaiveDate,
    /// Whether the asset is still in service.
    pub is_active: bool,
}

impl FixedAsset {
    /// Straight-line monthly charge, rounded to the minor unit.
    /// Zero once accumulated depreciation reaches the depreciable
    /// base or when the useful life is zero.
    #[must_use]
    pub fn monthly_charge(&self) -> Decimal {
        if self.useful_life_months == 0 {
            return Decimal::ZERO;
        }
        let depreciable = self.cost - self.salvage_value;
        let remaining = depreciable - self.accumulated_depreciation;
        if remaining <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let charge = round_minor(depreciable / Decimal::from(self.useful_life_months));
        charge.min(remaining)
    }
}
