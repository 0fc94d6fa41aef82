//! Purchase ordering with budget-routed approval and goods receipt.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use kitabu_core::inventory::{MovementStatus, MovementType};
use kitabu_core::ledger::{EntrySide, JournalEntryInput, JournalItemInput};
use kitabu_shared::types::{PurchaseOrderId, StockMovementId};
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::documents::inventory::StockMovement;
use kitabu_store::documents::trade::{PurchaseOrder, PurchaseOrderLine, PurchaseOrderStatus};
use kitabu_store::DocumentStore;

use crate::approval::{ensure_unlocked_in_tx, initiate_in_tx, ApprovalOutcome, InitiationParams};
use crate::budget::BudgetService;
use crate::ledger::post_in_tx;
use crate::sequence::{issue_in_tx, PURCHASE_ORDER_SEQUENCE};

/// Input for creating a purchase order.
#[derive(Debug, Clone)]
pub struct CreatePurchaseOrderInput {
    /// The supplier.
    pub supplier_name: String,
    /// Ordered lines, each charged to an account.
    pub lines: Vec<PurchaseOrderLine>,
    /// Order date.
    pub ordered_on: NaiveDate,
}

/// Purchase ordering orchestration service.
#[derive(Clone)]
pub struct PurchasingService {
    store: Arc<DocumentStore>,
    budget: BudgetService,
}

impl PurchasingService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        let budget = BudgetService::new(Arc::clone(&store));
        Self { store, budget }
    }

    /// Creates a sequence-numbered purchase order.
    ///
    /// The budget engine is consulted pre-commit: any line that would
    /// exceed its account's allocation routes the whole order through
    /// the "purchases" approval policy regardless of the auto-approve
    /// threshold. Within-budget orders only face the threshold.
    pub fn create_purchase_order(
        &self,
        ctx: &TenantCtx,
        input: &CreatePurchaseOrderInput,
    ) -> AppResult<PurchaseOrderId> {
        if input.lines.is_empty() {
            return Err(AppError::Validation(
                "Purchase order must have at least one line".to_string(),
            ));
        }
        let over_budget = input.lines.iter().any(|line| {
            self.budget.would_exceed_allocation(
                ctx,
                input.ordered_on,
                line.account_id,
                line.line_total(),
            )
        });

        let store = self.store.as_ref();
        let po_id = store.run_transaction(|tx| -> AppResult<PurchaseOrderId> {
            let mut order = PurchaseOrder {
                id: PurchaseOrderId::new(),
                po_number: issue_in_tx(tx, store, ctx.institution_id, PURCHASE_ORDER_SEQUENCE),
                supplier_name: input.supplier_name.clone(),
                lines: input.lines.clone(),
                status: PurchaseOrderStatus::Approved,
                approval_request_id: None,
                journal_entry_id: None,
                ordered_on: input.ordered_on,
                created_by: ctx.user_id,
                created_at: Utc::now(),
            };
            let outcome = initiate_in_tx(
                tx,
                store,
                ctx,
                InitiationParams {
                    module: "purchases",
                    action: "create",
                    source_doc_id: order.id.into_inner(),
                    amount: order.total(),
                    data: serde_json::json!({
                        "po_number": order.po_number,
                        "supplier_name": order.supplier_name,
                        "total": order.total(),
                        "over_budget": over_budget,
                    }),
                    force: over_budget,
                },
            );
            if let ApprovalOutcome::Pending(request_id) = outcome {
                order.status = PurchaseOrderStatus::PendingApproval;
                order.approval_request_id = Some(request_id);
            }
            let id = order.id;
            tx.put(&store.purchase_orders, ctx.institution_id, id, order);
            Ok(id)
        })?;
        tracing::info!(%po_id, over_budget, "purchase order created");
        Ok(po_id)
    }

    /// Records goods receipt for an approved order.
    ///
    /// Atomically bumps stock for product lines (with an In movement
    /// each), posts one entry debiting the line accounts and crediting
    /// accounts payable, and marks the order received.
    pub fn receive_goods(&self, ctx: &TenantCtx, po_id: PurchaseOrderId) -> AppResult<()> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            let mut order = tx
                .read(&store.purchase_orders, ctx.institution_id, &po_id)
                .ok_or_else(|| AppError::NotFound(format!("Purchase order {po_id}")))?;
            match order.status {
                PurchaseOrderStatus::Received => {
                    return Err(AppError::InvalidState(format!(
                        "Purchase order {} is already received",
                        order.po_number
                    )));
                }
                PurchaseOrderStatus::Rejected => {
                    return Err(AppError::InvalidState(format!(
                        "Purchase order {} was rejected",
                        order.po_number
                    )));
                }
                PurchaseOrderStatus::Approved | PurchaseOrderStatus::PendingApproval => {}
            }
            ensure_unlocked_in_tx(
                tx,
                store,
                ctx,
                order.approval_request_id,
                "This purchase order",
            )?;

            let accounts = *tx
                .read(&store.tenant_setup, ctx.institution_id, &())
                .ok_or_else(|| AppError::ConfigurationMissing("tenant setup".to_string()))?
                .purchasing()?;

            // Stock effect for product lines; the receipt entry below
            // is their ledger impact.
            for line in &order.lines {
                let Some(product_id) = line.product_id else {
                    continue;
                };
                let mut product = tx
                    .read(&store.products, ctx.institution_id, &product_id)
                    .ok_or_else(|| AppError::NotFound(format!("Product {product_id}")))?;
                product.total_stock += line.quantity;
                tx.put(&store.products, ctx.institution_id, product_id, product);

                let movement = StockMovement {
                    id: StockMovementId::new(),
                    product_id,
                    batch_id: None,
                    movement_type: MovementType::In,
                    quantity: line.quantity,
                    status: MovementStatus::Completed,
                    description: format!("Goods receipt for {}", order.po_number),
                    approval_request_id: None,
                    moved_by: ctx.user_id,
                    moved_at: Utc::now(),
                };
                tx.put(&store.stock_movements, ctx.institution_id, movement.id, movement);
            }

            let mut items: Vec<JournalItemInput> = order
                .lines
                .iter()
                .map(|line| JournalItemInput {
                    account_id: line.account_id,
                    amount: line.line_total(),
                    side: EntrySide::Debit,
                })
                .collect();
            items.push(JournalItemInput {
                account_id: accounts.accounts_payable,
                amount: order.total(),
                side: EntrySide::Credit,
            });
            let entry_id = post_in_tx(
                tx,
                store,
                ctx,
                &JournalEntryInput {
                    date: Utc::now().date_naive(),
                    description: format!("Goods receipt for {}", order.po_number),
                    reference: Some(format!("GRN-{po_id}")),
                    items,
                },
            )?;

            order.status = PurchaseOrderStatus::Received;
            order.journal_entry_id = Some(entry_id);
            tx.put(&store.purchase_orders, ctx.institution_id, po_id, order);
            Ok(())
        })?;
        tracing::info!(%po_id, "goods receipt recorded");
        Ok(())
    }
}
