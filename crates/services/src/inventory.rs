//! Stock movements with deferred effects for governance-gated
//! write-offs.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use kitabu_core::inventory::{
    InventoryError, LedgerImpactDirection, MovementStatus, MovementType,
};
use kitabu_core::ledger::{EntrySide, JournalEntryInput, JournalItemInput};
use kitabu_shared::types::money::round_minor;
use kitabu_shared::types::{BatchId, ProductId, StockMovementId};
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::documents::inventory::StockMovement;
use kitabu_store::{DocumentStore, Tx};

use crate::approval::{ensure_unlocked_in_tx, initiate_in_tx, ApprovalOutcome, InitiationParams};
use crate::ledger::post_in_tx;

/// Input for recording one stock movement.
#[derive(Debug, Clone)]
pub struct RecordMovementInput {
    /// The product moved.
    pub product_id: ProductId,
    /// The batch moved, when batch-tracked.
    pub batch_id: Option<BatchId>,
    /// Movement classification.
    pub movement_type: MovementType,
    /// Movement quantity; sign conventions follow the movement type.
    pub quantity: Decimal,
    /// Reason or narrative.
    pub description: String,
}

/// Applies the stock and ledger effects of one movement.
///
/// Runs inside the caller's transaction, both for immediately
/// completed movements and for pending ones resolving after approval.
fn apply_effects<'s>(
    tx: &mut Tx<'s>,
    store: &'s DocumentStore,
    ctx: &TenantCtx,
    movement: &StockMovement,
) -> AppResult<()> {
    let mut product = tx
        .read(&store.products, ctx.institution_id, &movement.product_id)
        .ok_or_else(|| InventoryError::ProductNotFound(movement.product_id.into_inner()))?;

    let delta = movement.movement_type.signed_delta(movement.quantity);
    if product.total_stock + delta < Decimal::ZERO {
        return Err(InventoryError::InsufficientStock {
            on_hand: product.total_stock,
            delta,
        }
        .into());
    }
    let value = round_minor(delta.abs() * product.unit_cost);
    product.total_stock += delta;
    tx.put(&store.products, ctx.institution_id, movement.product_id, product);

    if let Some(batch_id) = movement.batch_id {
        let mut batch = tx
            .read(&store.batches, ctx.institution_id, &batch_id)
            .ok_or_else(|| InventoryError::BatchNotFound(batch_id.into_inner()))?;
        if batch.product_id != movement.product_id {
            return Err(AppError::Validation(format!(
                "Batch {} does not hold product {}",
                batch.batch_number, movement.product_id
            )));
        }
        if batch.quantity + delta < Decimal::ZERO {
            return Err(InventoryError::InsufficientStock {
                on_hand: batch.quantity,
                delta,
            }
            .into());
        }
        batch.quantity += delta;
        tx.put(&store.batches, ctx.institution_id, batch_id, batch);
    }

    let direction = LedgerImpactDirection::from_delta(delta);
    let items = if direction == LedgerImpactDirection::None {
        Vec::new()
    } else {
        let setup = tx
            .read(&store.tenant_setup, ctx.institution_id, &())
            .ok_or_else(|| AppError::ConfigurationMissing("tenant setup".to_string()))?;
        let accounts = *setup.inventory()?;
        match direction {
            LedgerImpactDirection::WriteDown => vec![
                JournalItemInput {
                    account_id: accounts.shrinkage_expense,
                    amount: value,
                    side: EntrySide::Debit,
                },
                JournalItemInput {
                    account_id: accounts.stock_asset,
                    amount: value,
                    side: EntrySide::Credit,
                },
            ],
            LedgerImpactDirection::WriteUp | LedgerImpactDirection::None => vec![
                JournalItemInput {
                    account_id: accounts.stock_asset,
                    amount: value,
                    side: EntrySide::Debit,
                },
                JournalItemInput {
                    account_id: accounts.adjustment_equity,
                    amount: value,
                    side: EntrySide::Credit,
                },
            ],
        }
    };
    if !items.is_empty() && value > Decimal::ZERO {
        post_in_tx(
            tx,
            store,
            ctx,
            &JournalEntryInput {
                date: Utc::now().date_naive(),
                description: movement.description.clone(),
                reference: Some(format!("MOV-{}", movement.id)),
                items,
            },
        )?;
    }
    Ok(())
}

/// Inventory movement orchestration service.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<DocumentStore>,
}

impl InventoryService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Records one stock movement.
    ///
    /// Write-offs (damage, negative adjustments) consult the
    /// "inventory" approval policy first; when gated, the movement is
    /// persisted as pending and stock and ledger stay untouched until
    /// [`InventoryService::complete_pending_movement`] resolves it.
    pub fn record_stock_movement(
        &self,
        ctx: &TenantCtx,
        input: &RecordMovementInput,
    ) -> AppResult<StockMovementId> {
        let store = self.store.as_ref();
        let movement_id = store.run_transaction(|tx| {
            let product = tx
                .read(&store.products, ctx.institution_id, &input.product_id)
                .ok_or_else(|| InventoryError::ProductNotFound(input.product_id.into_inner()))?;
            if !product.is_active {
                return Err(AppError::Validation(format!(
                    "Product {} is inactive",
                    product.sku
                )));
            }

            let delta = input.movement_type.signed_delta(input.quantity);
            let value = round_minor(delta.abs() * product.unit_cost);
            let is_write_off = matches!(input.movement_type, MovementType::Damage)
                || (matches!(input.movement_type, MovementType::Adjustment)
                    && delta < Decimal::ZERO);

            let mut movement = StockMovement {
                id: StockMovementId::new(),
                product_id: input.product_id,
                batch_id: input.batch_id,
                movement_type: input.movement_type,
                quantity: input.quantity,
                status: MovementStatus::Completed,
                description: input.description.clone(),
                approval_request_id: None,
                moved_by: ctx.user_id,
                moved_at: Utc::now(),
            };

            if is_write_off {
                let outcome = initiate_in_tx(
                    tx,
                    store,
                    ctx,
                    InitiationParams {
                        module: "inventory",
                        action: "write_off",
                        source_doc_id: movement.id.into_inner(),
                        amount: value,
                        data: serde_json::json!({
                            "product_id": input.product_id,
                            "quantity": input.quantity,
                            "value": value,
                        }),
                        force: false,
                    },
                );
                if let ApprovalOutcome::Pending(request_id) = outcome {
                    movement.status = MovementStatus::Pending;
                    movement.approval_request_id = Some(request_id);
                    let id = movement.id;
                    tx.put(&store.stock_movements, ctx.institution_id, id, movement);
                    return Ok(id);
                }
            }

            apply_effects(tx, store, ctx, &movement)?;
            let id = movement.id;
            tx.put(&store.stock_movements, ctx.institution_id, id, movement);
            Ok(id)
        })?;
        tracing::info!(%movement_id, "stock movement recorded");
        Ok(movement_id)
    }

    /// Applies the deferred effects of a pending movement once its
    /// approval request resolved. Fails with a governance lock while
    /// the request is still pending.
    pub fn complete_pending_movement(
        &self,
        ctx: &TenantCtx,
        movement_id: StockMovementId,
    ) -> AppResult<()> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            let mut movement = tx
                .read(&store.stock_movements, ctx.institution_id, &movement_id)
                .ok_or_else(|| AppError::NotFound(format!("Stock movement {movement_id}")))?;
            if movement.status != MovementStatus::Pending {
                return Err(AppError::InvalidState(format!(
                    "Stock movement {movement_id} is already completed"
                )));
            }
            ensure_unlocked_in_tx(
                tx,
                store,
                ctx,
                movement.approval_request_id,
                "This stock movement",
            )?;

            apply_effects(tx, store, ctx, &movement)?;
            movement.status = MovementStatus::Completed;
            tx.put(&store.stock_movements, ctx.institution_id, movement_id, movement);
            Ok(())
        })?;
        tracing::info!(%movement_id, "pending stock movement completed");
        Ok(())
    }
}
