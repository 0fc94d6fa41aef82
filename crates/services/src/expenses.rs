//! Expense requisitions: approval-gated spend with disbursal posting.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use kitabu_core::ledger::{EntrySide, JournalEntryInput, JournalItemInput};
use kitabu_shared::types::money::round_minor;
use kitabu_shared::types::{AccountId, RequisitionId};
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::documents::trade::{ExpenseRequisition, RequisitionStatus};
use kitabu_store::DocumentStore;

use crate::approval::{ensure_unlocked_in_tx, initiate_in_tx, ApprovalOutcome, InitiationParams};
use crate::ledger::post_in_tx;
use crate::sequence::{issue_in_tx, REQUISITION_SEQUENCE};

/// Input for raising an expense requisition.
#[derive(Debug, Clone)]
pub struct CreateRequisitionInput {
    /// What the spend is for.
    pub purpose: String,
    /// Requested amount.
    pub amount: Decimal,
    /// The expense account charged on disbursal.
    pub expense_account_id: AccountId,
}

/// Expense requisition orchestration service.
#[derive(Clone)]
pub struct ExpenseService {
    store: Arc<DocumentStore>,
}

impl ExpenseService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Raises a requisition, gated by the "expenses" approval policy.
    pub fn create_requisition(
        &self,
        ctx: &TenantCtx,
        input: &CreateRequisitionInput,
    ) -> AppResult<RequisitionId> {
        if input.amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Requisition amount must be positive".to_string(),
            ));
        }
        let store = self.store.as_ref();
        let requisition_id = store.run_transaction(|tx| -> AppResult<RequisitionId> {
            let mut requisition = ExpenseRequisition {
                id: RequisitionId::new(),
                requisition_number: issue_in_tx(tx, store, ctx.institution_id, REQUISITION_SEQUENCE),
                purpose: input.purpose.clone(),
                amount: input.amount,
                expense_account_id: input.expense_account_id,
                status: RequisitionStatus::Approved,
                approval_request_id: None,
                journal_entry_id: None,
                requested_by: ctx.user_id,
                requested_at: Utc::now(),
            };
            let outcome = initiate_in_tx(
                tx,
                store,
                ctx,
                InitiationParams {
                    module: "expenses",
                    action: "create",
                    source_doc_id: requisition.id.into_inner(),
                    amount: input.amount,
                    data: serde_json::json!({
                        "requisition_number": requisition.requisition_number,
                        "purpose": requisition.purpose,
                        "amount": requisition.amount,
                    }),
                    force: false,
                },
            );
            if let ApprovalOutcome::Pending(request_id) = outcome {
                requisition.status = RequisitionStatus::PendingApproval;
                requisition.approval_request_id = Some(request_id);
            }
            let id = requisition.id;
            tx.put(&store.requisitions, ctx.institution_id, id, requisition);
            Ok(id)
        })?;
        tracing::info!(%requisition_id, "expense requisition raised");
        Ok(requisition_id)
    }

    /// Disburses an authorized requisition: debits the expense
    /// account, credits cash. Fails with a governance lock while the
    /// approval request is unresolved.
    pub fn disburse(&self, ctx: &TenantCtx, requisition_id: RequisitionId) -> AppResult<()> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            let mut requisition = tx
                .read(&store.requisitions, ctx.institution_id, &requisition_id)
                .ok_or_else(|| AppError::NotFound(format!("Requisition {requisition_id}")))?;
            match requisition.status {
                RequisitionStatus::Disbursed => {
                    return Err(AppError::InvalidState(format!(
                        "Requisition {} is already disbursed",
                        requisition.requisition_number
                    )));
                }
                RequisitionStatus::Rejected => {
                    return Err(AppError::InvalidState(format!(
                        "Requisition {} was rejected",
                        requisition.requisition_number
                    )));
                }
                RequisitionStatus::Approved | RequisitionStatus::PendingApproval => {}
            }
            ensure_unlocked_in_tx(
                tx,
                store,
                ctx,
                requisition.approval_request_id,
                "This requisition",
            )?;

            let accounts = *tx
                .read(&store.tenant_setup, ctx.institution_id, &())
                .ok_or_else(|| AppError::ConfigurationMissing("tenant setup".to_string()))?
                .expenses()?;
            let amount = round_minor(requisition.amount);
            let entry_id = post_in_tx(
                tx,
                store,
                ctx,
                &JournalEntryInput {
                    date: Utc::now().date_naive(),
                    description: format!(
                        "Disbursal for {}: {}",
                        requisition.requisition_number, requisition.purpose
                    ),
                    reference: Some(format!("REQ-{requisition_id}")),
                    items: vec![
                        JournalItemInput {
                            account_id: requisition.expense_account_id,
                            amount,
                            side: EntrySide::Debit,
                        },
                        JournalItemInput {
                            account_id: accounts.cash,
                            amount,
                            side: EntrySide::Credit,
                        },
                    ],
                },
            )?;

            requisition.status = RequisitionStatus::Disbursed;
            requisition.journal_entry_id = Some(entry_id);
            tx.put(&store.requisitions, ctx.institution_id, requisition_id, requisition);
            Ok(())
        })?;
        tracing::info!(%requisition_id, "requisition disbursed");
        Ok(())
    }
}
