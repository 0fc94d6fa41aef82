//! Governance: approval request initiation and decision processing.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use kitabu_core::approval::{
    AdvanceOutcome, ApprovalDecision, ApprovalEngine, ApprovalStatus, DecisionRecord,
    InitiationOutcome,
};
use kitabu_shared::types::{ApprovalRequestId, ApprovalWorkflowId};
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::documents::governance::ApprovalRequest;
use kitabu_store::{DocumentStore, Tx};

/// How an initiation resolved for the calling document service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// No policy applied or the amount cleared the threshold; the
    /// caller proceeds and nothing was persisted.
    AutoApproved,
    /// A pending request was persisted; the caller must lock the
    /// source document until it resolves.
    Pending(ApprovalRequestId),
}

/// Finds the active workflow for a trigger module.
fn active_workflow(
    store: &DocumentStore,
    ctx: &TenantCtx,
    module: &str,
) -> Option<ApprovalWorkflowId> {
    store
        .workflows
        .scan(ctx.institution_id, |_, workflow| {
            workflow.policy.is_active && workflow.policy.trigger_module == module
        })
        .into_iter()
        .map(|(id, _)| id)
        .next()
}

/// What a document service asks governance to authorize.
pub(crate) struct InitiationParams<'a> {
    /// Trigger module key (e.g. "purchases").
    pub module: &'a str,
    /// The action being authorized (e.g. "create").
    pub action: &'a str,
    /// The gated document's id, opaque to the engine.
    pub source_doc_id: Uuid,
    /// Amount evaluated against the policy threshold.
    pub amount: Decimal,
    /// Snapshot of the gated document.
    pub data: serde_json::Value,
    /// Skip the auto-approve threshold. Budget breaches use this so
    /// even small over-budget orders route through sign-off.
    pub force: bool,
}

/// Initiates governance for a document inside an open transaction.
///
/// The request (when one is needed) is persisted in the same
/// transaction that creates the source document, so no observer can
/// see a gated document without its request.
pub(crate) fn initiate_in_tx<'s>(
    tx: &mut Tx<'s>,
    store: &'s DocumentStore,
    ctx: &TenantCtx,
    params: InitiationParams<'_>,
) -> ApprovalOutcome {
    let Some(workflow_id) = active_workflow(store, ctx, params.module) else {
        return ApprovalOutcome::AutoApproved;
    };
    // Version-guard the policy so a deactivation racing this request
    // retries rather than gating against a dead workflow.
    let Some(workflow) = tx.read(&store.workflows, ctx.institution_id, &workflow_id) else {
        return ApprovalOutcome::AutoApproved;
    };

    let outcome = if params.force && !workflow.policy.levels.is_empty() {
        InitiationOutcome::RequiresApproval {
            total_levels: u32::try_from(workflow.policy.levels.len()).unwrap_or(u32::MAX),
        }
    } else {
        ApprovalEngine::resolve_initiation(Some(&workflow.policy), params.amount)
    };

    match outcome {
        InitiationOutcome::AutoApproved => ApprovalOutcome::AutoApproved,
        InitiationOutcome::RequiresApproval { total_levels } => {
            let request = ApprovalRequest {
                id: ApprovalRequestId::new(),
                workflow_id,
                module: params.module.to_string(),
                action: params.action.to_string(),
                source_doc_id: params.source_doc_id,
                data: params.data,
                amount: params.amount,
                status: ApprovalStatus::Pending,
                current_level: 1,
                total_levels,
                history: Vec::new(),
                requested_by: ctx.user_id,
                requested_at: Utc::now(),
            };
            let id = request.id;
            tx.put(&store.approval_requests, ctx.institution_id, id, request);
            tracing::info!(%id, module = params.module, action = params.action, "approval request opened");
            ApprovalOutcome::Pending(id)
        }
    }
}

/// Fails with a governance lock while a linked request is unresolved.
///
/// `label` names the document in the error message ("This invoice").
/// A rejected request surfaces as an invalid state, not a lock.
pub(crate) fn ensure_unlocked_in_tx<'s>(
    tx: &mut Tx<'s>,
    store: &'s DocumentStore,
    ctx: &TenantCtx,
    request_id: Option<ApprovalRequestId>,
    label: &str,
) -> AppResult<()> {
    let Some(request_id) = request_id else {
        return Ok(());
    };
    let request = tx
        .read(&store.approval_requests, ctx.institution_id, &request_id)
        .ok_or_else(|| AppError::NotFound(format!("Approval request {request_id}")))?;
    match request.status {
        ApprovalStatus::Pending => Err(AppError::GovernanceLock(label.to_string())),
        ApprovalStatus::Rejected => Err(AppError::InvalidState(format!(
            "{label} was rejected at approval level {}",
            request.current_level
        ))),
        ApprovalStatus::Approved | ApprovalStatus::AutoApproved => Ok(()),
    }
}

/// Multi-level approval workflow service.
#[derive(Clone)]
pub struct ApprovalService {
    store: Arc<DocumentStore>,
}

impl ApprovalService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Submits one decision against a pending request.
    ///
    /// Rejection is terminal at any level; approval at the final level
    /// resolves the request; otherwise it advances one level. Every
    /// decision is appended to the request history.
    pub fn submit_decision(
        &self,
        ctx: &TenantCtx,
        request_id: ApprovalRequestId,
        decision: ApprovalDecision,
        notes: Option<String>,
    ) -> AppResult<ApprovalStatus> {
        let store = self.store.as_ref();
        let status = store.run_transaction(|tx| -> AppResult<ApprovalStatus> {
            let mut request = tx
                .read(&store.approval_requests, ctx.institution_id, &request_id)
                .ok_or_else(|| AppError::NotFound(format!("Approval request {request_id}")))?;

            let outcome = ApprovalEngine::advance(
                request.status,
                request.current_level,
                request.total_levels,
                decision,
            )?;

            request.history.push(DecisionRecord {
                level: request.current_level,
                decided_by: ctx.user_id,
                decision,
                notes: notes.clone(),
                decided_at: Utc::now(),
            });
            match outcome {
                AdvanceOutcome::Approved => request.status = ApprovalStatus::Approved,
                AdvanceOutcome::Rejected => request.status = ApprovalStatus::Rejected,
                AdvanceOutcome::StillPending { next_level } => request.current_level = next_level,
            }
            let status = request.status;
            tx.put(&store.approval_requests, ctx.institution_id, request_id, request);
            Ok(status)
        })?;
        tracing::info!(%request_id, ?status, "approval decision recorded");
        Ok(status)
    }

    /// Reads a request's current status.
    pub fn request_status(
        &self,
        ctx: &TenantCtx,
        request_id: ApprovalRequestId,
    ) -> AppResult<ApprovalStatus> {
        self.store
            .approval_requests
            .get(ctx.institution_id, &request_id)
            .map(|request| request.status)
            .ok_or_else(|| AppError::NotFound(format!("Approval request {request_id}")))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use kitabu_core::approval::{ApprovalLevel, WorkflowPolicy};
    use kitabu_shared::types::{InstitutionId, UserId};
    use kitabu_store::documents::governance::ApprovalWorkflow;

    use super::*;

    fn store_with_policy(levels: usize, threshold: Option<Decimal>) -> (Arc<DocumentStore>, TenantCtx) {
        let store = Arc::new(DocumentStore::default());
        let ctx = TenantCtx::new(InstitutionId::new(), UserId::new());
        let workflow = ApprovalWorkflow {
            id: kitabu_shared::types::ApprovalWorkflowId::new(),
            policy: WorkflowPolicy {
                trigger_module: "purchases".to_string(),
                levels: (1..=levels)
                    .map(|n| ApprovalLevel {
                        name: format!("Level {n}"),
                        approver_role: "approver".to_string(),
                    })
                    .collect(),
                auto_approve_threshold: threshold,
                is_active: true,
            },
        };
        let id = workflow.id;
        store
            .run_transaction(|tx| -> AppResult<()> {
                tx.put(&store.workflows, ctx.institution_id, id, workflow.clone());
                Ok(())
            })
            .unwrap();
        (store, ctx)
    }

    fn initiate_for(
        store: &Arc<DocumentStore>,
        ctx: &TenantCtx,
        module: &str,
        amount: Decimal,
    ) -> ApprovalOutcome {
        let inner = store.as_ref();
        inner
            .run_transaction(|tx| -> AppResult<ApprovalOutcome> {
                Ok(initiate_in_tx(
                    tx,
                    inner,
                    ctx,
                    InitiationParams {
                        module,
                        action: "create",
                        source_doc_id: Uuid::now_v7(),
                        amount,
                        data: serde_json::json!({}),
                        force: false,
                    },
                ))
            })
            .unwrap()
    }

    fn initiate(store: &Arc<DocumentStore>, ctx: &TenantCtx, amount: Decimal) -> ApprovalOutcome {
        initiate_for(store, ctx, "purchases", amount)
    }

    #[test]
    fn test_no_policy_module_auto_approves() {
        let (store, ctx) = store_with_policy(2, None);
        let outcome = initiate_for(&store, &ctx, "sales", dec!(1_000_000));
        assert_eq!(outcome, ApprovalOutcome::AutoApproved);
        assert_eq!(store.approval_requests.scan(ctx.institution_id, |_, _| true).len(), 0);
    }

    #[test]
    fn test_under_threshold_persists_nothing() {
        let (store, ctx) = store_with_policy(2, Some(dec!(10000)));
        let outcome = initiate(&store, &ctx, dec!(9999));
        assert_eq!(outcome, ApprovalOutcome::AutoApproved);
        assert_eq!(store.approval_requests.scan(ctx.institution_id, |_, _| true).len(), 0);
    }

    #[test]
    fn test_over_threshold_opens_pending_request() {
        let (store, ctx) = store_with_policy(3, Some(dec!(10000)));
        let ApprovalOutcome::Pending(id) = initiate(&store, &ctx, dec!(15000)) else {
            panic!("expected a pending request");
        };
        let request = store.approval_requests.get(ctx.institution_id, &id).unwrap();
        assert_eq!(request.status, ApprovalStatus::Pending);
        assert_eq!(request.current_level, 1);
        assert_eq!(request.total_levels, 3);
    }

    #[test]
    fn test_full_approval_chain() {
        let (store, ctx) = store_with_policy(2, None);
        let ApprovalOutcome::Pending(id) = initiate(&store, &ctx, dec!(500)) else {
            panic!("expected a pending request");
        };
        let service = ApprovalService::new(Arc::clone(&store));

        let status = service
            .submit_decision(&ctx, id, ApprovalDecision::Approve, None)
            .unwrap();
        assert_eq!(status, ApprovalStatus::Pending);

        let status = service
            .submit_decision(&ctx, id, ApprovalDecision::Approve, Some("ok".to_string()))
            .unwrap();
        assert_eq!(status, ApprovalStatus::Approved);

        let request = store.approval_requests.get(ctx.institution_id, &id).unwrap();
        assert_eq!(request.history.len(), 2);
    }

    #[test]
    fn test_reject_is_terminal() {
        let (store, ctx) = store_with_policy(3, None);
        let ApprovalOutcome::Pending(id) = initiate(&store, &ctx, dec!(500)) else {
            panic!("expected a pending request");
        };
        let service = ApprovalService::new(Arc::clone(&store));

        let status = service
            .submit_decision(&ctx, id, ApprovalDecision::Reject, None)
            .unwrap();
        assert_eq!(status, ApprovalStatus::Rejected);

        let err = service
            .submit_decision(&ctx, id, ApprovalDecision::Approve, None)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }
}
