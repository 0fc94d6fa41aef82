//! Approval workflow policies and request instances.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kitabu_core::approval::{ApprovalStatus, DecisionRecord, WorkflowPolicy};
use kitabu_shared::types::{ApprovalRequestId, ApprovalWorkflowId, UserId};

/// A persisted workflow policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalWorkflow {
    /// Unique identifier.
    pub id: ApprovalWorkflowId,
    /// The policy definition (trigger module, levels, threshold).
    pub policy: WorkflowPolicy,
}

/// A persisted approval request.
///
/// The request carries an opaque snapshot of the gated document; the
/// governance engine never reads business fields out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Unique identifier.
    pub id: ApprovalRequestId,
    /// The workflow that spawned this request.
    pub workflow_id: ApprovalWorkflowId,
    /// Trigger module key (e.g. "purchases").
    pub module: String,
    /// The action being authorized (e.g. "create").
    pub action: String,
    /// The gated document's id, opaque to the engine.
    pub source_doc_id: Uuid,
    /// Snapshot of the gated document at request time.
    pub data: serde_json::Value,
    /// The monetary amount evaluated against the policy threshold.
    pub amount: Decimal,
    /// Current request status.
    pub status: ApprovalStatus,
    /// The level awaiting sign-off (1-based).
    pub current_level: u32,
    /// Total levels in the workflow.
    pub total_levels: u32,
    /// Decisions taken so far, in order.
    pub history: Vec<DecisionRecord>,
    /// The requesting user.
    pub requested_by: UserId,
    /// Request timestamp.
    pub requested_at: DateTime<Utc>,
}
