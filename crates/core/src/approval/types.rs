//! Approval workflow domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kitabu_shared::types::UserId;

/// Status of an approval request.
///
/// `Approved`, `Rejected`, and `AutoApproved` are terminal; only a
/// `Pending` request accepts further decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting sign-off at the current level.
    Pending,
    /// All levels signed off.
    Approved,
    /// Rejected at some level; terminal immediately.
    Rejected,
    /// No policy applied or the amount was under the threshold.
    AutoApproved,
}

impl ApprovalStatus {
    /// Returns true if the request accepts further decisions.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if a gated source document may be finalized.
    #[must_use]
    pub fn unlocks_source(&self) -> bool {
        matches!(self, Self::Approved | Self::AutoApproved)
    }
}

/// A single sign-off level within a workflow policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalLevel {
    /// Human-readable level name (e.g. "Head of Department").
    pub name: String,
    /// Role expected to sign at this level.
    pub approver_role: String,
}

/// An approval workflow policy for one trigger module.
///
/// The trigger module is an open string key so that new business
/// modules can register policies without changes to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowPolicy {
    /// Module key this policy triggers on (e.g. "purchases").
    pub trigger_module: String,
    /// Ordered sign-off levels; a request must clear all of them.
    pub levels: Vec<ApprovalLevel>,
    /// Amounts at or under this threshold auto-approve.
    pub auto_approve_threshold: Option<Decimal>,
    /// Whether the policy is currently in force.
    pub is_active: bool,
}

/// A decision submitted against a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalDecision {
    /// Sign off the current level.
    Approve,
    /// Terminate the request.
    Reject,
}

/// Audit record of one decision, appended to the request history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// The level the decision was made at (1-based).
    pub level: u32,
    /// The user who decided.
    pub decided_by: UserId,
    /// The decision taken.
    pub decision: ApprovalDecision,
    /// Optional notes from the approver.
    pub notes: Option<String>,
    /// When the decision was made.
    pub decided_at: DateTime<Utc>,
}
