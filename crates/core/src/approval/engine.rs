//! Approval engine: initiation outcome and level advancement.
//!
//! Stateless logic only; persisting and loading requests is the
//! caller's concern. The engine never inspects what the underlying
//! business document is.

use rust_decimal::Decimal;

use super::error::ApprovalError;
use super::types::{ApprovalDecision, ApprovalStatus, WorkflowPolicy};

/// Outcome of initiating an approval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitiationOutcome {
    /// No active policy applies, or the amount is at/under the
    /// threshold. Nothing is persisted.
    AutoApproved,
    /// A pending request must be persisted at level 1.
    RequiresApproval {
        /// Number of levels the request must clear.
        total_levels: u32,
    },
}

/// Outcome of advancing a pending request with one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Final level signed off; the request is terminal `Approved`.
    Approved,
    /// Rejected; terminal immediately regardless of level.
    Rejected,
    /// An intermediate level signed off; the request stays pending.
    StillPending {
        /// The next level awaiting sign-off (1-based).
        next_level: u32,
    },
}

/// Stateless engine for evaluating approval workflows.
pub struct ApprovalEngine;

impl ApprovalEngine {
    /// Determine whether a proposed action requires human sign-off.
    ///
    /// # Arguments
    /// * `policy` - The active workflow policy for the triggering
    ///   module, if one exists
    /// * `amount` - The monetary amount of the proposed action
    #[must_use]
    pub fn resolve_initiation(
        policy: Option<&WorkflowPolicy>,
        amount: Decimal,
    ) -> InitiationOutcome {
        let Some(policy) = policy.filter(|p| p.is_active && !p.levels.is_empty()) else {
            return InitiationOutcome::AutoApproved;
        };

        if let Some(threshold) = policy.auto_approve_threshold
            && amount <= threshold
        {
            return InitiationOutcome::AutoApproved;
        }

        InitiationOutcome::RequiresApproval {
            total_levels: u32::try_from(policy.levels.len()).unwrap_or(u32::MAX),
        }
    }

    /// Advance a pending request with one decision.
    ///
    /// A rejection terminates immediately; an approval at the final
    /// level transitions to `Approved`; otherwise the request remains
    /// pending at the next level.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::NotPending` if the request has already
    /// reached a terminal status.
    pub fn advance(
        status: ApprovalStatus,
        current_level: u32,
        total_levels: u32,
        decision: ApprovalDecision,
    ) -> Result<AdvanceOutcome, ApprovalError> {
        if !status.is_pending() {
            return Err(ApprovalError::NotPending { current: status });
        }

        match decision {
            ApprovalDecision::Reject => Ok(AdvanceOutcome::Rejected),
            ApprovalDecision::Approve if current_level >= total_levels => {
                Ok(AdvanceOutcome::Approved)
            }
            ApprovalDecision::Approve => Ok(AdvanceOutcome::StillPending {
                next_level: current_level + 1,
            }),
        }
    }
}
