//! Property tests for the approval engine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::{AdvanceOutcome, ApprovalEngine, InitiationOutcome};
use super::types::{ApprovalDecision, ApprovalLevel, ApprovalStatus, WorkflowPolicy};

fn policy_with(levels: u32, threshold: Option<i64>) -> WorkflowPolicy {
    WorkflowPolicy {
        trigger_module: "expenses".to_string(),
        levels: (1..=levels)
            .map(|n| ApprovalLevel {
                name: format!("Level {n}"),
                approver_role: "approver".to_string(),
            })
            .collect(),
        auto_approve_threshold: threshold.map(|t| Decimal::new(t, 2)),
        is_active: true,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Threshold comparison is inclusive: amounts at or under the
    /// threshold never require approval.
    #[test]
    fn prop_threshold_is_inclusive(
        threshold in 0i64..10_000_000i64,
        below in 0i64..10_000_000i64,
    ) {
        let p = policy_with(2, Some(threshold));
        let amount = Decimal::new(below.min(threshold), 2);
        prop_assert_eq!(
            ApprovalEngine::resolve_initiation(Some(&p), amount),
            InitiationOutcome::AutoApproved
        );
    }

    /// Above the threshold, the reported level count always matches
    /// the policy definition.
    #[test]
    fn prop_levels_match_policy(
        levels in 1u32..8u32,
        threshold in 0i64..1_000_000i64,
        excess in 1i64..1_000_000i64,
    ) {
        let p = policy_with(levels, Some(threshold));
        let amount = Decimal::new(threshold + excess, 2);
        prop_assert_eq!(
            ApprovalEngine::resolve_initiation(Some(&p), amount),
            InitiationOutcome::RequiresApproval { total_levels: levels }
        );
    }

    /// Walking a request through approvals at every level ends in
    /// exactly one terminal `Approved` after `total_levels` decisions.
    #[test]
    fn prop_full_approval_chain_terminates(levels in 1u32..8u32) {
        let mut current = 1u32;
        let mut decisions = 0u32;
        loop {
            decisions += 1;
            match ApprovalEngine::advance(
                ApprovalStatus::Pending,
                current,
                levels,
                ApprovalDecision::Approve,
            )
            .unwrap()
            {
                AdvanceOutcome::Approved => break,
                AdvanceOutcome::StillPending { next_level } => {
                    prop_assert_eq!(next_level, current + 1);
                    current = next_level;
                }
                AdvanceOutcome::Rejected => prop_assert!(false, "approve never rejects"),
            }
        }
        prop_assert_eq!(decisions, levels);
    }

    /// Rejection is terminal from any level.
    #[test]
    fn prop_reject_always_terminal(levels in 1u32..8u32, at in 1u32..8u32) {
        let at = at.min(levels);
        let outcome = ApprovalEngine::advance(
            ApprovalStatus::Pending,
            at,
            levels,
            ApprovalDecision::Reject,
        )
        .unwrap();
        prop_assert_eq!(outcome, AdvanceOutcome::Rejected);
    }
}
