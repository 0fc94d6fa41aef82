//! Multi-level approval request state machine.
//!
//! This module implements the governance engine shared by every
//! business module:
//!
//! - `types` - Workflow policies, request status, decision records
//! - `engine` - Initiation outcome and level advancement logic
//! - `error` - Approval-specific error types
//!
//! The engine is deliberately decoupled from the documents it gates.
//! It communicates only via an opaque source document id and data
//! snapshot, so new trigger modules can be added without modifying it.

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{AdvanceOutcome, ApprovalEngine, InitiationOutcome};
pub use error::ApprovalError;
pub use types::{
    ApprovalDecision, ApprovalLevel, ApprovalStatus, DecisionRecord, WorkflowPolicy,
};
