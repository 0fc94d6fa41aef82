//! Persistent document shapes, one module per business area.
//!
//! Documents are plain serde-derived structs; lifecycle rules live in
//! the core crate and the orchestration services, not here.

pub mod governance;
pub mod inventory;
pub mod ledger;
pub mod payroll;
pub mod setup;
pub mod trade;
