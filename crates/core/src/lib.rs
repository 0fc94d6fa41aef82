//! Core business logic for Kitabu.
//!
//! This crate contains pure business logic with ZERO web or store
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry journal validation and balance deltas
//! - `payroll` - Gross-to-net statutory payroll computation
//! - `approval` - Multi-level approval request state machine
//! - `budget` - Budget allocation variance analysis
//! - `inventory` - Stock movement deltas and ledger impact polarity
//! - `sequence` - Human-readable document number formatting
//! - `fiscal` - Fiscal period types

pub mod approval;
pub mod budget;
pub mod fiscal;
pub mod inventory;
pub mod ledger;
pub mod payroll;
pub mod sequence;
