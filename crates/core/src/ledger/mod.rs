//! Double-entry journal validation and balance deltas.
//!
//! This module implements the core ledger rules:
//! - Entry sides (debits and credits) and signed balance deltas
//! - Journal entry input types
//! - Business rule validation (non-empty, non-negative, balanced)
//! - Error types for ledger operations

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use types::{
    AccountType, EntrySide, EntryTotals, JournalEntryInput, JournalItemInput,
};
pub use validation::validate_items;
