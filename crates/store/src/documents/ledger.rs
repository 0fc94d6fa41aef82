//! Chart of accounts, journal entries, and fiscal periods.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kitabu_core::budget::BudgetAllocation;
use kitabu_core::fiscal::FiscalPeriodStatus;
use kitabu_core::ledger::{AccountType, EntrySide};
use kitabu_shared::types::{AccountId, FiscalPeriodId, JournalEntryId, UserId};

/// A chart of accounts node.
///
/// `balance` is mutated exclusively by the ledger posting service;
/// every other component reads it and routes changes through journal
/// entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Account code (e.g. "5100").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Free-form subtype (e.g. "current_asset").
    pub subtype: Option<String>,
    /// Signed running balance (debits +, credits -).
    pub balance: Decimal,
    /// Whether the account accepts postings.
    pub is_active: bool,
    /// Whether budget variance reporting covers this account.
    pub is_tracked_for_budget: bool,
}

impl Account {
    /// Creates an active, zero-balance account.
    #[must_use]
    pub fn new(code: &str, name: &str, account_type: AccountType) -> Self {
        Self {
            id: AccountId::new(),
            code: code.to_string(),
            name: name.to_string(),
            account_type,
            subtype: None,
            balance: Decimal::ZERO,
            is_active: true,
            is_tracked_for_budget: false,
        }
    }
}

/// One line of a persisted journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalItem {
    /// The posted account.
    pub account_id: AccountId,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Debit or credit.
    pub side: EntrySide,
}

/// A persisted journal entry. Entries are posted atomically, always
/// balanced, and final; corrections are new compensating entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Sequence-issued entry number.
    pub entry_number: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Business event description.
    pub description: String,
    /// Caller-supplied idempotency reference.
    pub reference: Option<String>,
    /// Debit and credit lines.
    pub items: Vec<JournalItem>,
    /// The posting user.
    pub created_by: UserId,
    /// Posting timestamp.
    pub created_at: DateTime<Utc>,
}

/// A fiscal period with its owned budget allocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Unique identifier.
    pub id: FiscalPeriodId,
    /// Display name (e.g. "June 2024").
    pub name: String,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Open or closed.
    pub status: FiscalPeriodStatus,
    /// Per-account spending ceilings for this period.
    pub allocations: Vec<BudgetAllocation>,
}
