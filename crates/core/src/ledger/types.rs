//! Ledger domain types for journal entry creation and validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kitabu_shared::types::AccountId;

/// Entry side: either Debit or Credit.
///
/// Callers select the side per standard accounting polarity; the
/// engine applies `+amount` for debits and `-amount` for credits to
/// the running account balance and does not re-derive polarity from
/// the account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntrySide {
    /// Signed balance delta this side applies for a given amount.
    #[must_use]
    pub fn signed_delta(self, amount: Decimal) -> Decimal {
        match self {
            Self::Debit => amount,
            Self::Credit => -amount,
        }
    }
}

/// Chart of accounts node classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, inventory, receivables).
    Asset,
    /// Obligations owed (payables, statutory liabilities).
    Liability,
    /// Residual institutional interest.
    Equity,
    /// Revenue streams.
    Income,
    /// Operating costs.
    Expense,
}

/// Input for a single item in a journal entry.
#[derive(Debug, Clone)]
pub struct JournalItemInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// The amount (must be non-negative).
    pub amount: Decimal,
    /// Whether this is a debit or credit item.
    pub side: EntrySide,
}

/// Input for posting a new journal entry.
#[derive(Debug, Clone)]
pub struct JournalEntryInput {
    /// The date of the entry.
    pub date: NaiveDate,
    /// A description of the business event.
    pub description: String,
    /// Caller-supplied idempotency key; re-posting the same reference
    /// returns the existing entry without re-applying deltas.
    pub reference: Option<String>,
    /// The journal items (debits and credits).
    pub items: Vec<JournalItemInput>,
}

/// Entry totals for validation and display.
#[derive(Debug, Clone)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debits: Decimal,
    /// Total credit amount.
    pub credits: Decimal,
    /// Whether the entry is balanced (debits == credits).
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates new entry totals from debit and credit sums.
    #[must_use]
    pub fn new(debits: Decimal, credits: Decimal) -> Self {
        Self {
            debits,
            credits,
            is_balanced: debits == credits,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debits - self.credits
    }
}
