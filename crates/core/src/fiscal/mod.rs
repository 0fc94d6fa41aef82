//! Fiscal period types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status of a fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiscalPeriodStatus {
    /// Period is open for postings and payroll runs.
    Open,
    /// Period is closed.
    Closed,
}

impl FiscalPeriodStatus {
    /// Returns true if the period accepts new activity.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Date range helpers for a period's bounds.
#[must_use]
pub fn contains_date(start: NaiveDate, end: NaiveDate, date: NaiveDate) -> bool {
    date >= start && date <= end
}
