//! Human-readable document number formatting.
//!
//! The atomic read-increment-write against the sequence record lives
//! in the services layer; this module holds the pure formatting and
//! the degraded fallback identifier.

use chrono::{DateTime, Utc};

/// Formats a sequence number as `{prefix}{zero-padded number}`.
///
/// Numbers wider than the padding are not truncated.
#[must_use]
pub fn format_sequence(prefix: &str, padding: usize, number: u64) -> String {
    format!("{prefix}{number:0padding$}")
}

/// Timestamp-derived fallback identifier for tenants with no sequence
/// record configured. Not gapless; callers log the configuration gap.
#[must_use]
pub fn fallback_sequence(sequence_id: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", sequence_id.to_uppercase(), at.timestamp_millis())
}
