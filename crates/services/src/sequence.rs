//! Gapless document number issuance.

use std::sync::Arc;

use chrono::Utc;

use kitabu_core::sequence::{fallback_sequence, format_sequence};
use kitabu_shared::types::InstitutionId;
use kitabu_shared::{AppResult, TenantCtx};
use kitabu_store::{DocumentStore, Tx};

/// Sequence id for journal entry numbers.
pub const JOURNAL_SEQUENCE: &str = "journal";
/// Sequence id for payroll run numbers.
pub const PAYROLL_SEQUENCE: &str = "payroll";
/// Sequence id for sales invoice numbers.
pub const INVOICE_SEQUENCE: &str = "invoice";
/// Sequence id for purchase order numbers.
pub const PURCHASE_ORDER_SEQUENCE: &str = "purchase_order";
/// Sequence id for expense requisition numbers.
pub const REQUISITION_SEQUENCE: &str = "requisition";

/// Issues the next number of a sequence inside an open transaction.
///
/// The read-increment-write is version-guarded, so two concurrent
/// issuers can never take the same number; the loser retries. A
/// missing sequence record degrades to a timestamp-derived fallback
/// and logs the configuration gap.
pub(crate) fn issue_in_tx<'s>(
    tx: &mut Tx<'s>,
    store: &'s DocumentStore,
    tenant: InstitutionId,
    sequence_id: &str,
) -> String {
    let key = sequence_id.to_string();
    match tx.read(&store.sequences, tenant, &key) {
        Some(mut sequence) => {
            let number = sequence.next_number;
            sequence.next_number += 1;
            let formatted = format_sequence(&sequence.prefix, sequence.padding, number);
            tx.put(&store.sequences, tenant, key, sequence);
            formatted
        }
        None => {
            tracing::warn!(sequence_id, "no sequence record configured, issuing fallback number");
            fallback_sequence(sequence_id, Utc::now())
        }
    }
}

/// Issues human-readable document numbers.
#[derive(Clone)]
pub struct SequenceService {
    store: Arc<DocumentStore>,
}

impl SequenceService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Issues the next number of the given sequence atomically.
    pub fn next_sequence(&self, ctx: &TenantCtx, sequence_id: &str) -> AppResult<String> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| Ok(issue_in_tx(tx, store, ctx.institution_id, sequence_id)))
    }
}
