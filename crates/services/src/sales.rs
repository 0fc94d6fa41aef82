//! Sales invoicing: create, post, and pay.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use kitabu_core::ledger::{EntrySide, JournalEntryInput, JournalItemInput};
use kitabu_shared::types::money::round_minor;
use kitabu_shared::types::InvoiceId;
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::documents::trade::{Invoice, InvoiceLine, InvoiceStatus};
use kitabu_store::DocumentStore;

use crate::approval::{ensure_unlocked_in_tx, initiate_in_tx, ApprovalOutcome, InitiationParams};
use crate::ledger::post_in_tx;
use crate::sequence::{issue_in_tx, INVOICE_SEQUENCE};

/// Input for creating a sales invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// The billed customer.
    pub customer_name: String,
    /// Billed lines.
    pub lines: Vec<InvoiceLine>,
    /// Invoice date.
    pub issued_on: NaiveDate,
}

/// Sales invoicing orchestration service.
#[derive(Clone)]
pub struct SalesService {
    store: Arc<DocumentStore>,
}

impl SalesService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates a sequence-numbered invoice, gated by the "sales"
    /// approval policy when the total crosses its threshold.
    pub fn create_invoice(&self, ctx: &TenantCtx, input: &CreateInvoiceInput) -> AppResult<InvoiceId> {
        if input.lines.is_empty() {
            return Err(AppError::Validation(
                "Invoice must have at least one line".to_string(),
            ));
        }
        let store = self.store.as_ref();
        let invoice_id = store.run_transaction(|tx| -> AppResult<InvoiceId> {
            let mut invoice = Invoice {
                id: InvoiceId::new(),
                invoice_number: issue_in_tx(tx, store, ctx.institution_id, INVOICE_SEQUENCE),
                customer_name: input.customer_name.clone(),
                lines: input.lines.clone(),
                status: InvoiceStatus::Draft,
                approval_request_id: None,
                journal_entry_id: None,
                issued_on: input.issued_on,
                created_by: ctx.user_id,
                created_at: Utc::now(),
            };
            let outcome = initiate_in_tx(
                tx,
                store,
                ctx,
                InitiationParams {
                    module: "sales",
                    action: "create",
                    source_doc_id: invoice.id.into_inner(),
                    amount: invoice.total(),
                    data: serde_json::json!({
                        "invoice_number": invoice.invoice_number,
                        "customer_name": invoice.customer_name,
                        "total": invoice.total(),
                    }),
                    force: false,
                },
            );
            if let ApprovalOutcome::Pending(request_id) = outcome {
                invoice.status = InvoiceStatus::PendingApproval;
                invoice.approval_request_id = Some(request_id);
            }
            let id = invoice.id;
            tx.put(&store.invoices, ctx.institution_id, id, invoice);
            Ok(id)
        })?;
        tracing::info!(%invoice_id, "invoice created");
        Ok(invoice_id)
    }

    /// Posts an invoice: debits receivable, credits revenue. Fails
    /// with a governance lock while an approval request is unresolved.
    pub fn post_invoice(&self, ctx: &TenantCtx, invoice_id: InvoiceId) -> AppResult<()> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            let mut invoice = tx
                .read(&store.invoices, ctx.institution_id, &invoice_id)
                .ok_or_else(|| AppError::NotFound(format!("Invoice {invoice_id}")))?;
            match invoice.status {
                InvoiceStatus::Draft | InvoiceStatus::PendingApproval => {}
                InvoiceStatus::Posted | InvoiceStatus::Paid => {
                    return Err(AppError::InvalidState(format!(
                        "Invoice {} is already posted",
                        invoice.invoice_number
                    )));
                }
            }
            ensure_unlocked_in_tx(tx, store, ctx, invoice.approval_request_id, "This invoice")?;

            let accounts = *tx
                .read(&store.tenant_setup, ctx.institution_id, &())
                .ok_or_else(|| AppError::ConfigurationMissing("tenant setup".to_string()))?
                .sales()?;
            let total = invoice.total();
            let entry_id = post_in_tx(
                tx,
                store,
                ctx,
                &JournalEntryInput {
                    date: invoice.issued_on,
                    description: format!("Invoice {} issued", invoice.invoice_number),
                    reference: Some(format!("INV-POST-{invoice_id}")),
                    items: vec![
                        JournalItemInput {
                            account_id: accounts.accounts_receivable,
                            amount: total,
                            side: EntrySide::Debit,
                        },
                        JournalItemInput {
                            account_id: accounts.revenue,
                            amount: total,
                            side: EntrySide::Credit,
                        },
                    ],
                },
            )?;

            invoice.status = InvoiceStatus::Posted;
            invoice.journal_entry_id = Some(entry_id);
            tx.put(&store.invoices, ctx.institution_id, invoice_id, invoice);
            Ok(())
        })?;
        tracing::info!(%invoice_id, "invoice posted");
        Ok(())
    }

    /// Records full payment: debits cash, credits receivable.
    pub fn pay_invoice(&self, ctx: &TenantCtx, invoice_id: InvoiceId) -> AppResult<()> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            let mut invoice = tx
                .read(&store.invoices, ctx.institution_id, &invoice_id)
                .ok_or_else(|| AppError::NotFound(format!("Invoice {invoice_id}")))?;
            if invoice.status != InvoiceStatus::Posted {
                return Err(AppError::InvalidState(format!(
                    "Invoice {} is not awaiting payment",
                    invoice.invoice_number
                )));
            }

            let accounts = *tx
                .read(&store.tenant_setup, ctx.institution_id, &())
                .ok_or_else(|| AppError::ConfigurationMissing("tenant setup".to_string()))?
                .sales()?;
            let total = round_minor(invoice.total());
            post_in_tx(
                tx,
                store,
                ctx,
                &JournalEntryInput {
                    date: Utc::now().date_naive(),
                    description: format!("Invoice {} paid", invoice.invoice_number),
                    reference: Some(format!("INV-PAY-{invoice_id}")),
                    items: vec![
                        JournalItemInput {
                            account_id: accounts.cash,
                            amount: total,
                            side: EntrySide::Debit,
                        },
                        JournalItemInput {
                            account_id: accounts.accounts_receivable,
                            amount: total,
                            side: EntrySide::Credit,
                        },
                    ],
                },
            )?;

            invoice.status = InvoiceStatus::Paid;
            tx.put(&store.invoices, ctx.institution_id, invoice_id, invoice);
            Ok(())
        })?;
        tracing::info!(%invoice_id, "invoice paid");
        Ok(())
    }
}
