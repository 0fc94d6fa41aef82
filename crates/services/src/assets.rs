//! Fixed-asset straight-line depreciation.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use kitabu_core::ledger::{EntrySide, JournalEntryInput, JournalItemInput};
use kitabu_shared::types::{AssetId, JournalEntryId};
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::DocumentStore;

use crate::ledger::post_in_tx;

/// Fixed-asset depreciation service.
#[derive(Clone)]
pub struct AssetService {
    store: Arc<DocumentStore>,
}

impl AssetService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Charges one month of straight-line depreciation.
    ///
    /// Idempotent per (asset, year, month): the charge posts under a
    /// deterministic journal reference, so a replay returns the prior
    /// entry and leaves accumulated depreciation untouched. Returns
    /// `None` for a fully depreciated asset.
    pub fn depreciate_month(
        &self,
        ctx: &TenantCtx,
        asset_id: AssetId,
        year: i32,
        month: u32,
    ) -> AppResult<Option<JournalEntryId>> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!("Invalid month {month}")));
        }
        let store = self.store.as_ref();
        let entry_id = store.run_transaction(|tx| {
            let mut asset = tx
                .read(&store.fixed_assets, ctx.institution_id, &asset_id)
                .ok_or_else(|| AppError::NotFound(format!("Fixed asset {asset_id}")))?;
            if !asset.is_active {
                return Err(AppError::InvalidState(format!(
                    "Asset {} is out of service",
                    asset.name
                )));
            }

            let reference = format!("DEP-{asset_id}-{year:04}{month:02}");
            if let Some(existing) =
                tx.read(&store.journal_entry_refs, ctx.institution_id, &reference)
            {
                return Ok(Some(existing));
            }

            let charge = asset.monthly_charge();
            if charge == Decimal::ZERO {
                return Ok(None);
            }
            let accounts = *tx
                .read(&store.tenant_setup, ctx.institution_id, &())
                .ok_or_else(|| AppError::ConfigurationMissing("tenant setup".to_string()))?
                .assets()?;

            let entry_id = post_in_tx(
                tx,
                store,
                ctx,
                &JournalEntryInput {
                    date: Utc::now().date_naive(),
                    description: format!("Depreciation of {} for {year}-{month:02}", asset.name),
                    reference: Some(reference),
                    items: vec![
                        JournalItemInput {
                            account_id: accounts.depreciation_expense,
                            amount: charge,
                            side: EntrySide::Debit,
                        },
                        JournalItemInput {
                            account_id: accounts.accumulated_depreciation,
                            amount: charge,
                            side: EntrySide::Credit,
                        },
                    ],
                },
            )?;

            asset.accumulated_depreciation += charge;
            tx.put(&store.fixed_assets, ctx.institution_id, asset_id, asset);
            Ok(Some(entry_id))
        })?;
        if let Some(entry_id) = entry_id {
            tracing::info!(%asset_id, %entry_id, year, month, "depreciation charged");
        }
        Ok(entry_id)
    }
}
