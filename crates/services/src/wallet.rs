//! Customer wallet top-ups, redemptions, and loyalty accrual.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use kitabu_core::ledger::{EntrySide, JournalEntryInput, JournalItemInput};
use kitabu_shared::types::money::round_minor;
use kitabu_shared::types::WalletId;
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::DocumentStore;

use crate::ledger::post_in_tx;

/// Loyalty points accrued per hundred shillings of top-up; redemption
/// draws down at the same rate.
const POINTS_PER_HUNDRED: Decimal = Decimal::ONE;

fn points_for(amount: Decimal) -> Decimal {
    amount * POINTS_PER_HUNDRED / Decimal::ONE_HUNDRED
}

/// Customer wallet orchestration service.
#[derive(Clone)]
pub struct WalletService {
    store: Arc<DocumentStore>,
}

impl WalletService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Tops up a wallet: debits cash, credits wallet liability, and
    /// accrues loyalty points.
    pub fn top_up(&self, ctx: &TenantCtx, wallet_id: WalletId, amount: Decimal) -> AppResult<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Top-up amount must be positive".to_string(),
            ));
        }
        let store = self.store.as_ref();
        store.run_transaction(|tx| -> AppResult<()> {
            let mut wallet = tx
                .read(&store.wallets, ctx.institution_id, &wallet_id)
                .ok_or_else(|| AppError::NotFound(format!("Wallet {wallet_id}")))?;
            let accounts = *tx
                .read(&store.tenant_setup, ctx.institution_id, &())
                .ok_or_else(|| AppError::ConfigurationMissing("tenant setup".to_string()))?
                .sales()?;

            let amount = round_minor(amount);
            post_in_tx(
                tx,
                store,
                ctx,
                &JournalEntryInput {
                    date: Utc::now().date_naive(),
                    description: format!("Wallet top-up for {}", wallet.customer_name),
                    reference: None,
                    items: vec![
                        JournalItemInput {
                            account_id: accounts.cash,
                            amount,
                            side: EntrySide::Debit,
                        },
                        JournalItemInput {
                            account_id: accounts.wallet_liability,
                            amount,
                            side: EntrySide::Credit,
                        },
                    ],
                },
            )?;

            wallet.balance += amount;
            wallet.loyalty_points += points_for(amount);
            tx.put(&store.wallets, ctx.institution_id, wallet_id, wallet);
            Ok(())
        })?;
        tracing::info!(%wallet_id, %amount, "wallet topped up");
        Ok(())
    }

    /// Redeems wallet balance against a sale: debits wallet liability,
    /// credits revenue, and draws down loyalty points.
    pub fn redeem(&self, ctx: &TenantCtx, wallet_id: WalletId, amount: Decimal) -> AppResult<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Redemption amount must be positive".to_string(),
            ));
        }
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            let mut wallet = tx
                .read(&store.wallets, ctx.institution_id, &wallet_id)
                .ok_or_else(|| AppError::NotFound(format!("Wallet {wallet_id}")))?;
            let amount = round_minor(amount);
            if wallet.balance < amount {
                return Err(AppError::Validation(format!(
                    "Wallet balance {} cannot cover redemption of {amount}",
                    wallet.balance
                )));
            }
            let accounts = *tx
                .read(&store.tenant_setup, ctx.institution_id, &())
                .ok_or_else(|| AppError::ConfigurationMissing("tenant setup".to_string()))?
                .sales()?;

            post_in_tx(
                tx,
                store,
                ctx,
                &JournalEntryInput {
                    date: Utc::now().date_naive(),
                    description: format!("Wallet redemption for {}", wallet.customer_name),
                    reference: None,
                    items: vec![
                        JournalItemInput {
                            account_id: accounts.wallet_liability,
                            amount,
                            side: EntrySide::Debit,
                        },
                        JournalItemInput {
                            account_id: accounts.revenue,
                            amount,
                            side: EntrySide::Credit,
                        },
                    ],
                },
            )?;

            wallet.balance -= amount;
            wallet.loyalty_points = (wallet.loyalty_points - points_for(amount)).max(Decimal::ZERO);
            tx.put(&store.wallets, ctx.institution_id, wallet_id, wallet);
            Ok(())
        })?;
        tracing::info!(%wallet_id, %amount, "wallet redeemed");
        Ok(())
    }
}
