//! Wallet operations.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    CodePrefix, LedgerError, ResultLedger, Wallet, WalletKind,
    util::{normalize_code, normalize_text},
    wallets,
};

use super::codes::{CODE_ALLOC_ATTEMPTS, is_retryable_code_conflict, retries_exhausted};
use super::{Ledger, with_tx};

impl Ledger {
    /// Opens a new wallet with an allocator-issued `W` code.
    pub async fn create_wallet(&self, name: &str, kind: WalletKind) -> ResultLedger<Wallet> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation(
                "name: wallet name must not be empty".to_string(),
            ));
        }
        for _ in 0..CODE_ALLOC_ATTEMPTS {
            match self.try_create_wallet(name, kind).await {
                Err(err) if is_retryable_code_conflict(&err) => continue,
                other => return other,
            }
        }
        Err(retries_exhausted(CodePrefix::Wallet))
    }

    async fn try_create_wallet(&self, name: &str, kind: WalletKind) -> ResultLedger<Wallet> {
        with_tx!(self, |db_tx| {
            let duplicate = wallets::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(normalize_text(name)))
                .filter(wallets::Column::DeletedAt.is_null())
                .one(&db_tx)
                .await?
                .is_some();
            if duplicate {
                return Err(LedgerError::Conflict(format!(
                    "wallet name '{name}' already in use"
                )));
            }

            let code = self.allocate_code(&db_tx, CodePrefix::Wallet).await?;
            let wallet = Wallet::new(code, name.to_string(), kind);
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;
            Ok(wallet)
        })
    }

    /// Fetches a wallet in any state.
    pub async fn wallet(&self, wallet_id: Uuid) -> ResultLedger<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.fetch_wallet(&db_tx, wallet_id).await?;
            Wallet::try_from(model)
        })
    }

    /// Looks a wallet up by its document code, case-insensitively.
    pub async fn find_wallet_by_code(&self, code: &str) -> ResultLedger<Wallet> {
        let canonical = normalize_code(code);
        with_tx!(self, |db_tx| {
            let model = wallets::Entity::find()
                .filter(wallets::Column::Code.eq(canonical.as_str()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("wallet {canonical}")))?;
            Wallet::try_from(model)
        })
    }

    /// Lists wallets ordered by code.
    pub async fn list_wallets(&self, include_deleted: bool) -> ResultLedger<Vec<Wallet>> {
        with_tx!(self, |db_tx| {
            let mut query = wallets::Entity::find().order_by_asc(wallets::Column::Code);
            if !include_deleted {
                query = query.filter(wallets::Column::DeletedAt.is_null());
            }
            let models = query.all(&db_tx).await?;
            models.into_iter().map(Wallet::try_from).collect()
        })
    }

    /// Sets the soft-delete marker on a wallet.
    ///
    /// Live transactions or adjustments referencing the wallet are left
    /// untouched; the reconciliation reporter surfaces them as an invariant
    /// violation rather than this call silently cascading.
    pub async fn soft_delete_wallet(&self, wallet_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let model = self.fetch_wallet(&db_tx, wallet_id).await?;
            if model.deleted_at.is_none() {
                let row = wallets::ActiveModel {
                    id: ActiveValue::Set(wallet_id),
                    deleted_at: ActiveValue::Set(Some(Utc::now())),
                    ..Default::default()
                };
                row.update(&db_tx).await?;
            }
            Ok(())
        })
    }

    /// Clears the soft-delete marker on a wallet.
    pub async fn restore_wallet(&self, wallet_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let model = self.fetch_wallet(&db_tx, wallet_id).await?;
            if model.deleted_at.is_some() {
                let row = wallets::ActiveModel {
                    id: ActiveValue::Set(wallet_id),
                    deleted_at: ActiveValue::Set(None),
                    ..Default::default()
                };
                row.update(&db_tx).await?;
            }
            Ok(())
        })
    }
}
