//! Reconciliation reporting.
//!
//! Read-only: wraps the balance aggregator and scans for consistency
//! problems around one wallet. Data-quality findings are returned as
//! structured warnings, never as errors; only a missing wallet aborts.

use std::collections::HashMap;

use sea_orm::{
    Condition, DatabaseTransaction, PaginatorTrait, QueryFilter, Statement, TransactionTrait,
    Value, prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ResultLedger, TransactionKind, adjustments, transactions, util::LedgerDate, wallets,
};

use super::balances::WalletBalance;
use super::{Ledger, with_tx};

/// A consistency finding around one wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconciliationWarning {
    /// The reported wallet is soft-deleted but live transactions or
    /// adjustments still reference it.
    DeletedWalletInUse {
        wallet_id: Uuid,
        wallet_code: String,
        live_transactions: i64,
        live_adjustments: i64,
    },
    /// A live transfer touching the reported wallet names a soft-deleted
    /// wallet on the other side.
    DeletedCounterpartyWallet {
        wallet_id: Uuid,
        wallet_code: String,
        live_transfers: i64,
    },
    /// Rows assigned to the wallet and rows actually summed disagree; a
    /// filter bug in the aggregator would show up here.
    RowCountMismatch { assigned_rows: i64, summed_rows: i64 },
}

/// Balance plus consistency findings.
#[derive(Clone, Debug, Serialize)]
pub struct WalletReport {
    pub balance: WalletBalance,
    pub warnings: Vec<ReconciliationWarning>,
}

impl Ledger {
    /// Builds the reconciliation report for one wallet.
    ///
    /// A soft-deleted wallet is still reportable; only a missing id is
    /// `NotFound`.
    pub async fn report(
        &self,
        wallet_id: Uuid,
        from: Option<LedgerDate>,
        to: Option<LedgerDate>,
    ) -> ResultLedger<WalletReport> {
        with_tx!(self, |db_tx| {
            let wallet = self.fetch_wallet(&db_tx, wallet_id).await?;
            let buckets = self.balance_buckets(&db_tx, wallet_id, from, to).await?;

            let mut warnings = Vec::new();

            if wallet.deleted_at.is_some() {
                let live_transactions = transactions::Entity::find()
                    .filter(transactions::Column::DeletedAt.is_null())
                    .filter(
                        Condition::any()
                            .add(transactions::Column::WalletId.eq(wallet_id))
                            .add(transactions::Column::WalletToId.eq(wallet_id)),
                    )
                    .count(&db_tx)
                    .await? as i64;
                let live_adjustments = adjustments::Entity::find()
                    .filter(adjustments::Column::DeletedAt.is_null())
                    .filter(adjustments::Column::WalletId.eq(wallet_id))
                    .count(&db_tx)
                    .await? as i64;
                if live_transactions > 0 || live_adjustments > 0 {
                    warnings.push(ReconciliationWarning::DeletedWalletInUse {
                        wallet_id,
                        wallet_code: wallet.code.clone(),
                        live_transactions,
                        live_adjustments,
                    });
                }
            }

            warnings.extend(self.counterparty_warnings(&db_tx, wallet_id).await?);

            let assigned_rows = self
                .assigned_rows(&db_tx, wallet_id, from, to)
                .await?;
            let summed_rows = buckets.summed_transaction_rows() + buckets.adjustment_rows;
            if assigned_rows != summed_rows {
                warnings.push(ReconciliationWarning::RowCountMismatch {
                    assigned_rows,
                    summed_rows,
                });
            }

            Ok(WalletReport {
                balance: buckets.balance,
                warnings,
            })
        })
    }

    /// Live transfers touching the wallet whose other side is soft-deleted.
    async fn counterparty_warnings(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
    ) -> ResultLedger<Vec<ReconciliationWarning>> {
        let transfers = transactions::Entity::find()
            .filter(transactions::Column::Kind.eq(TransactionKind::Transfer.as_str()))
            .filter(transactions::Column::DeletedAt.is_null())
            .filter(
                Condition::any()
                    .add(transactions::Column::WalletId.eq(wallet_id))
                    .add(transactions::Column::WalletToId.eq(wallet_id)),
            )
            .all(db_tx)
            .await?;

        let mut transfer_counts: HashMap<Uuid, i64> = HashMap::new();
        for transfer in &transfers {
            let other = if transfer.wallet_id == wallet_id {
                transfer.wallet_to_id
            } else {
                Some(transfer.wallet_id)
            };
            if let Some(other) = other {
                *transfer_counts.entry(other).or_insert(0) += 1;
            }
        }

        let mut warnings = Vec::new();
        let counterparty_ids: Vec<Uuid> = transfer_counts.keys().copied().collect();
        if counterparty_ids.is_empty() {
            return Ok(warnings);
        }
        let counterparties = wallets::Entity::find()
            .filter(wallets::Column::Id.is_in(counterparty_ids))
            .filter(wallets::Column::DeletedAt.is_not_null())
            .all(db_tx)
            .await?;
        for counterparty in counterparties {
            let live_transfers = transfer_counts.get(&counterparty.id).copied().unwrap_or(0);
            warnings.push(ReconciliationWarning::DeletedCounterpartyWallet {
                wallet_id: counterparty.id,
                wallet_code: counterparty.code,
                live_transfers,
            });
        }
        Ok(warnings)
    }

    /// Count of live rows assigned to the wallet in the range, computed
    /// independently of the aggregator's bucket queries.
    async fn assigned_rows(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
        from: Option<LedgerDate>,
        to: Option<LedgerDate>,
    ) -> ResultLedger<i64> {
        let backend = self.database.get_database_backend();
        let mut range_clause = String::new();
        let mut range_values: Vec<Value> = Vec::new();
        if let Some(from) = from {
            range_clause.push_str(" AND occurred_at >= ?");
            range_values.push(self.range_lower(from).into());
        }
        if let Some(to) = to {
            let upper = self.range_upper(to);
            if upper.inclusive {
                range_clause.push_str(" AND occurred_at <= ?");
            } else {
                range_clause.push_str(" AND occurred_at < ?");
            }
            range_values.push(upper.at.into());
        }

        let tx_sql = format!(
            "SELECT COUNT(*) AS cnt FROM transactions \
             WHERE deleted_at IS NULL AND (wallet_id = ? OR wallet_to_id = ?){range_clause}"
        );
        let mut tx_values: Vec<Value> = vec![wallet_id.into(), wallet_id.into()];
        tx_values.extend(range_values.iter().cloned());
        let tx_row = db_tx
            .query_one(Statement::from_sql_and_values(backend, tx_sql, tx_values))
            .await?;
        let tx_count: i64 = tx_row.and_then(|r| r.try_get("", "cnt").ok()).unwrap_or(0);

        let adj_sql = format!(
            "SELECT COUNT(*) AS cnt FROM adjustments \
             WHERE deleted_at IS NULL AND wallet_id = ?{range_clause}"
        );
        let mut adj_values: Vec<Value> = vec![wallet_id.into()];
        adj_values.extend(range_values.iter().cloned());
        let adj_row = db_tx
            .query_one(Statement::from_sql_and_values(backend, adj_sql, adj_values))
            .await?;
        let adj_count: i64 = adj_row.and_then(|r| r.try_get("", "cnt").ok()).unwrap_or(0);

        Ok(tx_count + adj_count)
    }
}
