//! Wallet balance aggregation.
//!
//! A wallet's balance is never stored; it is recomputed from the live
//! transaction and adjustment rows on every read, inside a single read
//! transaction so the five buckets observe one commit state.

use sea_orm::{DatabaseTransaction, Statement, TransactionTrait, Value, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ResultLedger, TransactionKind, util::LedgerDate};

use super::{Ledger, with_tx};

/// Per-bucket totals for one wallet over an inclusive range.
///
/// `net = income − expense + transfer_in − transfer_out + adjustment`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub income_total: i64,
    pub expense_total: i64,
    pub transfer_in_total: i64,
    pub transfer_out_total: i64,
    pub adjustment_total: i64,
    pub net: i64,
}

/// Totals plus the row counts behind them, for the reporter's defensive
/// assigned-vs-summed check.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct BalanceBuckets {
    pub balance: WalletBalance,
    pub income_rows: i64,
    pub expense_rows: i64,
    pub transfer_in_rows: i64,
    pub transfer_out_rows: i64,
    pub adjustment_rows: i64,
}

impl BalanceBuckets {
    pub(super) fn summed_transaction_rows(&self) -> i64 {
        self.income_rows + self.expense_rows + self.transfer_in_rows + self.transfer_out_rows
    }
}

impl Ledger {
    /// Computes a wallet's balance breakdown over `[from, to]`.
    ///
    /// Only live rows count. The wallet itself may be soft-deleted; a missing
    /// wallet is `NotFound`.
    pub async fn compute_balance(
        &self,
        wallet_id: Uuid,
        from: Option<LedgerDate>,
        to: Option<LedgerDate>,
    ) -> ResultLedger<WalletBalance> {
        with_tx!(self, |db_tx| {
            self.fetch_wallet(&db_tx, wallet_id).await?;
            let buckets = self.balance_buckets(&db_tx, wallet_id, from, to).await?;
            Ok(buckets.balance)
        })
    }

    /// Range filter as a SQL fragment plus its bind values.
    fn range_sql(&self, from: Option<LedgerDate>, to: Option<LedgerDate>) -> (String, Vec<Value>) {
        let mut clause = String::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(from) = from {
            clause.push_str(" AND occurred_at >= ?");
            values.push(self.range_lower(from).into());
        }
        if let Some(to) = to {
            let upper = self.range_upper(to);
            if upper.inclusive {
                clause.push_str(" AND occurred_at <= ?");
            } else {
                clause.push_str(" AND occurred_at < ?");
            }
            values.push(upper.at.into());
        }
        (clause, values)
    }

    async fn sum_and_count(
        &self,
        db_tx: &DatabaseTransaction,
        sql: String,
        values: Vec<Value>,
    ) -> ResultLedger<(i64, i64)> {
        let backend = self.database.get_database_backend();
        let row = db_tx
            .query_one(Statement::from_sql_and_values(backend, sql, values))
            .await?;
        let Some(row) = row else {
            return Ok((0, 0));
        };
        let total: i64 = row.try_get("", "total").unwrap_or(0);
        let count: i64 = row.try_get("", "cnt").unwrap_or(0);
        Ok((total, count))
    }

    pub(super) async fn balance_buckets(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
        from: Option<LedgerDate>,
        to: Option<LedgerDate>,
    ) -> ResultLedger<BalanceBuckets> {
        let (range_clause, range_values) = self.range_sql(from, to);

        let tx_bucket = |kind: TransactionKind, wallet_column: &str| {
            let sql = format!(
                "SELECT COALESCE(SUM(amount_minor), 0) AS total, COUNT(*) AS cnt \
                 FROM transactions \
                 WHERE deleted_at IS NULL AND kind = ? AND {wallet_column} = ?{range_clause}"
            );
            let mut values: Vec<Value> = vec![kind.as_str().into(), wallet_id.into()];
            values.extend(range_values.iter().cloned());
            (sql, values)
        };

        let (sql, values) = tx_bucket(TransactionKind::Income, "wallet_id");
        let (income_total, income_rows) = self.sum_and_count(db_tx, sql, values).await?;

        let (sql, values) = tx_bucket(TransactionKind::Expense, "wallet_id");
        let (expense_total, expense_rows) = self.sum_and_count(db_tx, sql, values).await?;

        let (sql, values) = tx_bucket(TransactionKind::Transfer, "wallet_to_id");
        let (transfer_in_total, transfer_in_rows) = self.sum_and_count(db_tx, sql, values).await?;

        let (sql, values) = tx_bucket(TransactionKind::Transfer, "wallet_id");
        let (transfer_out_total, transfer_out_rows) =
            self.sum_and_count(db_tx, sql, values).await?;

        let adjustment_sql = format!(
            "SELECT COALESCE(SUM(amount_minor), 0) AS total, COUNT(*) AS cnt \
             FROM adjustments \
             WHERE deleted_at IS NULL AND wallet_id = ?{range_clause}"
        );
        let mut adjustment_values: Vec<Value> = vec![wallet_id.into()];
        adjustment_values.extend(range_values.iter().cloned());
        let (adjustment_total, adjustment_rows) = self
            .sum_and_count(db_tx, adjustment_sql, adjustment_values)
            .await?;

        let balance = WalletBalance {
            income_total,
            expense_total,
            transfer_in_total,
            transfer_out_total,
            adjustment_total,
            net: income_total - expense_total + transfer_in_total - transfer_out_total
                + adjustment_total,
        };

        Ok(BalanceBuckets {
            balance,
            income_rows,
            expense_rows,
            transfer_in_rows,
            transfer_out_rows,
            adjustment_rows,
        })
    }
}
