use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    LedgerError, ResultLedger, Transaction, TransactionKind, transactions,
    util::{LedgerDate, normalize_code, normalize_text},
};

use super::super::{Ledger, with_tx};

/// Filters for listing transactions.
///
/// `from` and `to` are both inclusive in the canonical date convention: a
/// civil day covers the whole day in the reporting timezone.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub kind: Option<TransactionKind>,
    /// Transactions assigned to this wallet as source or, for transfers,
    /// destination.
    pub wallet_id: Option<Uuid>,
    pub from: Option<LedgerDate>,
    pub to: Option<LedgerDate>,
    /// If true, includes soft-deleted rows (default: false).
    pub include_deleted: bool,
    /// Free text over code (case-insensitive) and note.
    pub search: Option<String>,
}

/// One page of results, newest first.
#[derive(Clone, Debug)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub next_cursor: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionsCursor {
    occurred_at: DateTime<Utc>,
    transaction_id: Uuid,
}

impl TransactionsCursor {
    fn encode(&self) -> ResultLedger<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| LedgerError::Validation("invalid transactions cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultLedger<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| LedgerError::Validation("invalid transactions cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| LedgerError::Validation("invalid transactions cursor".to_string()))
    }
}

impl Ledger {
    /// Lists transactions, newest → older by `(occurred_at DESC, id DESC)`,
    /// with cursor-based pagination.
    pub async fn list_transactions(
        &self,
        limit: u64,
        cursor: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultLedger<TransactionPage> {
        with_tx!(self, |db_tx| {
            let limit_plus_one = limit.saturating_add(1);
            let mut query = transactions::Entity::find()
                .order_by_desc(transactions::Column::OccurredAt)
                .order_by_desc(transactions::Column::Id)
                .limit(limit_plus_one);

            if let Some(kind) = filter.kind {
                query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
            }
            if let Some(wallet_id) = filter.wallet_id {
                query = query.filter(
                    Condition::any()
                        .add(transactions::Column::WalletId.eq(wallet_id))
                        .add(transactions::Column::WalletToId.eq(wallet_id)),
                );
            }
            if let Some(from) = filter.from {
                query = query
                    .filter(transactions::Column::OccurredAt.gte(self.range_lower(from)));
            }
            if let Some(to) = filter.to {
                let upper = self.range_upper(to);
                query = if upper.inclusive {
                    query.filter(transactions::Column::OccurredAt.lte(upper.at))
                } else {
                    query.filter(transactions::Column::OccurredAt.lt(upper.at))
                };
            }
            if !filter.include_deleted {
                query = query.filter(transactions::Column::DeletedAt.is_null());
            }
            if let Some(search) = filter.search.as_deref() {
                let code_needle = normalize_code(search);
                let note_needle = normalize_text(search);
                query = query.filter(
                    Condition::any()
                        .add(transactions::Column::Code.contains(code_needle.as_str()))
                        .add(transactions::Column::Note.contains(note_needle.as_str())),
                );
            }

            if let Some(cursor) = cursor {
                let cursor = TransactionsCursor::decode(cursor)?;
                query = query.filter(
                    Condition::any()
                        .add(transactions::Column::OccurredAt.lt(cursor.occurred_at))
                        .add(
                            Condition::all()
                                .add(transactions::Column::OccurredAt.eq(cursor.occurred_at))
                                .add(transactions::Column::Id.lt(cursor.transaction_id)),
                        ),
                );
            }

            let rows: Vec<transactions::Model> = query.all(&db_tx).await?;
            let has_more = rows.len() > limit as usize;

            let mut items: Vec<Transaction> = Vec::with_capacity(rows.len().min(limit as usize));
            for model in rows.into_iter().take(limit as usize) {
                items.push(Transaction::try_from(model)?);
            }

            let next_cursor = if has_more {
                items
                    .last()
                    .map(|tx| TransactionsCursor {
                        occurred_at: tx.occurred_at,
                        transaction_id: tx.id,
                    })
                    .map(|c| c.encode())
                    .transpose()?
            } else {
                None
            };

            Ok(TransactionPage { items, next_cursor })
        })
    }

    /// Looks a transaction up by its document code, case-insensitively.
    pub async fn find_transaction_by_code(&self, code: &str) -> ResultLedger<Transaction> {
        let canonical = normalize_code(code);
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find()
                .filter(transactions::Column::Code.eq(canonical.as_str()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("transaction {canonical}")))?;
            Transaction::try_from(model)
        })
    }
}
