//! Document code allocation.
//!
//! `allocate_code` runs inside the caller's open transaction: read the
//! current maximum for the prefix, increment, insert the `document_codes`
//! row. The unique key on `code` is what turns a concurrent race into an
//! error; each create op loops the whole read-increment-write cycle over
//! [`is_retryable_code_conflict`] failures, bounded by
//! [`CODE_ALLOC_ATTEMPTS`].

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, SqlErr, prelude::*};

use crate::{LedgerError, ResultLedger, codes, codes::CodePrefix};

use super::Ledger;

/// Retry budget for one logical create. Exhausting it surfaces a
/// `Conflict`; the caller can safely re-issue the whole operation.
pub(crate) const CODE_ALLOC_ATTEMPTS: usize = 6;

/// True for failures a fresh read-increment-write cycle can resolve: a
/// concurrent allocator won the unique key on `code`, or sqlite reported the
/// same race as a write-lock conflict.
pub(crate) fn is_retryable_code_conflict(err: &LedgerError) -> bool {
    let LedgerError::Database(db_err) = err else {
        return false;
    };
    if matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    let message = db_err.to_string();
    message.contains("database is locked") || message.contains("database table is locked")
}

pub(crate) fn retries_exhausted(prefix: CodePrefix) -> LedgerError {
    LedgerError::Conflict(format!(
        "code allocation for prefix {} lost {} races; retry the operation",
        prefix.as_str(),
        CODE_ALLOC_ATTEMPTS
    ))
}

impl Ledger {
    /// Allocates the next code of a family inside the caller's transaction.
    ///
    /// The code row and the owning entity row commit or roll back together,
    /// so no code is ever observable without its entity. Allocation rows are
    /// never deleted: gaps from aborted creates stay gaps, and codes freed by
    /// a purge are never reissued.
    pub(crate) async fn allocate_code(
        &self,
        db_tx: &DatabaseTransaction,
        prefix: CodePrefix,
    ) -> ResultLedger<String> {
        let latest = codes::Entity::find()
            .filter(codes::Column::Prefix.eq(prefix.as_str()))
            .order_by_desc(codes::Column::Code)
            .one(db_tx)
            .await?;

        let next = match latest {
            Some(row) => {
                let sequence = codes::parse_sequence(&row.code, prefix).ok_or_else(|| {
                    LedgerError::Conflict(format!(
                        "malformed allocated code {} in prefix {}",
                        row.code,
                        prefix.as_str()
                    ))
                })?;
                sequence + 1
            }
            None => 1,
        };
        let code = codes::format_code(prefix, next)?;

        let row = codes::ActiveModel {
            code: ActiveValue::Set(code.clone()),
            prefix: ActiveValue::Set(prefix.as_str().to_string()),
            allocated_at: ActiveValue::Set(Utc::now()),
        };
        row.insert(db_tx).await?;

        Ok(code)
    }
}
