use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    LedgerError, ResultLedger, Transaction, TransactionDraft, TransactionPatch, transactions,
};

use super::super::codes::{CODE_ALLOC_ATTEMPTS, is_retryable_code_conflict, retries_exhausted};
use super::super::{Ledger, cascade, with_tx};
use super::validate_shape;

impl Ledger {
    /// Records a money movement.
    ///
    /// Validation, code allocation and the insert run in one database
    /// transaction; a failed insert never leaves an orphaned code. Lost
    /// allocation races retry the whole cycle up to the budget, then surface
    /// a `Conflict` the caller may re-issue.
    pub async fn create_transaction(&self, draft: TransactionDraft) -> ResultLedger<Transaction> {
        for _ in 0..CODE_ALLOC_ATTEMPTS {
            match self.try_create_transaction(&draft).await {
                Err(err) if is_retryable_code_conflict(&err) => continue,
                other => return other,
            }
        }
        Err(retries_exhausted(draft.kind.code_prefix()))
    }

    async fn try_create_transaction(&self, draft: &TransactionDraft) -> ResultLedger<Transaction> {
        let mut tx = Transaction {
            id: Uuid::new_v4(),
            code: String::new(),
            kind: draft.kind,
            occurred_at: self.resolve_date(draft.date),
            amount_minor: draft.amount_minor,
            wallet_id: draft.wallet_id,
            wallet_to_id: draft.wallet_to_id,
            income_category_id: draft.income_category_id,
            expense_category_id: draft.expense_category_id,
            project_id: draft.project_id,
            workshop_job_id: draft.workshop_job_id,
            is_common_cost: draft.is_common_cost,
            note: crate::util::normalize_optional_text(draft.note.as_deref()),
            is_sample: draft.is_sample,
            deleted_at: None,
        };
        validate_shape(&tx)?;

        with_tx!(self, |db_tx| {
            self.require_transaction_refs_live(&db_tx, &tx).await?;
            tx.code = self.allocate_code(&db_tx, tx.kind.code_prefix()).await?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }

    /// Updates an existing transaction.
    ///
    /// The kind is fixed at creation; everything else re-validates against
    /// the merged state, exactly like a create. The code never changes.
    pub async fn update_transaction(
        &self,
        transaction_id: Uuid,
        patch: TransactionPatch,
    ) -> ResultLedger<Transaction> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    LedgerError::NotFound(format!("transaction {transaction_id}"))
                })?;
            let mut tx = Transaction::try_from(model)?;
            if tx.deleted_at.is_some() {
                return Err(LedgerError::Conflict(format!(
                    "transaction {} is soft-deleted; restore it before updating",
                    tx.code
                )));
            }

            if let Some(wallet_id) = patch.wallet_id {
                tx.wallet_id = wallet_id;
            }
            if let Some(wallet_to_id) = patch.wallet_to_id {
                tx.wallet_to_id = wallet_to_id;
            }
            if let Some(amount_minor) = patch.amount_minor {
                tx.amount_minor = amount_minor;
            }
            if let Some(date) = patch.date {
                tx.occurred_at = self.resolve_date(date);
            }
            if let Some(income_category_id) = patch.income_category_id {
                tx.income_category_id = income_category_id;
            }
            if let Some(expense_category_id) = patch.expense_category_id {
                tx.expense_category_id = expense_category_id;
            }
            if let Some(project_id) = patch.project_id {
                tx.project_id = project_id;
            }
            if let Some(workshop_job_id) = patch.workshop_job_id {
                tx.workshop_job_id = workshop_job_id;
            }
            if let Some(is_common_cost) = patch.is_common_cost {
                tx.is_common_cost = is_common_cost;
            }
            if let Some(note) = patch.note {
                tx.note = crate::util::normalize_optional_text(note.as_deref());
            }

            validate_shape(&tx)?;
            self.require_transaction_refs_live(&db_tx, &tx).await?;

            transactions::ActiveModel::from(&tx).update(&db_tx).await?;
            Ok(tx)
        })
    }

    /// Sets the soft-delete marker. A no-op when already soft-deleted.
    pub async fn soft_delete_transaction(&self, transaction_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    LedgerError::NotFound(format!("transaction {transaction_id}"))
                })?;
            if model.deleted_at.is_none() {
                let row = transactions::ActiveModel {
                    id: ActiveValue::Set(transaction_id),
                    deleted_at: ActiveValue::Set(Some(Utc::now())),
                    ..Default::default()
                };
                row.update(&db_tx).await?;
            }
            Ok(())
        })
    }

    /// Clears the soft-delete marker.
    ///
    /// Refuses with `ReferentialIntegrity` if any referenced entity is not
    /// live anymore — restoring must not bring back a row that points at a
    /// dead wallet, category, project or job.
    pub async fn restore_transaction(&self, transaction_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    LedgerError::NotFound(format!("transaction {transaction_id}"))
                })?;
            if model.deleted_at.is_some() {
                cascade::validate_restore_refs(
                    &db_tx,
                    cascade::EntityKind::Transaction,
                    transaction_id,
                )
                .await?;
                let row = transactions::ActiveModel {
                    id: ActiveValue::Set(transaction_id),
                    deleted_at: ActiveValue::Set(None),
                    ..Default::default()
                };
                row.update(&db_tx).await?;
            }
            Ok(())
        })
    }

    /// Fetches a transaction in any state.
    pub async fn transaction(&self, transaction_id: Uuid) -> ResultLedger<Transaction> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    LedgerError::NotFound(format!("transaction {transaction_id}"))
                })?;
            Transaction::try_from(model)
        })
    }
}
