//! Transaction ledger operations: validation shared by create and update,
//! plus the write and list submodules.

use sea_orm::DatabaseTransaction;

use crate::{LedgerError, ResultLedger, Transaction, TransactionKind};

use super::Ledger;

mod list;
mod write;

pub use list::{TransactionListFilter, TransactionPage};

/// Per-kind shape rules (required/forbidden relations), applied to the full
/// row state: a draft on create, the merged state on update.
fn validate_shape(tx: &Transaction) -> ResultLedger<()> {
    if tx.amount_minor < 0 {
        return Err(LedgerError::Validation(
            "amount_minor: must be >= 0".to_string(),
        ));
    }

    match tx.kind {
        TransactionKind::Income => {
            if tx.income_category_id.is_none() {
                return Err(LedgerError::Validation(
                    "income_category_id: required for income".to_string(),
                ));
            }
            if tx.expense_category_id.is_some() {
                return Err(LedgerError::Validation(
                    "expense_category_id: not allowed on income".to_string(),
                ));
            }
            if tx.wallet_to_id.is_some() {
                return Err(LedgerError::Validation(
                    "wallet_to_id: only allowed on transfer".to_string(),
                ));
            }
            if tx.is_common_cost {
                return Err(LedgerError::Validation(
                    "is_common_cost: only allowed on expense".to_string(),
                ));
            }
        }
        TransactionKind::Expense => {
            if tx.income_category_id.is_some() {
                return Err(LedgerError::Validation(
                    "income_category_id: not allowed on expense".to_string(),
                ));
            }
            if tx.wallet_to_id.is_some() {
                return Err(LedgerError::Validation(
                    "wallet_to_id: only allowed on transfer".to_string(),
                ));
            }
            if tx.is_common_cost && tx.project_id.is_some() {
                return Err(LedgerError::Validation(
                    "is_common_cost: mutually exclusive with project_id".to_string(),
                ));
            }
        }
        TransactionKind::Transfer => {
            let Some(wallet_to_id) = tx.wallet_to_id else {
                return Err(LedgerError::Validation(
                    "wallet_to_id: required for transfer".to_string(),
                ));
            };
            if wallet_to_id == tx.wallet_id {
                return Err(LedgerError::Validation(
                    "wallet_to_id: must differ from wallet_id".to_string(),
                ));
            }
            if tx.income_category_id.is_some() || tx.expense_category_id.is_some() {
                return Err(LedgerError::Validation(
                    "category: not allowed on transfer".to_string(),
                ));
            }
            if tx.project_id.is_some() || tx.workshop_job_id.is_some() {
                return Err(LedgerError::Validation(
                    "project_id: not allowed on transfer".to_string(),
                ));
            }
            if tx.is_common_cost {
                return Err(LedgerError::Validation(
                    "is_common_cost: only allowed on expense".to_string(),
                ));
            }
        }
    }

    Ok(())
}

impl Ledger {
    /// Checks every referenced entity exists and is live at write time.
    ///
    /// Category ids are resolved inside their own universe, so an id from the
    /// wrong universe is simply not found there.
    async fn require_transaction_refs_live(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultLedger<()> {
        self.require_live_wallet(db_tx, tx.wallet_id, "wallet_id")
            .await?;
        if let Some(wallet_to_id) = tx.wallet_to_id {
            self.require_live_wallet(db_tx, wallet_to_id, "wallet_to_id")
                .await?;
        }
        if let Some(category_id) = tx.income_category_id {
            self.require_live_income_category(db_tx, category_id, "income_category_id")
                .await?;
        }
        if let Some(category_id) = tx.expense_category_id {
            self.require_live_expense_category(db_tx, category_id, "expense_category_id")
                .await?;
        }
        if let Some(project_id) = tx.project_id {
            self.require_live_project(db_tx, project_id, "project_id")
                .await?;
        }
        if let Some(job_id) = tx.workshop_job_id {
            self.require_live_workshop_job(db_tx, job_id, "workshop_job_id")
                .await?;
        }
        Ok(())
    }
}
