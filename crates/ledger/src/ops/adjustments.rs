//! Adjustment ledger operations.
//!
//! Same allocator and atomicity discipline as transaction writes, with the
//! simpler field set of a manual correction: wallet, signed amount, date,
//! note.

use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Adjustment, AdjustmentDraft, CodePrefix, LedgerError, ResultLedger, adjustments};

use super::codes::{CODE_ALLOC_ATTEMPTS, is_retryable_code_conflict, retries_exhausted};
use super::{Ledger, with_tx};

impl Ledger {
    /// Records a manual wallet correction.
    pub async fn create_adjustment(&self, draft: AdjustmentDraft) -> ResultLedger<Adjustment> {
        for _ in 0..CODE_ALLOC_ATTEMPTS {
            match self.try_create_adjustment(&draft).await {
                Err(err) if is_retryable_code_conflict(&err) => continue,
                other => return other,
            }
        }
        Err(retries_exhausted(CodePrefix::Adjustment))
    }

    async fn try_create_adjustment(&self, draft: &AdjustmentDraft) -> ResultLedger<Adjustment> {
        let mut adjustment = Adjustment {
            id: Uuid::new_v4(),
            code: String::new(),
            wallet_id: draft.wallet_id,
            occurred_at: self.resolve_date(draft.date),
            amount_minor: draft.amount_minor,
            note: crate::util::normalize_optional_text(draft.note.as_deref()),
            deleted_at: None,
        };

        with_tx!(self, |db_tx| {
            self.require_live_wallet(&db_tx, adjustment.wallet_id, "wallet_id")
                .await?;
            adjustment.code = self.allocate_code(&db_tx, CodePrefix::Adjustment).await?;
            adjustments::ActiveModel::from(&adjustment)
                .insert(&db_tx)
                .await?;
            Ok(adjustment)
        })
    }

    /// Sets the soft-delete marker. A no-op when already soft-deleted.
    pub async fn soft_delete_adjustment(&self, adjustment_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let model = adjustments::Entity::find_by_id(adjustment_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("adjustment {adjustment_id}")))?;
            if model.deleted_at.is_none() {
                let row = adjustments::ActiveModel {
                    id: ActiveValue::Set(adjustment_id),
                    deleted_at: ActiveValue::Set(Some(Utc::now())),
                    ..Default::default()
                };
                row.update(&db_tx).await?;
            }
            Ok(())
        })
    }

    /// Clears the soft-delete marker; refuses while the wallet is not live.
    pub async fn restore_adjustment(&self, adjustment_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let model = adjustments::Entity::find_by_id(adjustment_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("adjustment {adjustment_id}")))?;
            if model.deleted_at.is_some() {
                let wallet = self.fetch_wallet(&db_tx, model.wallet_id).await?;
                if wallet.deleted_at.is_some() {
                    return Err(LedgerError::ReferentialIntegrity(format!(
                        "cannot restore adjustment {}: wallet {} is not live",
                        model.code, wallet.code
                    )));
                }
                let row = adjustments::ActiveModel {
                    id: ActiveValue::Set(adjustment_id),
                    deleted_at: ActiveValue::Set(None),
                    ..Default::default()
                };
                row.update(&db_tx).await?;
            }
            Ok(())
        })
    }

    /// Fetches an adjustment in any state.
    pub async fn adjustment(&self, adjustment_id: Uuid) -> ResultLedger<Adjustment> {
        with_tx!(self, |db_tx| {
            let model = adjustments::Entity::find_by_id(adjustment_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("adjustment {adjustment_id}")))?;
            Adjustment::try_from(model)
        })
    }
}
