//! Money-movement primitives.
//!
//! A `Transaction` is a single recorded movement: money entering a wallet
//! (income), leaving it (expense), or moving between two wallets (transfer).
//! Which relations are required depends on the kind; the rules live in the
//! write ops.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CodePrefix, LedgerError, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }

    /// Document code family for this kind.
    pub fn code_prefix(self) -> CodePrefix {
        match self {
            Self::Income => CodePrefix::Income,
            Self::Expense => CodePrefix::Expense,
            Self::Transfer => CodePrefix::Transfer,
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            other => Err(LedgerError::Validation(format!(
                "kind: invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// Allocator-issued document code; family depends on the kind
    /// (`PT`/`PC`/`TF`).
    pub code: String,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
    /// Non-negative amount in minor units. Direction comes from the kind,
    /// not the sign.
    pub amount_minor: i64,
    /// Source wallet, required for every kind.
    pub wallet_id: Uuid,
    /// Destination wallet, transfers only.
    pub wallet_to_id: Option<Uuid>,
    pub income_category_id: Option<Uuid>,
    pub expense_category_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub workshop_job_id: Option<Uuid>,
    /// Overhead expense, not attributable to any project.
    pub is_common_cost: bool,
    pub note: Option<String>,
    /// Seed-data provenance marker, consumed only by cleanup tooling.
    pub is_sample: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub kind: String,
    pub occurred_at: DateTimeUtc,
    pub amount_minor: i64,
    pub wallet_id: Uuid,
    pub wallet_to_id: Option<Uuid>,
    pub income_category_id: Option<Uuid>,
    pub expense_category_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub workshop_job_id: Option<Uuid>,
    pub is_common_cost: bool,
    pub note: Option<String>,
    pub is_sample: bool,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallet,
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletToId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    WalletTo,
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::workshop_jobs::Entity",
        from = "Column::WorkshopJobId",
        to = "super::workshop_jobs::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    WorkshopJob,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            code: ActiveValue::Set(tx.code.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            wallet_id: ActiveValue::Set(tx.wallet_id),
            wallet_to_id: ActiveValue::Set(tx.wallet_to_id),
            income_category_id: ActiveValue::Set(tx.income_category_id),
            expense_category_id: ActiveValue::Set(tx.expense_category_id),
            project_id: ActiveValue::Set(tx.project_id),
            workshop_job_id: ActiveValue::Set(tx.workshop_job_id),
            is_common_cost: ActiveValue::Set(tx.is_common_cost),
            note: ActiveValue::Set(tx.note.clone()),
            is_sample: ActiveValue::Set(tx.is_sample),
            deleted_at: ActiveValue::Set(tx.deleted_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: model.id,
            code: model.code,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            occurred_at: model.occurred_at,
            amount_minor: model.amount_minor,
            wallet_id: model.wallet_id,
            wallet_to_id: model.wallet_to_id,
            income_category_id: model.income_category_id,
            expense_category_id: model.expense_category_id,
            project_id: model.project_id,
            workshop_job_id: model.workshop_job_id,
            is_common_cost: model.is_common_cost,
            note: model.note,
            is_sample: model.is_sample,
            deleted_at: model.deleted_at,
        })
    }
}
