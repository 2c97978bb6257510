//! Manual wallet corrections.
//!
//! An `Adjustment` is a signed, category-less balance correction on a single
//! wallet. It is excluded from ordinary income/expense totals but included in
//! the wallet's net balance.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: Uuid,
    /// Allocator-issued document code, `AD` family.
    pub code: String,
    pub wallet_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// Signed amount in minor units: positive increases the wallet.
    pub amount_minor: i64,
    pub note: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "adjustments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub wallet_id: Uuid,
    pub occurred_at: DateTimeUtc,
    pub amount_minor: i64,
    pub note: Option<String>,
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
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Adjustment> for ActiveModel {
    fn from(value: &Adjustment) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            code: ActiveValue::Set(value.code.clone()),
            wallet_id: ActiveValue::Set(value.wallet_id),
            occurred_at: ActiveValue::Set(value.occurred_at),
            amount_minor: ActiveValue::Set(value.amount_minor),
            note: ActiveValue::Set(value.note.clone()),
            deleted_at: ActiveValue::Set(value.deleted_at),
        }
    }
}

impl TryFrom<Model> for Adjustment {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: model.id,
            code: model.code,
            wallet_id: model.wallet_id,
            occurred_at: model.occurred_at,
            amount_minor: model.amount_minor,
            note: model.note,
            deleted_at: model.deleted_at,
        })
    }
}
