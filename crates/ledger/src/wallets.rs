//! The module contains the `Wallet` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

/// Kind of account a wallet represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    Cash,
    Bank,
    Other,
}

impl WalletKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for WalletKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "bank" => Ok(Self::Bank),
            "other" => Ok(Self::Other),
            other => Err(LedgerError::Validation(format!(
                "kind: invalid wallet kind: {other}"
            ))),
        }
    }
}

/// A wallet.
///
/// A wallet is a cash drawer, a bank account or anything else money is kept
/// in. Its balance is never stored; it is derived from the transaction and
/// adjustment rows on every read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    /// Allocator-issued document code, `W` family.
    pub code: String,
    pub name: String,
    pub kind: WalletKind,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Wallet {
    pub fn new(code: String, name: String, kind: WalletKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            code,
            name,
            kind,
            deleted_at: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub kind: String,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::adjustments::Entity")]
    Adjustments,
}

impl Related<super::adjustments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Adjustments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            code: ActiveValue::Set(value.code.clone()),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            deleted_at: ActiveValue::Set(value.deleted_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: model.id,
            code: model.code,
            name: model.name,
            kind: WalletKind::try_from(model.kind.as_str())?,
            deleted_at: model.deleted_at,
        })
    }
}
