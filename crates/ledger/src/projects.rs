//! Customer projects (orders in the making).
//!
//! A project is the cost center order-attributable income and expenses hang
//! off. Its children are order items and workshop jobs.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    /// Allocator-issued document code, `PR` family.
    pub code: String,
    pub name: String,
    pub customer_id: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub customer_id: Option<Uuid>,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Customer,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Project> for ActiveModel {
    fn from(value: &Project) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            code: ActiveValue::Set(value.code.clone()),
            name: ActiveValue::Set(value.name.clone()),
            customer_id: ActiveValue::Set(value.customer_id),
            deleted_at: ActiveValue::Set(value.deleted_at),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: model.id,
            code: model.code,
            name: model.name,
            customer_id: model.customer_id,
            deleted_at: model.deleted_at,
        })
    }
}
