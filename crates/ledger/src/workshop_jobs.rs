//! Workshop production jobs.
//!
//! A job runs inside a workshop, optionally for a project, optionally
//! sourcing material from a supplier. Expenses can be booked against it.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkshopJob {
    pub id: Uuid,
    /// Allocator-issued document code, `WJ` family.
    pub code: String,
    pub name: String,
    pub workshop_id: Uuid,
    pub project_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workshop_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub workshop_id: Uuid,
    pub project_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workshops::Entity",
        from = "Column::WorkshopId",
        to = "super::workshops::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Workshop,
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::suppliers::Entity",
        from = "Column::SupplierId",
        to = "super::suppliers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Supplier,
    #[sea_orm(has_many = "super::workshop_job_items::Entity")]
    Items,
}

impl Related<super::workshops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workshop.def()
    }
}

impl Related<super::workshop_job_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&WorkshopJob> for ActiveModel {
    fn from(value: &WorkshopJob) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            code: ActiveValue::Set(value.code.clone()),
            name: ActiveValue::Set(value.name.clone()),
            workshop_id: ActiveValue::Set(value.workshop_id),
            project_id: ActiveValue::Set(value.project_id),
            supplier_id: ActiveValue::Set(value.supplier_id),
            deleted_at: ActiveValue::Set(value.deleted_at),
        }
    }
}

impl TryFrom<Model> for WorkshopJob {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: model.id,
            code: model.code,
            name: model.name,
            workshop_id: model.workshop_id,
            project_id: model.project_id,
            supplier_id: model.supplier_id,
            deleted_at: model.deleted_at,
        })
    }
}
