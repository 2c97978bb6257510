//! Material/work line items of a workshop job.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workshop_job_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workshop_job_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workshop_jobs::Entity",
        from = "Column::WorkshopJobId",
        to = "super::workshop_jobs::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    WorkshopJob,
}

impl Related<super::workshop_jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkshopJob.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
