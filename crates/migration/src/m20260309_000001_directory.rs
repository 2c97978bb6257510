use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Customers {
    Table,
    Id,
    Name,
    Phone,
    DeletedAt,
}

#[derive(Iden)]
pub enum Suppliers {
    Table,
    Id,
    Name,
    Phone,
    DeletedAt,
}

#[derive(Iden)]
pub enum Workshops {
    Table,
    Id,
    Name,
    DeletedAt,
}

#[derive(Iden)]
pub enum Projects {
    Table,
    Id,
    Code,
    Name,
    CustomerId,
    DeletedAt,
}

#[derive(Iden)]
pub enum OrderItems {
    Table,
    Id,
    ProjectId,
    Name,
    Quantity,
    UnitPriceMinor,
    DeletedAt,
}

#[derive(Iden)]
pub enum WorkshopJobs {
    Table,
    Id,
    Code,
    Name,
    WorkshopId,
    ProjectId,
    SupplierId,
    DeletedAt,
}

#[derive(Iden)]
pub enum WorkshopJobItems {
    Table,
    Id,
    WorkshopJobId,
    Name,
    Quantity,
    DeletedAt,
}

#[derive(Iden)]
pub enum CustomerFollowUps {
    Table,
    Id,
    CustomerId,
    Note,
    OccurredAt,
    DeletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Phone).string())
                    .col(ColumnDef::new(Customers::DeletedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suppliers::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Suppliers::Name).string().not_null())
                    .col(ColumnDef::new(Suppliers::Phone).string())
                    .col(ColumnDef::new(Suppliers::DeletedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Workshops::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workshops::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workshops::Name).string().not_null())
                    .col(ColumnDef::new(Workshops::DeletedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::Code).string().not_null())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::CustomerId).blob())
                    .col(ColumnDef::new(Projects::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-projects-customer_id")
                            .from(Projects::Table, Projects::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-projects-code")
                    .table(Projects::Table)
                    .col(Projects::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-projects-customer_id")
                    .table(Projects::Table)
                    .col(Projects::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderItems::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderItems::ProjectId).blob().not_null())
                    .col(ColumnDef::new(OrderItems::Name).string().not_null())
                    .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(OrderItems::UnitPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderItems::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_items-project_id")
                            .from(OrderItems::Table, OrderItems::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-order_items-project_id")
                    .table(OrderItems::Table)
                    .col(OrderItems::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkshopJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkshopJobs::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkshopJobs::Code).string().not_null())
                    .col(ColumnDef::new(WorkshopJobs::Name).string().not_null())
                    .col(ColumnDef::new(WorkshopJobs::WorkshopId).blob().not_null())
                    .col(ColumnDef::new(WorkshopJobs::ProjectId).blob())
                    .col(ColumnDef::new(WorkshopJobs::SupplierId).blob())
                    .col(ColumnDef::new(WorkshopJobs::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workshop_jobs-workshop_id")
                            .from(WorkshopJobs::Table, WorkshopJobs::WorkshopId)
                            .to(Workshops::Table, Workshops::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workshop_jobs-project_id")
                            .from(WorkshopJobs::Table, WorkshopJobs::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workshop_jobs-supplier_id")
                            .from(WorkshopJobs::Table, WorkshopJobs::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-workshop_jobs-code")
                    .table(WorkshopJobs::Table)
                    .col(WorkshopJobs::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-workshop_jobs-workshop_id")
                    .table(WorkshopJobs::Table)
                    .col(WorkshopJobs::WorkshopId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-workshop_jobs-project_id")
                    .table(WorkshopJobs::Table)
                    .col(WorkshopJobs::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-workshop_jobs-supplier_id")
                    .table(WorkshopJobs::Table)
                    .col(WorkshopJobs::SupplierId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkshopJobItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkshopJobItems::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkshopJobItems::WorkshopJobId)
                            .blob()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkshopJobItems::Name).string().not_null())
                    .col(
                        ColumnDef::new(WorkshopJobItems::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkshopJobItems::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workshop_job_items-workshop_job_id")
                            .from(WorkshopJobItems::Table, WorkshopJobItems::WorkshopJobId)
                            .to(WorkshopJobs::Table, WorkshopJobs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-workshop_job_items-workshop_job_id")
                    .table(WorkshopJobItems::Table)
                    .col(WorkshopJobItems::WorkshopJobId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerFollowUps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerFollowUps::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomerFollowUps::CustomerId)
                            .blob()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomerFollowUps::Note).string().not_null())
                    .col(
                        ColumnDef::new(CustomerFollowUps::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomerFollowUps::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-customer_follow_ups-customer_id")
                            .from(CustomerFollowUps::Table, CustomerFollowUps::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-customer_follow_ups-customer_id")
                    .table(CustomerFollowUps::Table)
                    .col(CustomerFollowUps::CustomerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerFollowUps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkshopJobItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkshopJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workshops::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        Ok(())
    }
}
