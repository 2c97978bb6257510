use sea_orm_migration::prelude::*;

use crate::m20260302_000001_wallets::Wallets;
use crate::m20260302_000002_categories::{ExpenseCategories, IncomeCategories};
use crate::m20260309_000001_directory::{Projects, WorkshopJobs};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Code,
    Kind,
    OccurredAt,
    AmountMinor,
    WalletId,
    WalletToId,
    IncomeCategoryId,
    ExpenseCategoryId,
    ProjectId,
    WorkshopJobId,
    IsCommonCost,
    Note,
    IsSample,
    DeletedAt,
}

#[derive(Iden)]
enum Adjustments {
    Table,
    Id,
    Code,
    WalletId,
    OccurredAt,
    AmountMinor,
    Note,
    DeletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Code).string().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::WalletId).blob().not_null())
                    .col(ColumnDef::new(Transactions::WalletToId).blob())
                    .col(ColumnDef::new(Transactions::IncomeCategoryId).blob())
                    .col(ColumnDef::new(Transactions::ExpenseCategoryId).blob())
                    .col(ColumnDef::new(Transactions::ProjectId).blob())
                    .col(ColumnDef::new(Transactions::WorkshopJobId).blob())
                    .col(
                        ColumnDef::new(Transactions::IsCommonCost)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Note).string())
                    .col(ColumnDef::new(Transactions::IsSample).boolean().not_null())
                    .col(ColumnDef::new(Transactions::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-wallet_id")
                            .from(Transactions::Table, Transactions::WalletId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-wallet_to_id")
                            .from(Transactions::Table, Transactions::WalletToId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-income_category_id")
                            .from(Transactions::Table, Transactions::IncomeCategoryId)
                            .to(IncomeCategories::Table, IncomeCategories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-expense_category_id")
                            .from(Transactions::Table, Transactions::ExpenseCategoryId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-project_id")
                            .from(Transactions::Table, Transactions::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-workshop_job_id")
                            .from(Transactions::Table, Transactions::WorkshopJobId)
                            .to(WorkshopJobs::Table, WorkshopJobs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-code")
                    .table(Transactions::Table)
                    .col(Transactions::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-wallet_id-occurred_at")
                    .table(Transactions::Table)
                    .col(Transactions::WalletId)
                    .col(Transactions::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-wallet_to_id")
                    .table(Transactions::Table)
                    .col(Transactions::WalletToId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-project_id")
                    .table(Transactions::Table)
                    .col(Transactions::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-workshop_job_id")
                    .table(Transactions::Table)
                    .col(Transactions::WorkshopJobId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Adjustments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Adjustments::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Adjustments::Code).string().not_null())
                    .col(ColumnDef::new(Adjustments::WalletId).blob().not_null())
                    .col(
                        ColumnDef::new(Adjustments::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Adjustments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Adjustments::Note).string())
                    .col(ColumnDef::new(Adjustments::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-adjustments-wallet_id")
                            .from(Adjustments::Table, Adjustments::WalletId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-adjustments-code")
                    .table(Adjustments::Table)
                    .col(Adjustments::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-adjustments-wallet_id-occurred_at")
                    .table(Adjustments::Table)
                    .col(Adjustments::WalletId)
                    .col(Adjustments::OccurredAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Adjustments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        Ok(())
    }
}
