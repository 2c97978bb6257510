use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum IncomeCategories {
    Table,
    Id,
    Code,
    Name,
    NameNorm,
    DeletedAt,
}

#[derive(Iden)]
pub enum ExpenseCategories {
    Table,
    Id,
    Code,
    Name,
    NameNorm,
    DeletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IncomeCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncomeCategories::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IncomeCategories::Code).string().not_null())
                    .col(ColumnDef::new(IncomeCategories::Name).string().not_null())
                    .col(
                        ColumnDef::new(IncomeCategories::NameNorm)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IncomeCategories::DeletedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-income_categories-code")
                    .table(IncomeCategories::Table)
                    .col(IncomeCategories::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-income_categories-name_norm")
                    .table(IncomeCategories::Table)
                    .col(IncomeCategories::NameNorm)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseCategories::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseCategories::Code).string().not_null())
                    .col(ColumnDef::new(ExpenseCategories::Name).string().not_null())
                    .col(
                        ColumnDef::new(ExpenseCategories::NameNorm)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenseCategories::DeletedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expense_categories-code")
                    .table(ExpenseCategories::Table)
                    .col(ExpenseCategories::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expense_categories-name_norm")
                    .table(ExpenseCategories::Table)
                    .col(ExpenseCategories::NameNorm)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExpenseCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncomeCategories::Table).to_owned())
            .await?;
        Ok(())
    }
}
