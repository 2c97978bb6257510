use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum DocumentCodes {
    Table,
    Code,
    Prefix,
    AllocatedAt,
}

#[derive(Iden)]
pub enum Wallets {
    Table,
    Id,
    Code,
    Name,
    Kind,
    DeletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DocumentCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentCodes::Code)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DocumentCodes::Prefix).string().not_null())
                    .col(
                        ColumnDef::new(DocumentCodes::AllocatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-document_codes-prefix-code")
                    .table(DocumentCodes::Table)
                    .col(DocumentCodes::Prefix)
                    .col(DocumentCodes::Code)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wallets::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wallets::Code).string().not_null())
                    .col(ColumnDef::new(Wallets::Name).string().not_null())
                    .col(ColumnDef::new(Wallets::Kind).string().not_null())
                    .col(ColumnDef::new(Wallets::DeletedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wallets-code")
                    .table(Wallets::Table)
                    .col(Wallets::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DocumentCodes::Table).to_owned())
            .await?;
        Ok(())
    }
}
