pub use sea_orm_migration::prelude::*;

mod m20260302_000001_wallets;
mod m20260302_000002_categories;
mod m20260309_000001_directory;
mod m20260316_000001_transactions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260302_000001_wallets::Migration),
            Box::new(m20260302_000002_categories::Migration),
            Box::new(m20260309_000001_directory::Migration),
            Box::new(m20260316_000001_transactions::Migration),
        ]
    }
}
