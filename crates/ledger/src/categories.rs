//! Category registries for the two spend universes.
//!
//! Income and expense categories live in separate tables; a category id only
//! ever resolves inside its own universe, which is what keeps an income
//! category from being attached to an expense and vice versa.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Income category table, codes in the `IC` family.
pub mod income {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "income_categories")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub code: String,
        pub name: String,
        /// NFC-lowercase dedup key.
        pub name_norm: String,
        pub deleted_at: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Expense category table, codes in the `EC` family.
pub mod expense {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "expense_categories")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub code: String,
        pub name: String,
        /// NFC-lowercase dedup key.
        pub name_norm: String,
        pub deleted_at: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// A category of either universe, as handed back to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<income::Model> for Category {
    fn from(model: income::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            deleted_at: model.deleted_at,
        }
    }
}

impl From<expense::Model> for Category {
    fn from(model: expense::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            deleted_at: model.deleted_at,
        }
    }
}
