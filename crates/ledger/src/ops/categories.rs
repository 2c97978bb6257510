//! Category registry operations for both spend universes.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Category, CodePrefix, LedgerError, ResultLedger, categories, util::normalize_text};

use super::codes::{CODE_ALLOC_ATTEMPTS, is_retryable_code_conflict, retries_exhausted};
use super::{Ledger, with_tx};

/// Generates the create/soft-delete pair for one category universe.
macro_rules! impl_category_ops {
    ($(#[$create_meta:meta])* $create_fn:ident, $try_create_fn:ident,
     $(#[$delete_meta:meta])* $delete_fn:ident, $module:ident, $prefix:expr, $label:literal) => {
        $(#[$create_meta])*
        pub async fn $create_fn(&self, name: &str) -> ResultLedger<Category> {
            let name = name.trim();
            if name.is_empty() {
                return Err(LedgerError::Validation(format!(
                    "name: {} name must not be empty",
                    $label
                )));
            }
            for _ in 0..CODE_ALLOC_ATTEMPTS {
                match self.$try_create_fn(name).await {
                    Err(err) if is_retryable_code_conflict(&err) => continue,
                    other => return other,
                }
            }
            Err(retries_exhausted($prefix))
        }

        async fn $try_create_fn(&self, name: &str) -> ResultLedger<Category> {
            let name_norm = normalize_text(name);
            with_tx!(self, |db_tx| {
                let duplicate = categories::$module::Entity::find()
                    .filter(categories::$module::Column::NameNorm.eq(name_norm.as_str()))
                    .filter(categories::$module::Column::DeletedAt.is_null())
                    .one(&db_tx)
                    .await?
                    .is_some();
                if duplicate {
                    return Err(LedgerError::Conflict(format!(
                        "{} '{name}' already exists",
                        $label
                    )));
                }

                let code = self.allocate_code(&db_tx, $prefix).await?;
                let model = categories::$module::ActiveModel {
                    id: ActiveValue::Set(Uuid::new_v4()),
                    code: ActiveValue::Set(code),
                    name: ActiveValue::Set(name.to_string()),
                    name_norm: ActiveValue::Set(name_norm.clone()),
                    deleted_at: ActiveValue::Set(None),
                };
                let inserted = model.insert(&db_tx).await?;
                Ok(Category::from(inserted))
            })
        }

        $(#[$delete_meta])*
        pub async fn $delete_fn(&self, category_id: Uuid) -> ResultLedger<()> {
            with_tx!(self, |db_tx| {
                let model = categories::$module::Entity::find_by_id(category_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| {
                        LedgerError::NotFound(format!("{} {category_id}", $label))
                    })?;
                if model.deleted_at.is_none() {
                    let row = categories::$module::ActiveModel {
                        id: ActiveValue::Set(category_id),
                        deleted_at: ActiveValue::Set(Some(Utc::now())),
                        ..Default::default()
                    };
                    row.update(&db_tx).await?;
                }
                Ok(())
            })
        }
    };
}

impl Ledger {
    impl_category_ops!(
        /// Registers an income category with an allocator-issued `IC` code.
        create_income_category,
        try_create_income_category,
        /// Soft-deletes an income category. A no-op when already soft-deleted.
        soft_delete_income_category,
        income,
        CodePrefix::IncomeCategory,
        "income category"
    );

    impl_category_ops!(
        /// Registers an expense category with an allocator-issued `EC` code.
        create_expense_category,
        try_create_expense_category,
        /// Soft-deletes an expense category. A no-op when already soft-deleted.
        soft_delete_expense_category,
        expense,
        CodePrefix::ExpenseCategory,
        "expense category"
    );
}
