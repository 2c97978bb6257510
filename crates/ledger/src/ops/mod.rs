use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sea_orm::{DatabaseConnection, DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger, util};

mod adjustments;
mod balances;
mod cascade;
mod categories;
mod codes;
mod directory;
mod reports;
mod transactions;
mod wallets;

pub use balances::WalletBalance;
pub use cascade::EntityKind;
pub use reports::{ReconciliationWarning, WalletReport};
pub use transactions::{TransactionListFilter, TransactionPage};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger engine.
///
/// Owns an explicit database handle with an app-managed lifecycle; there is
/// no process-global client. Every operation runs to completion inside one
/// database transaction.
#[derive(Debug)]
pub struct Ledger {
    database: DatabaseConnection,
    reporting_tz: Tz,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Timezone used to expand civil days into instants.
    pub fn reporting_timezone(&self) -> Tz {
        self.reporting_tz
    }

    /// Canonical instant for a caller-supplied date.
    pub(crate) fn resolve_date(&self, date: util::LedgerDate) -> DateTime<Utc> {
        util::range_lower(self.reporting_tz, date)
    }

    pub(crate) fn range_lower(&self, bound: util::LedgerDate) -> DateTime<Utc> {
        util::range_lower(self.reporting_tz, bound)
    }

    pub(crate) fn range_upper(&self, bound: util::LedgerDate) -> util::UpperBound {
        util::range_upper(self.reporting_tz, bound)
    }
}

/// Generates `fetch_*` (any state, `NotFound` when missing) and
/// `require_live_*` (`Validation` naming the field when soft-deleted)
/// accessors for a referenced entity.
macro_rules! impl_require_live {
    ($fetch_fn:ident, $require_fn:ident, $entity:path, $label:literal) => {
        pub(crate) async fn $fetch_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
        ) -> ResultLedger<<$entity as EntityTrait>::Model> {
            <$entity>::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("{} {id}", $label)))
        }

        pub(crate) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
            field: &str,
        ) -> ResultLedger<<$entity as EntityTrait>::Model> {
            let model = self.$fetch_fn(db, id).await?;
            if model.deleted_at.is_some() {
                return Err(LedgerError::Validation(format!(
                    "{field}: {} {id} is soft-deleted",
                    $label
                )));
            }
            Ok(model)
        }
    };
}

impl Ledger {
    impl_require_live!(fetch_wallet, require_live_wallet, crate::wallets::Entity, "wallet");

    impl_require_live!(
        fetch_income_category,
        require_live_income_category,
        crate::categories::income::Entity,
        "income category"
    );

    impl_require_live!(
        fetch_expense_category,
        require_live_expense_category,
        crate::categories::expense::Entity,
        "expense category"
    );

    impl_require_live!(fetch_project, require_live_project, crate::projects::Entity, "project");

    impl_require_live!(
        fetch_workshop_job,
        require_live_workshop_job,
        crate::workshop_jobs::Entity,
        "workshop job"
    );

    impl_require_live!(fetch_customer, require_live_customer, crate::customers::Entity, "customer");

    impl_require_live!(fetch_supplier, require_live_supplier, crate::suppliers::Entity, "supplier");

    impl_require_live!(fetch_workshop, require_live_workshop, crate::workshops::Entity, "workshop");
}

/// The builder for `Ledger`
pub struct LedgerBuilder {
    database: DatabaseConnection,
    reporting_tz: Tz,
}

impl Default for LedgerBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            reporting_tz: Tz::UTC,
        }
    }
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Timezone civil days are expanded in. Defaults to UTC.
    pub fn reporting_timezone(mut self, tz: Tz) -> LedgerBuilder {
        self.reporting_tz = tz;
        self
    }

    /// Construct `Ledger`
    pub fn build(self) -> ResultLedger<Ledger> {
        Ok(Ledger {
            database: self.database,
            reporting_tz: self.reporting_tz,
        })
    }
}
