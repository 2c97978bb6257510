//! Directory / cost-center operations: customers, suppliers, workshops,
//! projects, workshop jobs and their line items.
//!
//! These entities exist so money movements have something to hang off; the
//! heavy lifting (validation, balances, cascade rules) lives elsewhere.

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CodePrefix, LedgerError, Project, ResultLedger, WorkshopJob, customer_follow_ups, customers,
    order_items, projects, suppliers, util::LedgerDate, util::normalize_optional_text,
    workshop_job_items, workshop_jobs, workshops,
};

use super::codes::{CODE_ALLOC_ATTEMPTS, is_retryable_code_conflict, retries_exhausted};
use super::{Ledger, with_tx};

/// Generates a create op for a plain named directory entity.
macro_rules! impl_named_create {
    ($(#[$meta:meta])* $fn_name:ident, $module:ident, $label:literal) => {
        $(#[$meta])*
        pub async fn $fn_name(&self, name: &str, phone: Option<&str>) -> ResultLedger<Uuid> {
            let name = name.trim();
            if name.is_empty() {
                return Err(LedgerError::Validation(format!(
                    "name: {} name must not be empty",
                    $label
                )));
            }
            with_tx!(self, |db_tx| {
                let id = Uuid::new_v4();
                let model = $module::ActiveModel {
                    id: ActiveValue::Set(id),
                    name: ActiveValue::Set(name.to_string()),
                    phone: ActiveValue::Set(normalize_optional_text(phone)),
                    deleted_at: ActiveValue::Set(None),
                };
                model.insert(&db_tx).await?;
                Ok(id)
            })
        }
    };
}

impl Ledger {
    impl_named_create!(
        /// Registers a customer.
        create_customer,
        customers,
        "customer"
    );

    impl_named_create!(
        /// Registers a supplier.
        create_supplier,
        suppliers,
        "supplier"
    );

    /// Registers a workshop.
    pub async fn create_workshop(&self, name: &str) -> ResultLedger<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation(
                "name: workshop name must not be empty".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let id = Uuid::new_v4();
            let model = workshops::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(name.to_string()),
                deleted_at: ActiveValue::Set(None),
            };
            model.insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Opens a project with an allocator-issued `PR` code.
    pub async fn create_project(
        &self,
        name: &str,
        customer_id: Option<Uuid>,
    ) -> ResultLedger<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation(
                "name: project name must not be empty".to_string(),
            ));
        }
        for _ in 0..CODE_ALLOC_ATTEMPTS {
            match self.try_create_project(name, customer_id).await {
                Err(err) if is_retryable_code_conflict(&err) => continue,
                other => return other,
            }
        }
        Err(retries_exhausted(CodePrefix::Project))
    }

    async fn try_create_project(
        &self,
        name: &str,
        customer_id: Option<Uuid>,
    ) -> ResultLedger<Project> {
        with_tx!(self, |db_tx| {
            if let Some(customer_id) = customer_id {
                self.require_live_customer(&db_tx, customer_id, "customer_id")
                    .await?;
            }
            let project = Project {
                id: Uuid::new_v4(),
                code: self.allocate_code(&db_tx, CodePrefix::Project).await?,
                name: name.to_string(),
                customer_id,
                deleted_at: None,
            };
            projects::ActiveModel::from(&project).insert(&db_tx).await?;
            Ok(project)
        })
    }

    /// Opens a workshop job with an allocator-issued `WJ` code.
    pub async fn create_workshop_job(
        &self,
        name: &str,
        workshop_id: Uuid,
        project_id: Option<Uuid>,
        supplier_id: Option<Uuid>,
    ) -> ResultLedger<WorkshopJob> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation(
                "name: workshop job name must not be empty".to_string(),
            ));
        }
        for _ in 0..CODE_ALLOC_ATTEMPTS {
            match self
                .try_create_workshop_job(name, workshop_id, project_id, supplier_id)
                .await
            {
                Err(err) if is_retryable_code_conflict(&err) => continue,
                other => return other,
            }
        }
        Err(retries_exhausted(CodePrefix::WorkshopJob))
    }

    async fn try_create_workshop_job(
        &self,
        name: &str,
        workshop_id: Uuid,
        project_id: Option<Uuid>,
        supplier_id: Option<Uuid>,
    ) -> ResultLedger<WorkshopJob> {
        with_tx!(self, |db_tx| {
            self.require_live_workshop(&db_tx, workshop_id, "workshop_id")
                .await?;
            if let Some(project_id) = project_id {
                self.require_live_project(&db_tx, project_id, "project_id")
                    .await?;
            }
            if let Some(supplier_id) = supplier_id {
                self.require_live_supplier(&db_tx, supplier_id, "supplier_id")
                    .await?;
            }
            let job = WorkshopJob {
                id: Uuid::new_v4(),
                code: self.allocate_code(&db_tx, CodePrefix::WorkshopJob).await?,
                name: name.to_string(),
                workshop_id,
                project_id,
                supplier_id,
                deleted_at: None,
            };
            workshop_jobs::ActiveModel::from(&job).insert(&db_tx).await?;
            Ok(job)
        })
    }

    /// Adds an order line item to a project.
    pub async fn add_order_item(
        &self,
        project_id: Uuid,
        name: &str,
        quantity: i32,
        unit_price_minor: i64,
    ) -> ResultLedger<Uuid> {
        if quantity <= 0 {
            return Err(LedgerError::Validation(
                "quantity: must be > 0".to_string(),
            ));
        }
        if unit_price_minor < 0 {
            return Err(LedgerError::Validation(
                "unit_price_minor: must be >= 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            self.require_live_project(&db_tx, project_id, "project_id")
                .await?;
            let id = Uuid::new_v4();
            let model = order_items::ActiveModel {
                id: ActiveValue::Set(id),
                project_id: ActiveValue::Set(project_id),
                name: ActiveValue::Set(name.trim().to_string()),
                quantity: ActiveValue::Set(quantity),
                unit_price_minor: ActiveValue::Set(unit_price_minor),
                deleted_at: ActiveValue::Set(None),
            };
            model.insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Adds a material/work line item to a workshop job.
    pub async fn add_workshop_job_item(
        &self,
        workshop_job_id: Uuid,
        name: &str,
        quantity: i32,
    ) -> ResultLedger<Uuid> {
        if quantity <= 0 {
            return Err(LedgerError::Validation(
                "quantity: must be > 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            self.require_live_workshop_job(&db_tx, workshop_job_id, "workshop_job_id")
                .await?;
            let id = Uuid::new_v4();
            let model = workshop_job_items::ActiveModel {
                id: ActiveValue::Set(id),
                workshop_job_id: ActiveValue::Set(workshop_job_id),
                name: ActiveValue::Set(name.trim().to_string()),
                quantity: ActiveValue::Set(quantity),
                deleted_at: ActiveValue::Set(None),
            };
            model.insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Records a follow-up note on a customer.
    pub async fn add_customer_follow_up(
        &self,
        customer_id: Uuid,
        note: &str,
        date: impl Into<LedgerDate>,
    ) -> ResultLedger<Uuid> {
        let note = note.trim();
        if note.is_empty() {
            return Err(LedgerError::Validation(
                "note: follow-up note must not be empty".to_string(),
            ));
        }
        let occurred_at = self.resolve_date(date.into());
        with_tx!(self, |db_tx| {
            self.require_live_customer(&db_tx, customer_id, "customer_id")
                .await?;
            let id = Uuid::new_v4();
            let model = customer_follow_ups::ActiveModel {
                id: ActiveValue::Set(id),
                customer_id: ActiveValue::Set(customer_id),
                note: ActiveValue::Set(note.to_string()),
                occurred_at: ActiveValue::Set(occurred_at),
                deleted_at: ActiveValue::Set(None),
            };
            model.insert(&db_tx).await?;
            Ok(id)
        })
    }
}
