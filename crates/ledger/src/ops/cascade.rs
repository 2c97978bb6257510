//! Cascade delete/restore coordination.
//!
//! One declared dependency order, enforced for every removal path instead of
//! call sites deleting tables in whatever sequence happens to work:
//! children are always gone before their parent.
//!
//! State machine per entity: LIVE → SOFT_DELETED → PURGED. [`Ledger::purge`]
//! refuses to skip the soft-delete audit window; [`Ledger::hard_purge`] is
//! the admin bypass and still removes children first.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger, transactions};

use super::{Ledger, with_tx};

/// Entity families the coordinator manages, in no particular order; the
/// purge order is [`PURGE_ORDER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Transaction,
    WorkshopJobItem,
    WorkshopJob,
    OrderItem,
    Project,
    CustomerFollowUp,
    Customer,
    Supplier,
    Workshop,
}

/// Fixed purge order, derived from foreign-key direction: every kind is
/// removed before any kind that rows of it may reference.
pub const PURGE_ORDER: [EntityKind; 9] = [
    EntityKind::Transaction,
    EntityKind::WorkshopJobItem,
    EntityKind::WorkshopJob,
    EntityKind::OrderItem,
    EntityKind::Project,
    EntityKind::CustomerFollowUp,
    EntityKind::Customer,
    EntityKind::Supplier,
    EntityKind::Workshop,
];

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::WorkshopJobItem => "workshop_job_item",
            Self::WorkshopJob => "workshop_job",
            Self::OrderItem => "order_item",
            Self::Project => "project",
            Self::CustomerFollowUp => "customer_follow_up",
            Self::Customer => "customer",
            Self::Supplier => "supplier",
            Self::Workshop => "workshop",
        }
    }
}

impl TryFrom<&str> for EntityKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "transaction" => Ok(Self::Transaction),
            "workshop_job_item" => Ok(Self::WorkshopJobItem),
            "workshop_job" => Ok(Self::WorkshopJob),
            "order_item" => Ok(Self::OrderItem),
            "project" => Ok(Self::Project),
            "customer_follow_up" => Ok(Self::CustomerFollowUp),
            "customer" => Ok(Self::Customer),
            "supplier" => Ok(Self::Supplier),
            "workshop" => Ok(Self::Workshop),
            other => Err(LedgerError::Validation(format!(
                "entity: unknown entity kind: {other}"
            ))),
        }
    }
}

fn purge_rank(kind: EntityKind) -> usize {
    PURGE_ORDER
        .iter()
        .position(|candidate| *candidate == kind)
        .unwrap_or(PURGE_ORDER.len())
}

#[derive(Clone, Copy, Debug)]
struct CascadeNode {
    kind: EntityKind,
    id: Uuid,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PurgeMode {
    /// Live children abort the purge; only soft-deleted rows may go.
    Checked,
    /// Admin cleanup: any state goes, still children-first.
    Admin,
}

/// Dispatches `$body` with `$m` bound to the entity module of `$kind`.
///
/// Every managed entity shares the `id`/`deleted_at` column pair, which is
/// all the generic row operations below touch.
macro_rules! with_entity {
    ($kind:expr, $m:ident, $body:block) => {
        match $kind {
            EntityKind::Transaction => {
                use crate::transactions as $m;
                $body
            }
            EntityKind::WorkshopJobItem => {
                use crate::workshop_job_items as $m;
                $body
            }
            EntityKind::WorkshopJob => {
                use crate::workshop_jobs as $m;
                $body
            }
            EntityKind::OrderItem => {
                use crate::order_items as $m;
                $body
            }
            EntityKind::Project => {
                use crate::projects as $m;
                $body
            }
            EntityKind::CustomerFollowUp => {
                use crate::customer_follow_ups as $m;
                $body
            }
            EntityKind::Customer => {
                use crate::customers as $m;
                $body
            }
            EntityKind::Supplier => {
                use crate::suppliers as $m;
                $body
            }
            EntityKind::Workshop => {
                use crate::workshops as $m;
                $body
            }
        }
    };
}

/// `None` when the row does not exist; otherwise the soft-delete marker.
async fn entity_deleted_at(
    db: &DatabaseTransaction,
    kind: EntityKind,
    id: Uuid,
) -> ResultLedger<Option<Option<DateTime<Utc>>>> {
    with_entity!(kind, m, {
        let row = m::Entity::find_by_id(id).one(db).await?;
        Ok(row.map(|row| row.deleted_at))
    })
}

async fn set_entity_deleted_at(
    db: &DatabaseTransaction,
    kind: EntityKind,
    id: Uuid,
    stamp: Option<DateTime<Utc>>,
) -> ResultLedger<()> {
    with_entity!(kind, m, {
        let row = m::ActiveModel {
            id: ActiveValue::Set(id),
            deleted_at: ActiveValue::Set(stamp),
            ..Default::default()
        };
        row.update(db).await?;
        Ok(())
    })
}

async fn delete_entity_row(
    db: &DatabaseTransaction,
    kind: EntityKind,
    id: Uuid,
) -> ResultLedger<()> {
    with_entity!(kind, m, {
        m::Entity::delete_by_id(id).exec(db).await?;
        Ok(())
    })
}

/// Collects direct children of `$parent` through one foreign key.
macro_rules! push_children_by_fk {
    ($out:ident, $db:ident, $parent:ident, $module:ident, $kind:expr, $fk:ident) => {{
        let rows = crate::$module::Entity::find()
            .filter(crate::$module::Column::$fk.eq($parent))
            .all($db)
            .await?;
        $out.extend(rows.into_iter().map(|row| CascadeNode {
            kind: $kind,
            id: row.id,
            deleted_at: row.deleted_at,
        }));
    }};
}

/// Direct dependents of an entity, sorted children-first by [`PURGE_ORDER`].
async fn entity_children(
    db: &DatabaseTransaction,
    kind: EntityKind,
    id: Uuid,
) -> ResultLedger<Vec<CascadeNode>> {
    let mut out: Vec<CascadeNode> = Vec::new();
    match kind {
        EntityKind::Transaction
        | EntityKind::WorkshopJobItem
        | EntityKind::OrderItem
        | EntityKind::CustomerFollowUp => {}
        EntityKind::WorkshopJob => {
            push_children_by_fk!(
                out,
                db,
                id,
                workshop_job_items,
                EntityKind::WorkshopJobItem,
                WorkshopJobId
            );
            push_children_by_fk!(out, db, id, transactions, EntityKind::Transaction, WorkshopJobId);
        }
        EntityKind::Project => {
            push_children_by_fk!(out, db, id, transactions, EntityKind::Transaction, ProjectId);
            push_children_by_fk!(out, db, id, workshop_jobs, EntityKind::WorkshopJob, ProjectId);
            push_children_by_fk!(out, db, id, order_items, EntityKind::OrderItem, ProjectId);
        }
        EntityKind::Customer => {
            push_children_by_fk!(out, db, id, projects, EntityKind::Project, CustomerId);
            push_children_by_fk!(
                out,
                db,
                id,
                customer_follow_ups,
                EntityKind::CustomerFollowUp,
                CustomerId
            );
        }
        EntityKind::Supplier => {
            push_children_by_fk!(out, db, id, workshop_jobs, EntityKind::WorkshopJob, SupplierId);
        }
        EntityKind::Workshop => {
            push_children_by_fk!(out, db, id, workshop_jobs, EntityKind::WorkshopJob, WorkshopId);
        }
    }
    out.sort_by_key(|node| purge_rank(node.kind));
    Ok(out)
}

type CascadeFuture<'a> = Pin<Box<dyn Future<Output = ResultLedger<u64>> + Send + 'a>>;

/// Walks the subtree and fails on the first live dependent. Runs before the
/// target's own state is judged, so "live children" is always the loudest
/// problem a purge reports.
fn ensure_no_live_descendants<'a>(
    db: &'a DatabaseTransaction,
    kind: EntityKind,
    id: Uuid,
) -> Pin<Box<dyn Future<Output = ResultLedger<()>> + Send + 'a>> {
    Box::pin(async move {
        for child in entity_children(db, kind, id).await? {
            if child.deleted_at.is_none() {
                return Err(LedgerError::ReferentialIntegrity(format!(
                    "cannot purge {} {}: live {} {}",
                    kind.as_str(),
                    id,
                    child.kind.as_str(),
                    child.id
                )));
            }
            ensure_no_live_descendants(db, child.kind, child.id).await?;
        }
        Ok(())
    })
}

fn purge_node<'a>(db: &'a DatabaseTransaction, node: CascadeNode, mode: PurgeMode) -> CascadeFuture<'a> {
    Box::pin(async move {
        let mut purged = 0u64;
        for child in entity_children(db, node.kind, node.id).await? {
            if mode == PurgeMode::Checked && child.deleted_at.is_none() {
                return Err(LedgerError::ReferentialIntegrity(format!(
                    "cannot purge {} {}: live {} {}",
                    node.kind.as_str(),
                    node.id,
                    child.kind.as_str(),
                    child.id
                )));
            }
            purged += purge_node(db, child, mode).await?;
        }
        delete_entity_row(db, node.kind, node.id).await?;
        Ok(purged + 1)
    })
}

fn soft_delete_node<'a>(
    db: &'a DatabaseTransaction,
    node: CascadeNode,
    stamp: DateTime<Utc>,
) -> CascadeFuture<'a> {
    Box::pin(async move {
        let mut marked = 0u64;
        for child in entity_children(db, node.kind, node.id).await? {
            marked += soft_delete_node(db, child, stamp).await?;
        }
        if node.deleted_at.is_none() {
            set_entity_deleted_at(db, node.kind, node.id, Some(stamp)).await?;
            marked += 1;
        }
        Ok(marked)
    })
}

/// Restores a subtree top-down so parents are live before their children,
/// only following rows stamped by the same cascade instant.
fn restore_node<'a>(
    db: &'a DatabaseTransaction,
    node: CascadeNode,
    stamp: DateTime<Utc>,
) -> CascadeFuture<'a> {
    Box::pin(async move {
        validate_restore_refs(db, node.kind, node.id).await?;
        set_entity_deleted_at(db, node.kind, node.id, None).await?;
        let mut restored = 1u64;
        for child in entity_children(db, node.kind, node.id).await? {
            if child.deleted_at == Some(stamp) {
                restored += restore_node(db, child, stamp).await?;
            }
        }
        Ok(restored)
    })
}

/// Checks every entity the row references is live before it comes back.
///
/// Used by the single-row restore ops as well as [`Ledger::restore_cascade`].
macro_rules! ensure_ref_live {
    ($db:ident, $module:ident, $ref_id:expr, $owner:expr, $label:literal) => {{
        let live = crate::$module::Entity::find_by_id($ref_id)
            .one($db)
            .await?
            .map(|row| row.deleted_at.is_none())
            .unwrap_or(false);
        if !live {
            return Err(LedgerError::ReferentialIntegrity(format!(
                "cannot restore {}: {} {} is not live",
                $owner, $label, $ref_id
            )));
        }
    }};
}

pub(crate) async fn validate_restore_refs(
    db: &DatabaseTransaction,
    kind: EntityKind,
    id: Uuid,
) -> ResultLedger<()> {
    match kind {
        EntityKind::Transaction => {
            let Some(row) = crate::transactions::Entity::find_by_id(id).one(db).await? else {
                return Ok(());
            };
            let owner = format!("transaction {}", row.code);
            ensure_ref_live!(db, wallets, row.wallet_id, owner, "wallet");
            if let Some(wallet_to_id) = row.wallet_to_id {
                ensure_ref_live!(db, wallets, wallet_to_id, owner, "wallet");
            }
            if let Some(category_id) = row.income_category_id {
                let live = crate::categories::income::Entity::find_by_id(category_id)
                    .one(db)
                    .await?
                    .map(|row| row.deleted_at.is_none())
                    .unwrap_or(false);
                if !live {
                    return Err(LedgerError::ReferentialIntegrity(format!(
                        "cannot restore {owner}: income category {category_id} is not live"
                    )));
                }
            }
            if let Some(category_id) = row.expense_category_id {
                let live = crate::categories::expense::Entity::find_by_id(category_id)
                    .one(db)
                    .await?
                    .map(|row| row.deleted_at.is_none())
                    .unwrap_or(false);
                if !live {
                    return Err(LedgerError::ReferentialIntegrity(format!(
                        "cannot restore {owner}: expense category {category_id} is not live"
                    )));
                }
            }
            if let Some(project_id) = row.project_id {
                ensure_ref_live!(db, projects, project_id, owner, "project");
            }
            if let Some(job_id) = row.workshop_job_id {
                ensure_ref_live!(db, workshop_jobs, job_id, owner, "workshop job");
            }
        }
        EntityKind::WorkshopJobItem => {
            let Some(row) = crate::workshop_job_items::Entity::find_by_id(id).one(db).await? else {
                return Ok(());
            };
            let owner = format!("workshop job item {id}");
            ensure_ref_live!(db, workshop_jobs, row.workshop_job_id, owner, "workshop job");
        }
        EntityKind::WorkshopJob => {
            let Some(row) = crate::workshop_jobs::Entity::find_by_id(id).one(db).await? else {
                return Ok(());
            };
            let owner = format!("workshop job {}", row.code);
            ensure_ref_live!(db, workshops, row.workshop_id, owner, "workshop");
            if let Some(project_id) = row.project_id {
                ensure_ref_live!(db, projects, project_id, owner, "project");
            }
            if let Some(supplier_id) = row.supplier_id {
                ensure_ref_live!(db, suppliers, supplier_id, owner, "supplier");
            }
        }
        EntityKind::OrderItem => {
            let Some(row) = crate::order_items::Entity::find_by_id(id).one(db).await? else {
                return Ok(());
            };
            let owner = format!("order item {id}");
            ensure_ref_live!(db, projects, row.project_id, owner, "project");
        }
        EntityKind::Project => {
            let Some(row) = crate::projects::Entity::find_by_id(id).one(db).await? else {
                return Ok(());
            };
            if let Some(customer_id) = row.customer_id {
                let owner = format!("project {}", row.code);
                ensure_ref_live!(db, customers, customer_id, owner, "customer");
            }
        }
        EntityKind::CustomerFollowUp => {
            let Some(row) = crate::customer_follow_ups::Entity::find_by_id(id).one(db).await?
            else {
                return Ok(());
            };
            let owner = format!("customer follow-up {id}");
            ensure_ref_live!(db, customers, row.customer_id, owner, "customer");
        }
        EntityKind::Customer | EntityKind::Supplier | EntityKind::Workshop => {}
    }
    Ok(())
}

impl Ledger {
    /// Purges a soft-deleted entity and its soft-deleted dependents,
    /// children first. Returns the number of rows removed.
    ///
    /// - already purged → no-op (`Ok(0)`)
    /// - any live dependent → `ReferentialIntegrity` (children go first)
    /// - target still live → `Conflict` (the audit window is not skippable
    ///   here; [`Ledger::hard_purge`] is the admin bypass)
    pub async fn purge(&self, kind: EntityKind, id: Uuid) -> ResultLedger<u64> {
        with_tx!(self, |db_tx| {
            match entity_deleted_at(&db_tx, kind, id).await? {
                None => Ok(0),
                Some(deleted_at) => {
                    ensure_no_live_descendants(&db_tx, kind, id).await?;
                    if deleted_at.is_none() {
                        return Err(LedgerError::Conflict(format!(
                            "{} {} is live; soft delete it before purging",
                            kind.as_str(),
                            id
                        )));
                    }
                    purge_node(
                        &db_tx,
                        CascadeNode {
                            kind,
                            id,
                            deleted_at,
                        },
                        PurgeMode::Checked,
                    )
                    .await
                }
            }
        })
    }

    /// Admin hard cleanup: purges regardless of soft-delete state, still
    /// removing children before parents. Returns the number of rows removed.
    pub async fn hard_purge(&self, kind: EntityKind, id: Uuid) -> ResultLedger<u64> {
        with_tx!(self, |db_tx| {
            match entity_deleted_at(&db_tx, kind, id).await? {
                None => Ok(0),
                Some(deleted_at) => {
                    purge_node(
                        &db_tx,
                        CascadeNode {
                            kind,
                            id,
                            deleted_at,
                        },
                        PurgeMode::Admin,
                    )
                    .await
                }
            }
        })
    }

    /// Soft-deletes an entity and all its dependents with one shared
    /// timestamp. Idempotent: already-marked rows keep their marker.
    pub async fn soft_delete_cascade(&self, kind: EntityKind, id: Uuid) -> ResultLedger<u64> {
        with_tx!(self, |db_tx| {
            match entity_deleted_at(&db_tx, kind, id).await? {
                None => Err(LedgerError::NotFound(format!("{} {}", kind.as_str(), id))),
                Some(deleted_at) => {
                    let stamp = Utc::now();
                    soft_delete_node(
                        &db_tx,
                        CascadeNode {
                            kind,
                            id,
                            deleted_at,
                        },
                        stamp,
                    )
                    .await
                }
            }
        })
    }

    /// Restores an entity and the dependents soft-deleted by the same
    /// cascade, re-validating references top-down. Rows deleted
    /// independently of that cascade stay deleted.
    pub async fn restore_cascade(&self, kind: EntityKind, id: Uuid) -> ResultLedger<u64> {
        with_tx!(self, |db_tx| {
            match entity_deleted_at(&db_tx, kind, id).await? {
                None => Err(LedgerError::NotFound(format!("{} {}", kind.as_str(), id))),
                Some(None) => Ok(0),
                Some(Some(stamp)) => {
                    restore_node(
                        &db_tx,
                        CascadeNode {
                            kind,
                            id,
                            deleted_at: Some(stamp),
                        },
                        stamp,
                    )
                    .await
                }
            }
        })
    }

    /// Bulk cleanup over seed rows: hard-purges every transaction carrying
    /// the `is_sample` provenance marker. Returns the number of rows removed.
    ///
    /// Allocated codes stay consumed; seeding again continues the sequence.
    pub async fn purge_sample_transactions(&self) -> ResultLedger<u64> {
        with_tx!(self, |db_tx| {
            let rows = transactions::Entity::find()
                .filter(transactions::Column::IsSample.eq(true))
                .all(&db_tx)
                .await?;
            let mut purged = 0u64;
            for row in rows {
                purged += purge_node(
                    &db_tx,
                    CascadeNode {
                        kind: EntityKind::Transaction,
                        id: row.id,
                        deleted_at: row.deleted_at,
                    },
                    PurgeMode::Admin,
                )
                .await?;
            }
            Ok(purged)
        })
    }
}
