use chrono::NaiveDate;
use migration::MigratorTrait;
use sea_orm::Database;

use ledger::{EntityKind, Ledger, LedgerError, TransactionDraft, WalletKind};

async fn ledger_with_db() -> Ledger {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Ledger::builder().database(db).build().unwrap()
}

fn day(year: i32, month: u32, dayofmonth: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dayofmonth).unwrap()
}

/// Customer → project → order item + workshop job (with item) + expense
/// booked against the project.
struct Fixture {
    wallet: ledger::Wallet,
    customer: uuid::Uuid,
    project: ledger::Project,
    order_item: uuid::Uuid,
    workshop: uuid::Uuid,
    job: ledger::WorkshopJob,
    job_item: uuid::Uuid,
    expense: ledger::Transaction,
}

async fn build_fixture(ledger: &Ledger) -> Fixture {
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let customer = ledger.create_customer("Anna Kovács", None).await.unwrap();
    let project = ledger
        .create_project("Kitchen set", Some(customer))
        .await
        .unwrap();
    let order_item = ledger
        .add_order_item(project.id, "Oak table", 1, 450_000)
        .await
        .unwrap();
    let workshop = ledger.create_workshop("Main floor").await.unwrap();
    let job = ledger
        .create_workshop_job("Cut and assemble", workshop, Some(project.id), None)
        .await
        .unwrap();
    let job_item = ledger
        .add_workshop_job_item(job.id, "Oak boards", 12)
        .await
        .unwrap();
    let expense = ledger
        .create_transaction(
            TransactionDraft::expense(wallet.id, 90_000, day(2026, 5, 1)).project(project.id),
        )
        .await
        .unwrap();

    Fixture {
        wallet,
        customer,
        project,
        order_item,
        workshop,
        job,
        job_item,
        expense,
    }
}

#[tokio::test]
async fn purge_with_live_children_fails() {
    let ledger = ledger_with_db().await;
    let fixture = build_fixture(&ledger).await;

    let err = ledger
        .purge(EntityKind::Project, fixture.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ReferentialIntegrity(_)));

    // Everything still present.
    assert!(ledger.transaction(fixture.expense.id).await.is_ok());
}

#[tokio::test]
async fn purge_succeeds_after_children_are_gone() {
    let ledger = ledger_with_db().await;
    let fixture = build_fixture(&ledger).await;

    let marked = ledger
        .soft_delete_cascade(EntityKind::Project, fixture.project.id)
        .await
        .unwrap();
    // project + order item + job + job item + expense
    assert_eq!(marked, 5);

    // Children first, then the project itself.
    ledger
        .purge(EntityKind::Transaction, fixture.expense.id)
        .await
        .unwrap();
    ledger
        .purge(EntityKind::WorkshopJobItem, fixture.job_item)
        .await
        .unwrap();
    ledger
        .purge(EntityKind::WorkshopJob, fixture.job.id)
        .await
        .unwrap();
    ledger
        .purge(EntityKind::OrderItem, fixture.order_item)
        .await
        .unwrap();
    let removed = ledger
        .purge(EntityKind::Project, fixture.project.id)
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let err = ledger.transaction(fixture.expense.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    // Purging an already-purged entity is a no-op.
    let removed = ledger
        .purge(EntityKind::Project, fixture.project.id)
        .await
        .unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn purge_recurses_over_soft_deleted_children() {
    let ledger = ledger_with_db().await;
    let fixture = build_fixture(&ledger).await;

    ledger
        .soft_delete_cascade(EntityKind::Project, fixture.project.id)
        .await
        .unwrap();
    let removed = ledger
        .purge(EntityKind::Project, fixture.project.id)
        .await
        .unwrap();
    assert_eq!(removed, 5);

    // The customer, workshop and wallet are not part of the project subtree.
    assert!(ledger.wallet(fixture.wallet.id).await.is_ok());
    let report = ledger.report(fixture.wallet.id, None, None).await.unwrap();
    assert_eq!(report.balance.net, 0);
}

#[tokio::test]
async fn purge_refuses_live_target() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let expense = ledger
        .create_transaction(TransactionDraft::expense(wallet.id, 1_000, day(2026, 5, 2)))
        .await
        .unwrap();

    let err = ledger
        .purge(EntityKind::Transaction, expense.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));

    // The admin path may skip the audit window.
    let removed = ledger
        .hard_purge(EntityKind::Transaction, expense.id)
        .await
        .unwrap();
    assert_eq!(removed, 1);
}

#[tokio::test]
async fn hard_purge_takes_the_whole_subtree() {
    let ledger = ledger_with_db().await;
    let fixture = build_fixture(&ledger).await;

    let removed = ledger
        .hard_purge(EntityKind::Customer, fixture.customer)
        .await
        .unwrap();
    // customer + project + order item + job + job item + expense
    assert_eq!(removed, 6);

    assert!(ledger.transaction(fixture.expense.id).await.is_err());
    assert!(ledger.wallet(fixture.wallet.id).await.is_ok());
    assert!(ledger.create_workshop("Second floor").await.is_ok());
}

#[tokio::test]
async fn cascade_soft_delete_and_restore_round_trip() {
    let ledger = ledger_with_db().await;
    let fixture = build_fixture(&ledger).await;

    let balance_before = ledger
        .compute_balance(fixture.wallet.id, None, None)
        .await
        .unwrap();

    let marked = ledger
        .soft_delete_cascade(EntityKind::Customer, fixture.customer)
        .await
        .unwrap();
    // customer + project + order item + job + job item + expense
    assert_eq!(marked, 6);

    // The expense is gone from the wallet's derived balance.
    let while_deleted = ledger
        .compute_balance(fixture.wallet.id, None, None)
        .await
        .unwrap();
    assert_eq!(while_deleted.expense_total, 0);

    let restored = ledger
        .restore_cascade(EntityKind::Customer, fixture.customer)
        .await
        .unwrap();
    assert_eq!(restored, 6);

    let after = ledger
        .compute_balance(fixture.wallet.id, None, None)
        .await
        .unwrap();
    assert_eq!(after, balance_before);

    let expense = ledger.transaction(fixture.expense.id).await.unwrap();
    assert!(expense.deleted_at.is_none());
}

#[tokio::test]
async fn restore_cascade_skips_independently_deleted_rows() {
    let ledger = ledger_with_db().await;
    let fixture = build_fixture(&ledger).await;

    // The expense was reversed on its own before the whole project was
    // retired; bringing the project back must not resurrect it.
    ledger
        .soft_delete_transaction(fixture.expense.id)
        .await
        .unwrap();
    ledger
        .soft_delete_cascade(EntityKind::Project, fixture.project.id)
        .await
        .unwrap();

    let restored = ledger
        .restore_cascade(EntityKind::Project, fixture.project.id)
        .await
        .unwrap();
    // project + order item + job + job item; not the expense
    assert_eq!(restored, 4);

    let expense = ledger.transaction(fixture.expense.id).await.unwrap();
    assert!(expense.deleted_at.is_some());
}

#[tokio::test]
async fn restore_child_requires_live_parent() {
    let ledger = ledger_with_db().await;
    let fixture = build_fixture(&ledger).await;

    ledger
        .soft_delete_cascade(EntityKind::Customer, fixture.customer)
        .await
        .unwrap();

    let err = ledger
        .restore_cascade(EntityKind::Project, fixture.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ReferentialIntegrity(_)));

    // Restoring from the top works, parents before children.
    ledger
        .restore_cascade(EntityKind::Customer, fixture.customer)
        .await
        .unwrap();
    let expense = ledger
        .find_transaction_by_code(&fixture.expense.code)
        .await
        .unwrap();
    assert!(expense.deleted_at.is_none());
}

#[tokio::test]
async fn soft_delete_cascade_is_idempotent() {
    let ledger = ledger_with_db().await;
    let fixture = build_fixture(&ledger).await;

    let first = ledger
        .soft_delete_cascade(EntityKind::Project, fixture.project.id)
        .await
        .unwrap();
    assert_eq!(first, 5);
    let second = ledger
        .soft_delete_cascade(EntityKind::Project, fixture.project.id)
        .await
        .unwrap();
    assert_eq!(second, 0);

    let missing = uuid::Uuid::new_v4();
    let err = ledger
        .soft_delete_cascade(EntityKind::Project, missing)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn purge_sample_transactions_spares_real_rows() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();
    let date = day(2026, 5, 3);

    let seeded = ledger
        .create_transaction(
            TransactionDraft::income(wallet.id, sales.id, 1_000, date).sample(),
        )
        .await
        .unwrap();
    let real = ledger
        .create_transaction(TransactionDraft::income(wallet.id, sales.id, 2_000, date))
        .await
        .unwrap();

    let purged = ledger.purge_sample_transactions().await.unwrap();
    assert_eq!(purged, 1);

    assert!(ledger.transaction(seeded.id).await.is_err());
    assert!(ledger.transaction(real.id).await.is_ok());

    // Consumed codes stay consumed after the cleanup.
    let next = ledger
        .create_transaction(TransactionDraft::income(wallet.id, sales.id, 3_000, date))
        .await
        .unwrap();
    assert_eq!(next.code, "PT0003");
}
