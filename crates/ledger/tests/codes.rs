use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

use ledger::{EntityKind, Ledger, LedgerError, TransactionDraft, WalletKind};

async fn ledger_with_db() -> Ledger {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Ledger::builder().database(db).build().unwrap()
}

async fn ledger_with_file_db() -> (Ledger, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("ledger_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder().database(db).build().unwrap();
    (ledger, path)
}

fn day(year: i32, month: u32, dayofmonth: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dayofmonth).unwrap()
}

#[tokio::test]
async fn codes_are_sequential_per_family() {
    let ledger = ledger_with_db().await;

    let cash = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let bank = ledger.create_wallet("Bank", WalletKind::Bank).await.unwrap();
    assert_eq!(cash.code, "W0001");
    assert_eq!(bank.code, "W0002");

    let sales = ledger.create_income_category("Sales").await.unwrap();
    assert_eq!(sales.code, "IC0001");

    let date = day(2026, 1, 10);
    let first = ledger
        .create_transaction(TransactionDraft::income(cash.id, sales.id, 100, date))
        .await
        .unwrap();
    let spend = ledger
        .create_transaction(TransactionDraft::expense(cash.id, 50, date))
        .await
        .unwrap();
    let second = ledger
        .create_transaction(TransactionDraft::income(cash.id, sales.id, 200, date))
        .await
        .unwrap();
    let movement = ledger
        .create_transaction(TransactionDraft::transfer(cash.id, bank.id, 25, date))
        .await
        .unwrap();

    // Each family counts independently of the others.
    assert_eq!(first.code, "PT0001");
    assert_eq!(second.code, "PT0002");
    assert_eq!(spend.code, "PC0001");
    assert_eq!(movement.code, "TF0001");
}

#[tokio::test]
async fn purged_codes_are_never_reissued() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();
    let date = day(2026, 1, 11);

    let first = ledger
        .create_transaction(TransactionDraft::income(wallet.id, sales.id, 100, date))
        .await
        .unwrap();
    assert_eq!(first.code, "PT0001");

    ledger.soft_delete_transaction(first.id).await.unwrap();
    let purged = ledger.purge(EntityKind::Transaction, first.id).await.unwrap();
    assert_eq!(purged, 1);

    let next = ledger
        .create_transaction(TransactionDraft::income(wallet.id, sales.id, 100, date))
        .await
        .unwrap();
    assert_eq!(next.code, "PT0002");
}

#[tokio::test]
async fn adjustments_use_their_own_family() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();

    let adjustment = ledger
        .create_adjustment(ledger::AdjustmentDraft::new(
            wallet.id,
            -1_500,
            day(2026, 1, 12),
        ))
        .await
        .unwrap();
    assert_eq!(adjustment.code, "AD0001");
}

#[tokio::test]
async fn concurrent_creates_never_share_a_code() {
    let (ledger, path) = ledger_with_file_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();

    let ledger = Arc::new(ledger);
    let mut tasks = tokio::task::JoinSet::new();
    const WRITERS: usize = 8;
    for _ in 0..WRITERS {
        let ledger = Arc::clone(&ledger);
        let wallet_id = wallet.id;
        let category_id = sales.id;
        tasks.spawn(async move {
            ledger
                .create_transaction(TransactionDraft::income(
                    wallet_id,
                    category_id,
                    1_000,
                    day(2026, 1, 13),
                ))
                .await
        });
    }

    let mut codes = HashSet::new();
    let mut successes = 0usize;
    let mut conflicts = 0usize;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(tx) => {
                successes += 1;
                assert!(codes.insert(tx.code.clone()), "duplicate code {}", tx.code);
            }
            // Losing every allocation race is acceptable; anything else is not.
            Err(LedgerError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error under contention: {other}"),
        }
    }

    assert_eq!(successes + conflicts, WRITERS);
    assert!(successes >= 1);
    assert_eq!(codes.len(), successes);

    drop(ledger);
    let _ = std::fs::remove_file(path);
}
