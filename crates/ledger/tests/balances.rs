use chrono::NaiveDate;
use migration::MigratorTrait;
use sea_orm::Database;

use ledger::{
    AdjustmentDraft, Ledger, LedgerError, ReconciliationWarning, TransactionDraft, WalletKind,
};

async fn ledger_with_db() -> Ledger {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Ledger::builder().database(db).build().unwrap()
}

fn day(year: i32, month: u32, dayofmonth: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dayofmonth).unwrap()
}

#[tokio::test]
async fn balance_is_a_pure_function_of_live_rows() {
    let ledger = ledger_with_db().await;
    let cash = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let bank = ledger.create_wallet("Bank", WalletKind::Bank).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();

    ledger
        .create_transaction(TransactionDraft::income(
            cash.id,
            sales.id,
            800_000,
            day(2026, 2, 1),
        ))
        .await
        .unwrap();
    let lunch = ledger
        .create_transaction(
            TransactionDraft::expense(cash.id, 120_000, day(2026, 2, 2)).common_cost(),
        )
        .await
        .unwrap();
    ledger
        .create_transaction(TransactionDraft::transfer(
            cash.id,
            bank.id,
            200_000,
            day(2026, 2, 3),
        ))
        .await
        .unwrap();
    ledger
        .create_adjustment(AdjustmentDraft::new(cash.id, -5_000, day(2026, 2, 4)))
        .await
        .unwrap();

    let balance = ledger.compute_balance(cash.id, None, None).await.unwrap();
    assert_eq!(balance.income_total, 800_000);
    assert_eq!(balance.expense_total, 120_000);
    assert_eq!(balance.transfer_out_total, 200_000);
    assert_eq!(balance.transfer_in_total, 0);
    assert_eq!(balance.adjustment_total, -5_000);
    assert_eq!(balance.net, 800_000 - 120_000 - 200_000 - 5_000);

    // Soft-deleting and restoring rows moves the derived balance exactly with
    // the live row set, independent of operation order.
    ledger.soft_delete_transaction(lunch.id).await.unwrap();
    let balance = ledger.compute_balance(cash.id, None, None).await.unwrap();
    assert_eq!(balance.expense_total, 0);
    assert_eq!(balance.net, 800_000 - 200_000 - 5_000);

    ledger.restore_transaction(lunch.id).await.unwrap();
    let balance = ledger.compute_balance(cash.id, None, None).await.unwrap();
    assert_eq!(balance.net, 800_000 - 120_000 - 200_000 - 5_000);
}

#[tokio::test]
async fn soft_deleted_adjustment_is_excluded() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();

    ledger
        .create_transaction(TransactionDraft::income(
            wallet.id,
            sales.id,
            50_000,
            day(2026, 2, 10),
        ))
        .await
        .unwrap();
    let correction = ledger
        .create_adjustment(AdjustmentDraft::new(wallet.id, 7_500, day(2026, 2, 11)))
        .await
        .unwrap();

    let before = ledger.compute_balance(wallet.id, None, None).await.unwrap();
    assert_eq!(before.net, 57_500);

    ledger.soft_delete_adjustment(correction.id).await.unwrap();
    let after = ledger.compute_balance(wallet.id, None, None).await.unwrap();
    assert_eq!(after.net, before.net - 7_500);
    assert_eq!(after.adjustment_total, 0);

    ledger.restore_adjustment(correction.id).await.unwrap();
    let restored = ledger.compute_balance(wallet.id, None, None).await.unwrap();
    assert_eq!(restored.net, before.net);
}

#[tokio::test]
async fn range_bounds_are_inclusive_days() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();

    for (dayofmonth, amount) in [(1, 100), (15, 200), (28, 400)] {
        ledger
            .create_transaction(TransactionDraft::income(
                wallet.id,
                sales.id,
                amount,
                day(2026, 3, dayofmonth),
            ))
            .await
            .unwrap();
    }

    let balance = ledger
        .compute_balance(
            wallet.id,
            Some(day(2026, 3, 1).into()),
            Some(day(2026, 3, 15).into()),
        )
        .await
        .unwrap();
    assert_eq!(balance.income_total, 300);

    let balance = ledger
        .compute_balance(wallet.id, Some(day(2026, 3, 16).into()), None)
        .await
        .unwrap();
    assert_eq!(balance.income_total, 400);

    let balance = ledger
        .compute_balance(wallet.id, None, Some(day(2026, 2, 28).into()))
        .await
        .unwrap();
    assert_eq!(balance.income_total, 0);
}

#[tokio::test]
async fn report_flags_deleted_wallet_with_live_rows() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();

    ledger
        .create_transaction(TransactionDraft::income(
            wallet.id,
            sales.id,
            10_000,
            day(2026, 4, 1),
        ))
        .await
        .unwrap();
    ledger
        .create_adjustment(AdjustmentDraft::new(wallet.id, 500, day(2026, 4, 2)))
        .await
        .unwrap();

    // Marking the wallet while its rows stay live violates the invariant;
    // the report must surface it, not hide it.
    ledger.soft_delete_wallet(wallet.id).await.unwrap();

    let report = ledger.report(wallet.id, None, None).await.unwrap();
    assert_eq!(report.balance.net, 10_500);
    assert!(report.warnings.contains(&ReconciliationWarning::DeletedWalletInUse {
        wallet_id: wallet.id,
        wallet_code: wallet.code.clone(),
        live_transactions: 1,
        live_adjustments: 1,
    }));
}

#[tokio::test]
async fn report_flags_deleted_counterparty() {
    let ledger = ledger_with_db().await;
    let cash = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let bank = ledger.create_wallet("Bank", WalletKind::Bank).await.unwrap();

    ledger
        .create_transaction(TransactionDraft::transfer(
            cash.id,
            bank.id,
            1_000,
            day(2026, 4, 3),
        ))
        .await
        .unwrap();
    ledger.soft_delete_wallet(bank.id).await.unwrap();

    let report = ledger.report(cash.id, None, None).await.unwrap();
    assert!(report.warnings.contains(
        &ReconciliationWarning::DeletedCounterpartyWallet {
            wallet_id: bank.id,
            wallet_code: bank.code.clone(),
            live_transfers: 1,
        }
    ));
}

#[tokio::test]
async fn report_is_clean_for_consistent_data() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();
    ledger
        .create_transaction(TransactionDraft::income(
            wallet.id,
            sales.id,
            10_000,
            day(2026, 4, 4),
        ))
        .await
        .unwrap();

    let report = ledger.report(wallet.id, None, None).await.unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.balance.net, 10_000);
}

#[tokio::test]
async fn report_for_missing_wallet_is_not_found() {
    let ledger = ledger_with_db().await;
    let missing = uuid::Uuid::new_v4();
    let err = ledger.report(missing, None, None).await.unwrap_err();
    assert_eq!(err, LedgerError::NotFound(format!("wallet {missing}")));

    let err = ledger.compute_balance(missing, None, None).await.unwrap_err();
    assert_eq!(err, LedgerError::NotFound(format!("wallet {missing}")));
}
