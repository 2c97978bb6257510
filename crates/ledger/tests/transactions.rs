use chrono::NaiveDate;
use migration::MigratorTrait;
use sea_orm::Database;

use ledger::{
    Ledger, LedgerError, TransactionDraft, TransactionKind, TransactionListFilter,
    TransactionPatch, WalletKind,
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
async fn end_to_end_scenario() {
    let ledger = ledger_with_db().await;

    let main = ledger.create_wallet("Main cash", WalletKind::Cash).await.unwrap();
    assert_eq!(main.code, "W0001");

    let sales = ledger.create_income_category("Sales").await.unwrap();

    let income = ledger
        .create_transaction(TransactionDraft::income(
            main.id,
            sales.id,
            500_000,
            day(2026, 1, 5),
        ))
        .await
        .unwrap();
    assert_eq!(income.code, "PT0001");
    let balance = ledger.compute_balance(main.id, None, None).await.unwrap();
    assert_eq!(balance.net, 500_000);

    let expense = ledger
        .create_transaction(
            TransactionDraft::expense(main.id, 300_000, day(2026, 1, 6)).common_cost(),
        )
        .await
        .unwrap();
    assert_eq!(expense.code, "PC0001");
    let balance = ledger.compute_balance(main.id, None, None).await.unwrap();
    assert_eq!(balance.net, 200_000);

    let bank = ledger.create_wallet("Bank", WalletKind::Bank).await.unwrap();
    assert_eq!(bank.code, "W0002");

    ledger
        .create_transaction(TransactionDraft::transfer(
            main.id,
            bank.id,
            50_000,
            day(2026, 1, 7),
        ))
        .await
        .unwrap();

    let main_balance = ledger.compute_balance(main.id, None, None).await.unwrap();
    assert_eq!(main_balance.net, 150_000);
    assert_eq!(main_balance.transfer_out_total, 50_000);
    let bank_balance = ledger.compute_balance(bank.id, None, None).await.unwrap();
    assert_eq!(bank_balance.net, 50_000);
    assert_eq!(bank_balance.transfer_in_total, 50_000);
}

#[tokio::test]
async fn type_validation_matrix() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let other = ledger.create_wallet("Bank", WalletKind::Bank).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();
    let materials = ledger.create_expense_category("Materials").await.unwrap();
    let project = ledger.create_project("Kitchen set", None).await.unwrap();
    let date = day(2026, 2, 1);

    let common_cost_with_project =
        TransactionDraft::expense(wallet.id, 1_000, date)
            .common_cost()
            .project(project.id);

    let self_transfer = TransactionDraft::transfer(wallet.id, wallet.id, 1_000, date);

    let income_with_expense_category =
        TransactionDraft::income(wallet.id, sales.id, 1_000, date).expense_category(materials.id);

    let mut income_without_category = TransactionDraft::expense(wallet.id, 1_000, date);
    income_without_category.kind = TransactionKind::Income;

    let mut income_with_destination = TransactionDraft::income(wallet.id, sales.id, 1_000, date);
    income_with_destination.wallet_to_id = Some(other.id);

    let mut transfer_with_category = TransactionDraft::transfer(wallet.id, other.id, 1_000, date);
    transfer_with_category.income_category_id = Some(sales.id);

    let negative_amount = TransactionDraft::income(wallet.id, sales.id, -1, date);

    let cases = [
        (
            common_cost_with_project,
            "is_common_cost: mutually exclusive with project_id",
        ),
        (self_transfer, "wallet_to_id: must differ from wallet_id"),
        (
            income_with_expense_category,
            "expense_category_id: not allowed on income",
        ),
        (
            income_without_category,
            "income_category_id: required for income",
        ),
        (
            income_with_destination,
            "wallet_to_id: only allowed on transfer",
        ),
        (transfer_with_category, "category: not allowed on transfer"),
        (negative_amount, "amount_minor: must be >= 0"),
    ];

    for (draft, expected) in cases {
        let err = ledger.create_transaction(draft).await.unwrap_err();
        assert_eq!(err, LedgerError::Validation(expected.to_string()));
    }
}

#[tokio::test]
async fn wrong_universe_category_is_not_found() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let materials = ledger.create_expense_category("Materials").await.unwrap();

    // An expense-universe id does not resolve as an income category.
    let err = ledger
        .create_transaction(TransactionDraft::income(
            wallet.id,
            materials.id,
            1_000,
            day(2026, 2, 1),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::NotFound(format!("income category {}", materials.id))
    );
}

#[tokio::test]
async fn create_rejects_dead_or_missing_references() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();
    let date = day(2026, 2, 2);

    let missing = uuid::Uuid::new_v4();
    let err = ledger
        .create_transaction(TransactionDraft::income(missing, sales.id, 1_000, date))
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::NotFound(format!("wallet {missing}")));

    ledger.soft_delete_wallet(wallet.id).await.unwrap();
    let err = ledger
        .create_transaction(TransactionDraft::income(wallet.id, sales.id, 1_000, date))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::Validation(format!(
            "wallet_id: wallet {} is soft-deleted",
            wallet.id
        ))
    );
}

#[tokio::test]
async fn update_revalidates_merged_state() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let project = ledger.create_project("Kitchen set", None).await.unwrap();

    let expense = ledger
        .create_transaction(
            TransactionDraft::expense(wallet.id, 10_000, day(2026, 3, 1)).common_cost(),
        )
        .await
        .unwrap();

    // Attaching a project while the overhead flag stands is contradictory.
    let err = ledger
        .update_transaction(expense.id, TransactionPatch::new().project(project.id))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::Validation("is_common_cost: mutually exclusive with project_id".to_string())
    );

    // Dropping the flag and attaching the project in one patch is fine.
    let updated = ledger
        .update_transaction(
            expense.id,
            TransactionPatch::new()
                .common_cost(false)
                .project(project.id)
                .amount(12_000),
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 12_000);
    assert_eq!(updated.project_id, Some(project.id));
    assert_eq!(updated.code, expense.code);

    let balance = ledger.compute_balance(wallet.id, None, None).await.unwrap();
    assert_eq!(balance.expense_total, 12_000);
}

#[tokio::test]
async fn update_refuses_soft_deleted_rows() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let expense = ledger
        .create_transaction(TransactionDraft::expense(wallet.id, 5_000, day(2026, 3, 2)))
        .await
        .unwrap();
    ledger.soft_delete_transaction(expense.id).await.unwrap();

    let err = ledger
        .update_transaction(expense.id, TransactionPatch::new().amount(6_000))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));
}

#[tokio::test]
async fn restore_requires_live_references() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let expense = ledger
        .create_transaction(TransactionDraft::expense(wallet.id, 5_000, day(2026, 3, 3)))
        .await
        .unwrap();

    ledger.soft_delete_transaction(expense.id).await.unwrap();
    ledger.soft_delete_wallet(wallet.id).await.unwrap();

    let err = ledger.restore_transaction(expense.id).await.unwrap_err();
    assert_eq!(
        err,
        LedgerError::ReferentialIntegrity(format!(
            "cannot restore transaction {}: wallet {} is not live",
            expense.code, wallet.id
        ))
    );

    ledger.restore_wallet(wallet.id).await.unwrap();
    ledger.restore_transaction(expense.id).await.unwrap();

    let restored = ledger.transaction(expense.id).await.unwrap();
    assert!(restored.deleted_at.is_none());
}

#[tokio::test]
async fn soft_delete_and_restore_are_idempotent() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let expense = ledger
        .create_transaction(TransactionDraft::expense(wallet.id, 5_000, day(2026, 3, 4)))
        .await
        .unwrap();

    ledger.soft_delete_transaction(expense.id).await.unwrap();
    ledger.soft_delete_transaction(expense.id).await.unwrap();
    ledger.restore_transaction(expense.id).await.unwrap();
    ledger.restore_transaction(expense.id).await.unwrap();

    let missing = uuid::Uuid::new_v4();
    let err = ledger.soft_delete_transaction(missing).await.unwrap_err();
    assert_eq!(err, LedgerError::NotFound(format!("transaction {missing}")));
}

#[tokio::test]
async fn list_filters_and_search() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let bank = ledger.create_wallet("Bank", WalletKind::Bank).await.unwrap();
    let sales = ledger.create_income_category("Sales").await.unwrap();

    ledger
        .create_transaction(
            TransactionDraft::income(wallet.id, sales.id, 1_000, day(2026, 4, 1))
                .note("January invoice"),
        )
        .await
        .unwrap();
    let expense = ledger
        .create_transaction(TransactionDraft::expense(wallet.id, 200, day(2026, 4, 2)))
        .await
        .unwrap();
    ledger
        .create_transaction(TransactionDraft::transfer(
            wallet.id,
            bank.id,
            300,
            day(2026, 4, 3),
        ))
        .await
        .unwrap();
    ledger.soft_delete_transaction(expense.id).await.unwrap();

    // Soft-deleted rows are hidden by default.
    let page = ledger
        .list_transactions(50, None, &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(page.next_cursor.is_none());

    let page = ledger
        .list_transactions(
            50,
            None,
            &TransactionListFilter {
                include_deleted: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 3);

    // Kind filter.
    let page = ledger
        .list_transactions(
            50,
            None,
            &TransactionListFilter {
                kind: Some(TransactionKind::Transfer),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);

    // The destination wallet sees the transfer too.
    let page = ledger
        .list_transactions(
            50,
            None,
            &TransactionListFilter {
                wallet_id: Some(bank.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].kind, TransactionKind::Transfer);

    // Inclusive day range.
    let page = ledger
        .list_transactions(
            50,
            None,
            &TransactionListFilter {
                from: Some(day(2026, 4, 1).into()),
                to: Some(day(2026, 4, 1).into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].code, "PT0001");

    // Case-insensitive code search and note search.
    let page = ledger
        .list_transactions(
            50,
            None,
            &TransactionListFilter {
                search: Some("pt0001".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);

    let page = ledger
        .list_transactions(
            50,
            None,
            &TransactionListFilter {
                search: Some("invoice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn pagination_walks_newest_to_oldest() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    for dayofmonth in 1..=5 {
        ledger
            .create_transaction(TransactionDraft::expense(
                wallet.id,
                100,
                day(2026, 5, dayofmonth),
            ))
            .await
            .unwrap();
    }

    let filter = TransactionListFilter::default();
    let first = ledger.list_transactions(2, None, &filter).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].code, "PC0005");
    let cursor = first.next_cursor.expect("more pages");

    let second = ledger
        .list_transactions(2, Some(&cursor), &filter)
        .await
        .unwrap();
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[0].code, "PC0003");
    let cursor = second.next_cursor.expect("more pages");

    let third = ledger
        .list_transactions(2, Some(&cursor), &filter)
        .await
        .unwrap();
    assert_eq!(third.items.len(), 1);
    assert_eq!(third.items[0].code, "PC0001");
    assert!(third.next_cursor.is_none());
}

#[tokio::test]
async fn lookup_by_code_is_case_insensitive() {
    let ledger = ledger_with_db().await;
    let wallet = ledger.create_wallet("Cash", WalletKind::Cash).await.unwrap();
    let expense = ledger
        .create_transaction(TransactionDraft::expense(wallet.id, 100, day(2026, 6, 1)))
        .await
        .unwrap();

    let found = ledger.find_transaction_by_code("pc0001").await.unwrap();
    assert_eq!(found.id, expense.id);

    let err = ledger.find_transaction_by_code("pc9999").await.unwrap_err();
    assert_eq!(err, LedgerError::NotFound("transaction PC9999".to_string()));
}
