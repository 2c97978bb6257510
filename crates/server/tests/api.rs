use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = ledger::Ledger::builder().database(db).build().unwrap();
    server::router(server::ServerState {
        ledger: Arc::new(ledger),
    })
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn income_expense_transfer_flow() {
    let app = app().await;

    let (status, wallet) = post_json(
        &app,
        "/wallets",
        json!({"name": "Main cash", "kind": "CASH"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wallet["code"], "W0001");
    let wallet_id = wallet["id"].as_str().unwrap().to_string();

    let (status, category) = post_json(&app, "/categories/income", json!({"name": "Sales"})).await;
    assert_eq!(status, StatusCode::OK);
    let category_id = category["id"].as_str().unwrap().to_string();

    let (status, income) = post_json(
        &app,
        "/transactions",
        json!({
            "kind": "INCOME",
            "wallet_id": wallet_id,
            "income_category_id": category_id,
            "amount_minor": 500000,
            "date": "2026-01-05",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(income["code"], "PT0001");

    let (status, balance) = get_json(&app, &format!("/wallets/{wallet_id}/balance")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["net"], 500000);

    let (status, other) = post_json(&app, "/wallets", json!({"name": "Bank", "kind": "BANK"})).await;
    assert_eq!(status, StatusCode::OK);
    let other_id = other["id"].as_str().unwrap().to_string();

    let (status, _) = post_json(
        &app,
        "/transactions",
        json!({
            "kind": "TRANSFER",
            "wallet_id": wallet_id,
            "wallet_to_id": other_id,
            "amount_minor": 50000,
            "date": "2026-01-07",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, balance) = get_json(&app, &format!("/wallets/{wallet_id}/balance")).await;
    assert_eq!(balance["net"], 450000);
    let (_, balance) = get_json(&app, &format!("/wallets/{other_id}/balance")).await;
    assert_eq!(balance["net"], 50000);

    let (status, report) = get_json(&app, &format!("/wallets/{wallet_id}/report")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["warnings"].as_array().unwrap().len(), 0);

    let (status, found) = get_json(&app, "/transactions/by-code/pt0001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["amount_minor"], 500000);
}

#[tokio::test]
async fn validation_and_not_found_status_codes() {
    let app = app().await;

    let (status, wallet) = post_json(
        &app,
        "/wallets",
        json!({"name": "Main cash", "kind": "CASH"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let wallet_id = wallet["id"].as_str().unwrap().to_string();

    // Self-transfer is a validation failure.
    let (status, body) = post_json(
        &app,
        "/transactions",
        json!({
            "kind": "TRANSFER",
            "wallet_id": wallet_id,
            "wallet_to_id": wallet_id,
            "amount_minor": 100,
            "date": "2026-01-05",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("wallet_to_id"));

    // Unknown wallet is 404.
    let missing = uuid::Uuid::new_v4();
    let (status, _) = get_json(&app, &format!("/wallets/{missing}/balance")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Missing date is a request-level failure.
    let (status, _) = post_json(
        &app,
        "/transactions",
        json!({
            "kind": "EXPENSE",
            "wallet_id": wallet_id,
            "amount_minor": 100,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cascade_endpoints_enforce_order() {
    let app = app().await;

    let (_, wallet) = post_json(&app, "/wallets", json!({"name": "Cash", "kind": "CASH"})).await;
    let wallet_id = wallet["id"].as_str().unwrap().to_string();
    let (_, expense) = post_json(
        &app,
        "/transactions",
        json!({
            "kind": "EXPENSE",
            "wallet_id": wallet_id,
            "amount_minor": 100,
            "date": "2026-01-05",
            "is_common_cost": true,
        }),
    )
    .await;
    let expense_id = expense["id"].as_str().unwrap().to_string();

    // Live rows cannot be purged through the ordinary path.
    let (status, _) = post_json(
        &app,
        "/cascade/purge",
        json!({"entity": "transaction", "id": expense_id}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, deleted) = post_json(
        &app,
        "/cascade/soft-delete",
        json!({"entity": "transaction", "id": expense_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["affected"], 1);

    let (status, purged) = post_json(
        &app,
        "/cascade/purge",
        json!({"entity": "transaction", "id": expense_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purged["affected"], 1);
}
