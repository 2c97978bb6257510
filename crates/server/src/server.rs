use axum::{
    Router,
    routing::{get, patch, post},
};
use ledger::Ledger;

use std::sync::Arc;

use crate::{adjustments, cascade, categories, transactions, wallets};

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/wallets", post(wallets::create).get(wallets::list))
        .route("/wallets/{id}/balance", get(wallets::balance))
        .route("/wallets/{id}/report", get(wallets::report))
        .route("/wallets/{id}/delete", post(wallets::soft_delete))
        .route("/wallets/{id}/restore", post(wallets::restore))
        .route("/categories/income", post(categories::create_income))
        .route("/categories/expense", post(categories::create_expense))
        .route("/transactions", post(transactions::create))
        .route("/transactions/list", post(transactions::list))
        .route("/transactions/by-code/{code}", get(transactions::get_by_code))
        .route("/transactions/{id}", patch(transactions::update))
        .route("/transactions/{id}/delete", post(transactions::soft_delete))
        .route("/transactions/{id}/restore", post(transactions::restore))
        .route("/adjustments", post(adjustments::create))
        .route("/adjustments/{id}/delete", post(adjustments::soft_delete))
        .route("/adjustments/{id}/restore", post(adjustments::restore))
        .route("/cascade/soft-delete", post(cascade::soft_delete))
        .route("/cascade/restore", post(cascade::restore))
        .route("/cascade/purge", post(cascade::purge))
        .route("/admin/purge-sample", post(cascade::purge_sample))
        .with_state(state)
}

pub async fn run_with_listener(
    ledger: Ledger,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let state = ServerState {
        ledger: Arc::new(ledger),
    };
    tracing::info!("listening on {:?}", listener.local_addr());
    axum::serve(listener, router(state)).await
}
