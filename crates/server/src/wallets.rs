//! Wallets API endpoints

use api_types::WalletKind as ApiWalletKind;
use api_types::balance::{BalanceView, ReportView, Warning};
use api_types::wallet::{RangeQuery, WalletNew, WalletView};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use ledger::{LedgerDate, ReconciliationWarning, Wallet, WalletBalance, WalletKind};

use crate::{ServerError, server::ServerState};

fn map_kind(kind: WalletKind) -> ApiWalletKind {
    match kind {
        WalletKind::Cash => ApiWalletKind::Cash,
        WalletKind::Bank => ApiWalletKind::Bank,
        WalletKind::Other => ApiWalletKind::Other,
    }
}

fn view(wallet: Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        code: wallet.code,
        name: wallet.name,
        kind: map_kind(wallet.kind),
        deleted_at: wallet.deleted_at.map(|at| at.fixed_offset()),
    }
}

fn balance_view(balance: WalletBalance) -> BalanceView {
    BalanceView {
        income_total: balance.income_total,
        expense_total: balance.expense_total,
        transfer_in_total: balance.transfer_in_total,
        transfer_out_total: balance.transfer_out_total,
        adjustment_total: balance.adjustment_total,
        net: balance.net,
    }
}

fn warning_view(warning: ReconciliationWarning) -> Warning {
    match warning {
        ReconciliationWarning::DeletedWalletInUse {
            wallet_id,
            wallet_code,
            live_transactions,
            live_adjustments,
        } => Warning::DeletedWalletInUse {
            wallet_id,
            wallet_code,
            live_transactions,
            live_adjustments,
        },
        ReconciliationWarning::DeletedCounterpartyWallet {
            wallet_id,
            wallet_code,
            live_transfers,
        } => Warning::DeletedCounterpartyWallet {
            wallet_id,
            wallet_code,
            live_transfers,
        },
        ReconciliationWarning::RowCountMismatch {
            assigned_rows,
            summed_rows,
        } => Warning::RowCountMismatch {
            assigned_rows,
            summed_rows,
        },
    }
}

fn range(query: RangeQuery) -> (Option<LedgerDate>, Option<LedgerDate>) {
    (
        query.from.map(LedgerDate::Day),
        query.to.map(LedgerDate::Day),
    )
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<WalletNew>,
) -> Result<Json<WalletView>, ServerError> {
    let kind = match payload.kind {
        ApiWalletKind::Cash => WalletKind::Cash,
        ApiWalletKind::Bank => WalletKind::Bank,
        ApiWalletKind::Other => WalletKind::Other,
    };
    let wallet = state.ledger.create_wallet(&payload.name, kind).await?;
    Ok(Json(view(wallet)))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<WalletView>>, ServerError> {
    let wallets = state.ledger.list_wallets(false).await?;
    Ok(Json(wallets.into_iter().map(view).collect()))
}

pub async fn balance(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<BalanceView>, ServerError> {
    let (from, to) = range(query);
    let balance = state.ledger.compute_balance(id, from, to).await?;
    Ok(Json(balance_view(balance)))
}

pub async fn report(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ReportView>, ServerError> {
    let (from, to) = range(query);
    let report = state.ledger.report(id, from, to).await?;
    Ok(Json(ReportView {
        balance: balance_view(report.balance),
        warnings: report.warnings.into_iter().map(warning_view).collect(),
    }))
}

pub async fn soft_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<(), ServerError> {
    state.ledger.soft_delete_wallet(id).await?;
    Ok(())
}

pub async fn restore(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<(), ServerError> {
    state.ledger.restore_wallet(id).await?;
    Ok(())
}
