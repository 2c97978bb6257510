//! Transactions API endpoints

use api_types::transaction::{
    TransactionList, TransactionListResponse, TransactionNew, TransactionUpdate, TransactionView,
};
use api_types::TransactionKind as ApiKind;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use uuid::Uuid;

use ledger::{LedgerDate, Transaction, TransactionDraft, TransactionKind, TransactionPatch};

use crate::{ServerError, server::ServerState};

pub(crate) fn map_kind(kind: TransactionKind) -> ApiKind {
    match kind {
        TransactionKind::Income => ApiKind::Income,
        TransactionKind::Expense => ApiKind::Expense,
        TransactionKind::Transfer => ApiKind::Transfer,
    }
}

pub(crate) fn map_api_kind(kind: ApiKind) -> TransactionKind {
    match kind {
        ApiKind::Income => TransactionKind::Income,
        ApiKind::Expense => TransactionKind::Expense,
        ApiKind::Transfer => TransactionKind::Transfer,
    }
}

/// Exactly one of `date` / `occurred_at` picks the canonical instant.
pub(crate) fn resolve_date(
    date: Option<NaiveDate>,
    occurred_at: Option<DateTime<FixedOffset>>,
) -> Result<LedgerDate, ServerError> {
    match (date, occurred_at) {
        (Some(day), None) => Ok(LedgerDate::Day(day)),
        (None, Some(at)) => Ok(LedgerDate::Instant(at.with_timezone(&Utc))),
        (None, None) => Err(ServerError::Generic(
            "either date or occurred_at is required".to_string(),
        )),
        (Some(_), Some(_)) => Err(ServerError::Generic(
            "provide only one of date or occurred_at".to_string(),
        )),
    }
}

pub(crate) fn view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        code: tx.code,
        kind: map_kind(tx.kind),
        occurred_at: tx.occurred_at.fixed_offset(),
        amount_minor: tx.amount_minor,
        wallet_id: tx.wallet_id,
        wallet_to_id: tx.wallet_to_id,
        income_category_id: tx.income_category_id,
        expense_category_id: tx.expense_category_id,
        project_id: tx.project_id,
        workshop_job_id: tx.workshop_job_id,
        is_common_cost: tx.is_common_cost,
        note: tx.note,
        deleted_at: tx.deleted_at.map(|at| at.fixed_offset()),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<Json<TransactionView>, ServerError> {
    let date = resolve_date(payload.date, payload.occurred_at)?;

    let mut draft = match payload.kind {
        ApiKind::Income => {
            let income_category_id = payload.income_category_id.ok_or_else(|| {
                ServerError::Generic("income_category_id is required for INCOME".to_string())
            })?;
            TransactionDraft::income(
                payload.wallet_id,
                income_category_id,
                payload.amount_minor,
                date,
            )
        }
        ApiKind::Expense => {
            let mut draft =
                TransactionDraft::expense(payload.wallet_id, payload.amount_minor, date);
            if let Some(category_id) = payload.expense_category_id {
                draft = draft.expense_category(category_id);
            }
            if payload.is_common_cost {
                draft = draft.common_cost();
            }
            draft
        }
        ApiKind::Transfer => {
            let wallet_to_id = payload.wallet_to_id.ok_or_else(|| {
                ServerError::Generic("wallet_to_id is required for TRANSFER".to_string())
            })?;
            TransactionDraft::transfer(
                payload.wallet_id,
                wallet_to_id,
                payload.amount_minor,
                date,
            )
        }
    };
    if let Some(project_id) = payload.project_id {
        draft = draft.project(project_id);
    }
    if let Some(job_id) = payload.workshop_job_id {
        draft = draft.workshop_job(job_id);
    }
    if let Some(note) = payload.note {
        draft = draft.note(note);
    }
    if payload.is_sample {
        draft = draft.sample();
    }
    // Contradictory combinations (wrong-universe category, wallet_to on a
    // non-transfer, ...) are rejected by the ledger's own validation.
    draft.income_category_id = draft.income_category_id.or(payload.income_category_id);
    draft.wallet_to_id = draft.wallet_to_id.or(payload.wallet_to_id);
    draft.expense_category_id = draft.expense_category_id.or(payload.expense_category_id);

    let tx = state.ledger.create_transaction(draft).await?;
    Ok(Json(view(tx)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut patch = TransactionPatch::new();
    if let Some(wallet_id) = payload.wallet_id {
        patch = patch.wallet(wallet_id);
    }
    if let Some(wallet_to_id) = payload.wallet_to_id {
        patch = patch.wallet_to(wallet_to_id);
    }
    if let Some(amount_minor) = payload.amount_minor {
        patch = patch.amount(amount_minor);
    }
    match (payload.date, payload.occurred_at) {
        (None, None) => {}
        (date, occurred_at) => {
            patch = patch.date(resolve_date(date, occurred_at)?);
        }
    }
    if let Some(category_id) = payload.income_category_id {
        patch = patch.income_category(category_id);
    }
    if payload.clear_expense_category {
        patch = patch.clear_expense_category();
    } else if let Some(category_id) = payload.expense_category_id {
        patch = patch.expense_category(category_id);
    }
    if payload.clear_project {
        patch = patch.clear_project();
    } else if let Some(project_id) = payload.project_id {
        patch = patch.project(project_id);
    }
    if payload.clear_workshop_job {
        patch = patch.clear_workshop_job();
    } else if let Some(job_id) = payload.workshop_job_id {
        patch = patch.workshop_job(job_id);
    }
    if let Some(is_common_cost) = payload.is_common_cost {
        patch = patch.common_cost(is_common_cost);
    }
    if payload.clear_note {
        patch = patch.clear_note();
    } else if let Some(note) = payload.note {
        patch = patch.note(note);
    }

    let tx = state.ledger.update_transaction(id, patch).await?;
    Ok(Json(view(tx)))
}

pub async fn soft_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<(), ServerError> {
    state.ledger.soft_delete_transaction(id).await?;
    Ok(())
}

pub async fn restore(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<(), ServerError> {
    state.ledger.restore_transaction(id).await?;
    Ok(())
}

pub async fn get_by_code(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.ledger.find_transaction_by_code(&code).await?;
    Ok(Json(view(tx)))
}

pub async fn list(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let filter = ledger::TransactionListFilter {
        kind: payload.kind.map(map_api_kind),
        wallet_id: payload.wallet_id,
        from: payload.from.map(LedgerDate::Day),
        to: payload.to.map(LedgerDate::Day),
        include_deleted: payload.include_deleted,
        search: payload.search,
    };
    let limit = payload.limit.unwrap_or(50);

    let page = state
        .ledger
        .list_transactions(limit, payload.cursor.as_deref(), &filter)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: page.items.into_iter().map(view).collect(),
        next_cursor: page.next_cursor,
    }))
}
