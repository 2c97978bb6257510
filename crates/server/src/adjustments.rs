//! Adjustments API endpoints

use api_types::adjustment::{AdjustmentNew, AdjustmentView};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use ledger::{Adjustment, AdjustmentDraft};

use crate::transactions::resolve_date;
use crate::{ServerError, server::ServerState};

fn view(adjustment: Adjustment) -> AdjustmentView {
    AdjustmentView {
        id: adjustment.id,
        code: adjustment.code,
        wallet_id: adjustment.wallet_id,
        occurred_at: adjustment.occurred_at.fixed_offset(),
        amount_minor: adjustment.amount_minor,
        note: adjustment.note,
        deleted_at: adjustment.deleted_at.map(|at| at.fixed_offset()),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AdjustmentNew>,
) -> Result<Json<AdjustmentView>, ServerError> {
    let date = resolve_date(payload.date, payload.occurred_at)?;
    let mut draft = AdjustmentDraft::new(payload.wallet_id, payload.amount_minor, date);
    if let Some(note) = payload.note {
        draft = draft.note(note);
    }
    let adjustment = state.ledger.create_adjustment(draft).await?;
    Ok(Json(view(adjustment)))
}

pub async fn soft_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<(), ServerError> {
    state.ledger.soft_delete_adjustment(id).await?;
    Ok(())
}

pub async fn restore(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<(), ServerError> {
    state.ledger.restore_adjustment(id).await?;
    Ok(())
}
