//! Cascade delete/restore API endpoints

use api_types::cascade::{CascadeRequest, CascadeResponse, PurgeRequest};
use axum::{Json, extract::State};

use ledger::EntityKind;

use crate::{ServerError, server::ServerState};

fn parse_entity(entity: &str) -> Result<EntityKind, ServerError> {
    EntityKind::try_from(entity).map_err(ServerError::from)
}

pub async fn soft_delete(
    State(state): State<ServerState>,
    Json(payload): Json<CascadeRequest>,
) -> Result<Json<CascadeResponse>, ServerError> {
    let kind = parse_entity(&payload.entity)?;
    let affected = state.ledger.soft_delete_cascade(kind, payload.id).await?;
    Ok(Json(CascadeResponse { affected }))
}

pub async fn restore(
    State(state): State<ServerState>,
    Json(payload): Json<CascadeRequest>,
) -> Result<Json<CascadeResponse>, ServerError> {
    let kind = parse_entity(&payload.entity)?;
    let affected = state.ledger.restore_cascade(kind, payload.id).await?;
    Ok(Json(CascadeResponse { affected }))
}

pub async fn purge(
    State(state): State<ServerState>,
    Json(payload): Json<PurgeRequest>,
) -> Result<Json<CascadeResponse>, ServerError> {
    let kind = parse_entity(&payload.entity)?;
    let affected = if payload.hard {
        state.ledger.hard_purge(kind, payload.id).await?
    } else {
        state.ledger.purge(kind, payload.id).await?
    };
    Ok(Json(CascadeResponse { affected }))
}

pub async fn purge_sample(
    State(state): State<ServerState>,
) -> Result<Json<CascadeResponse>, ServerError> {
    let affected = state.ledger.purge_sample_transactions().await?;
    tracing::info!("purged {affected} sample transactions");
    Ok(Json(CascadeResponse { affected }))
}
