//! Category API endpoints

use api_types::category::{CategoryNew, CategoryView};
use axum::{Json, extract::State};

use ledger::Category;

use crate::{ServerError, server::ServerState};

fn view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        code: category.code,
        name: category.name,
        deleted_at: category.deleted_at.map(|at| at.fixed_offset()),
    }
}

pub async fn create_income(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.ledger.create_income_category(&payload.name).await?;
    Ok(Json(view(category)))
}

pub async fn create_expense(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.ledger.create_expense_category(&payload.name).await?;
    Ok(Json(view(category)))
}
