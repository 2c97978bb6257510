use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod adjustments;
mod cascade;
mod categories;
mod server;
mod transactions;
mod wallets;

pub mod types {
    pub mod wallet {
        pub use api_types::wallet::{RangeQuery, WalletNew, WalletView};
    }

    pub mod category {
        pub use api_types::category::{CategoryNew, CategoryView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionList, TransactionListResponse, TransactionNew, TransactionUpdate,
            TransactionView,
        };
    }

    pub mod adjustment {
        pub use api_types::adjustment::{AdjustmentNew, AdjustmentView};
    }

    pub mod balance {
        pub use api_types::balance::{BalanceView, ReportView, Warning};
    }

    pub mod cascade {
        pub use api_types::cascade::{CascadeRequest, CascadeResponse, PurgeRequest};
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Conflict(_) | LedgerError::ReferentialIntegrity(_) => StatusCode::CONFLICT,
        LedgerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => {
                (status_for_ledger_error(&err), message_for_ledger_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_not_found_maps_to_404() {
        let res = ServerError::from(LedgerError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn ledger_conflict_maps_to_409() {
        let res = ServerError::from(LedgerError::Conflict("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn ledger_referential_integrity_maps_to_409() {
        let res =
            ServerError::from(LedgerError::ReferentialIntegrity("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn ledger_validation_maps_to_422() {
        let res = ServerError::from(LedgerError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
