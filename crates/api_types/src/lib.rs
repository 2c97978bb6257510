use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WalletKind {
    Cash,
    Bank,
    Other,
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        pub kind: WalletKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub code: String,
        pub name: String,
        pub kind: WalletKind,
        pub deleted_at: Option<DateTime<FixedOffset>>,
    }

    /// Inclusive civil-day range, expanded server-side in the reporting
    /// timezone.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RangeQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub code: String,
        pub name: String,
        pub deleted_at: Option<DateTime<FixedOffset>>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub wallet_id: Uuid,
        pub amount_minor: i64,
        /// Civil day; expanded to start-of-day in the reporting timezone.
        /// Exactly one of `date` / `occurred_at` must be present.
        pub date: Option<NaiveDate>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
        pub wallet_to_id: Option<Uuid>,
        pub income_category_id: Option<Uuid>,
        pub expense_category_id: Option<Uuid>,
        pub project_id: Option<Uuid>,
        pub workshop_job_id: Option<Uuid>,
        #[serde(default)]
        pub is_common_cost: bool,
        pub note: Option<String>,
        #[serde(default)]
        pub is_sample: bool,
    }

    /// Partial update; absent fields stay untouched. The `clear_*` flags
    /// drop an optional relation, and win over the matching id field.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub wallet_id: Option<Uuid>,
        pub wallet_to_id: Option<Uuid>,
        pub amount_minor: Option<i64>,
        pub date: Option<NaiveDate>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
        pub income_category_id: Option<Uuid>,
        pub expense_category_id: Option<Uuid>,
        #[serde(default)]
        pub clear_expense_category: bool,
        pub project_id: Option<Uuid>,
        #[serde(default)]
        pub clear_project: bool,
        pub workshop_job_id: Option<Uuid>,
        #[serde(default)]
        pub clear_workshop_job: bool,
        pub is_common_cost: Option<bool>,
        pub note: Option<String>,
        #[serde(default)]
        pub clear_note: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub code: String,
        pub kind: TransactionKind,
        pub occurred_at: DateTime<FixedOffset>,
        pub amount_minor: i64,
        pub wallet_id: Uuid,
        pub wallet_to_id: Option<Uuid>,
        pub income_category_id: Option<Uuid>,
        pub expense_category_id: Option<Uuid>,
        pub project_id: Option<Uuid>,
        pub workshop_job_id: Option<Uuid>,
        pub is_common_cost: bool,
        pub note: Option<String>,
        pub deleted_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub kind: Option<TransactionKind>,
        pub wallet_id: Option<Uuid>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        #[serde(default)]
        pub include_deleted: bool,
        pub search: Option<String>,
        pub limit: Option<u64>,
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub next_cursor: Option<String>,
    }
}

pub mod adjustment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdjustmentNew {
        pub wallet_id: Uuid,
        /// Signed: positive increases the wallet.
        pub amount_minor: i64,
        pub date: Option<NaiveDate>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdjustmentView {
        pub id: Uuid,
        pub code: String,
        pub wallet_id: Uuid,
        pub occurred_at: DateTime<FixedOffset>,
        pub amount_minor: i64,
        pub note: Option<String>,
        pub deleted_at: Option<DateTime<FixedOffset>>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub income_total: i64,
        pub expense_total: i64,
        pub transfer_in_total: i64,
        pub transfer_out_total: i64,
        pub adjustment_total: i64,
        pub net: i64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    pub enum Warning {
        DeletedWalletInUse {
            wallet_id: Uuid,
            wallet_code: String,
            live_transactions: i64,
            live_adjustments: i64,
        },
        DeletedCounterpartyWallet {
            wallet_id: Uuid,
            wallet_code: String,
            live_transfers: i64,
        },
        RowCountMismatch {
            assigned_rows: i64,
            summed_rows: i64,
        },
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportView {
        pub balance: BalanceView,
        pub warnings: Vec<Warning>,
    }
}

pub mod cascade {
    use super::*;

    /// Entity family name in the coordinator's vocabulary, e.g. `project`,
    /// `workshop_job`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CascadeRequest {
        pub entity: String,
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurgeRequest {
        pub entity: String,
        pub id: Uuid,
        /// Admin hard cleanup: skip the soft-delete audit window.
        #[serde(default)]
        pub hard: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CascadeResponse {
        pub affected: u64,
    }
}
