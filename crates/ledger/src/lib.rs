pub use adjustments::Adjustment;
pub use categories::Category;
pub use codes::CodePrefix;
pub use commands::{AdjustmentDraft, TransactionDraft, TransactionPatch};
pub use error::LedgerError;
pub use ops::{
    EntityKind, Ledger, LedgerBuilder, ReconciliationWarning, TransactionListFilter,
    TransactionPage, WalletBalance, WalletReport,
};
pub use projects::Project;
pub use transactions::{Transaction, TransactionKind};
pub use util::LedgerDate;
pub use wallets::{Wallet, WalletKind};
pub use workshop_jobs::WorkshopJob;

mod adjustments;
mod categories;
mod codes;
mod commands;
mod customer_follow_ups;
mod customers;
mod error;
mod ops;
mod order_items;
mod projects;
mod suppliers;
mod transactions;
mod util;
mod wallets;
mod workshop_job_items;
mod workshop_jobs;
mod workshops;

type ResultLedger<T> = Result<T, LedgerError>;
