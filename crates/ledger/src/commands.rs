//! Command structs for ledger write operations.
//!
//! These types group parameters for creates and updates, keeping call sites
//! readable and avoiding long argument lists.

use uuid::Uuid;

use crate::{TransactionKind, util::LedgerDate};

/// Input for [`crate::Ledger::create_transaction`].
///
/// Construct through [`income`], [`expense`] or [`transfer`] so the required
/// relations of each kind are in the signature; everything else is a builder
/// setter.
///
/// [`income`]: TransactionDraft::income
/// [`expense`]: TransactionDraft::expense
/// [`transfer`]: TransactionDraft::transfer
#[derive(Clone, Debug)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub wallet_id: Uuid,
    pub amount_minor: i64,
    pub date: LedgerDate,
    pub wallet_to_id: Option<Uuid>,
    pub income_category_id: Option<Uuid>,
    pub expense_category_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub workshop_job_id: Option<Uuid>,
    pub is_common_cost: bool,
    pub note: Option<String>,
    pub is_sample: bool,
}

impl TransactionDraft {
    fn new(kind: TransactionKind, wallet_id: Uuid, amount_minor: i64, date: LedgerDate) -> Self {
        Self {
            kind,
            wallet_id,
            amount_minor,
            date,
            wallet_to_id: None,
            income_category_id: None,
            expense_category_id: None,
            project_id: None,
            workshop_job_id: None,
            is_common_cost: false,
            note: None,
            is_sample: false,
        }
    }

    #[must_use]
    pub fn income(
        wallet_id: Uuid,
        income_category_id: Uuid,
        amount_minor: i64,
        date: impl Into<LedgerDate>,
    ) -> Self {
        let mut draft = Self::new(TransactionKind::Income, wallet_id, amount_minor, date.into());
        draft.income_category_id = Some(income_category_id);
        draft
    }

    #[must_use]
    pub fn expense(wallet_id: Uuid, amount_minor: i64, date: impl Into<LedgerDate>) -> Self {
        Self::new(TransactionKind::Expense, wallet_id, amount_minor, date.into())
    }

    #[must_use]
    pub fn transfer(
        wallet_id: Uuid,
        wallet_to_id: Uuid,
        amount_minor: i64,
        date: impl Into<LedgerDate>,
    ) -> Self {
        let mut draft = Self::new(
            TransactionKind::Transfer,
            wallet_id,
            amount_minor,
            date.into(),
        );
        draft.wallet_to_id = Some(wallet_to_id);
        draft
    }

    #[must_use]
    pub fn expense_category(mut self, id: Uuid) -> Self {
        self.expense_category_id = Some(id);
        self
    }

    #[must_use]
    pub fn project(mut self, id: Uuid) -> Self {
        self.project_id = Some(id);
        self
    }

    #[must_use]
    pub fn workshop_job(mut self, id: Uuid) -> Self {
        self.workshop_job_id = Some(id);
        self
    }

    /// Marks an expense as overhead, not attributable to any project.
    #[must_use]
    pub fn common_cost(mut self) -> Self {
        self.is_common_cost = true;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Marks the row as seed data for the cleanup tooling.
    #[must_use]
    pub fn sample(mut self) -> Self {
        self.is_sample = true;
        self
    }
}

/// Partial update for [`crate::Ledger::update_transaction`].
///
/// `None` leaves a field untouched; for the optional relations the inner
/// option distinguishes "set to this id" from "clear". The kind of a
/// transaction is fixed at creation and not expressible here.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub wallet_id: Option<Uuid>,
    pub wallet_to_id: Option<Option<Uuid>>,
    pub amount_minor: Option<i64>,
    pub date: Option<LedgerDate>,
    pub income_category_id: Option<Option<Uuid>>,
    pub expense_category_id: Option<Option<Uuid>>,
    pub project_id: Option<Option<Uuid>>,
    pub workshop_job_id: Option<Option<Uuid>>,
    pub is_common_cost: Option<bool>,
    pub note: Option<Option<String>>,
}

impl TransactionPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn wallet(mut self, id: Uuid) -> Self {
        self.wallet_id = Some(id);
        self
    }

    #[must_use]
    pub fn wallet_to(mut self, id: Uuid) -> Self {
        self.wallet_to_id = Some(Some(id));
        self
    }

    #[must_use]
    pub fn amount(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn date(mut self, date: impl Into<LedgerDate>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[must_use]
    pub fn income_category(mut self, id: Uuid) -> Self {
        self.income_category_id = Some(Some(id));
        self
    }

    #[must_use]
    pub fn expense_category(mut self, id: Uuid) -> Self {
        self.expense_category_id = Some(Some(id));
        self
    }

    #[must_use]
    pub fn clear_expense_category(mut self) -> Self {
        self.expense_category_id = Some(None);
        self
    }

    #[must_use]
    pub fn project(mut self, id: Uuid) -> Self {
        self.project_id = Some(Some(id));
        self
    }

    #[must_use]
    pub fn clear_project(mut self) -> Self {
        self.project_id = Some(None);
        self
    }

    #[must_use]
    pub fn workshop_job(mut self, id: Uuid) -> Self {
        self.workshop_job_id = Some(Some(id));
        self
    }

    #[must_use]
    pub fn clear_workshop_job(mut self) -> Self {
        self.workshop_job_id = Some(None);
        self
    }

    #[must_use]
    pub fn common_cost(mut self, value: bool) -> Self {
        self.is_common_cost = Some(value);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(Some(note.into()));
        self
    }

    #[must_use]
    pub fn clear_note(mut self) -> Self {
        self.note = Some(None);
        self
    }
}

/// Input for [`crate::Ledger::create_adjustment`].
#[derive(Clone, Debug)]
pub struct AdjustmentDraft {
    pub wallet_id: Uuid,
    /// Signed amount in minor units: positive increases the wallet.
    pub amount_minor: i64,
    pub date: LedgerDate,
    pub note: Option<String>,
}

impl AdjustmentDraft {
    #[must_use]
    pub fn new(wallet_id: Uuid, amount_minor: i64, date: impl Into<LedgerDate>) -> Self {
        Self {
            wallet_id,
            amount_minor,
            date: date.into(),
            note: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
