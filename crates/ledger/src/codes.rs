//! Document code primitives.
//!
//! Every code-bearing entity gets a human-readable sequential code such as
//! `PT0007` or `W0012`: a fixed prefix per entity family plus a zero-padded
//! 4-digit suffix. Codes are stored upper-case and looked up
//! case-insensitively.
//!
//! Allocated codes are recorded in the `document_codes` table and never
//! removed, so a code freed by a purge is never handed out again.

use sea_orm::entity::prelude::*;

use crate::{LedgerError, ResultLedger};

/// Width of the numeric suffix.
pub const CODE_WIDTH: usize = 4;

/// Largest sequence number the fixed-width suffix can carry.
pub const MAX_SEQUENCE: u32 = 9999;

/// Code prefix families, one per code-bearing entity type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodePrefix {
    /// `W` — wallets.
    Wallet,
    /// `PT` — income transactions.
    Income,
    /// `PC` — expense transactions.
    Expense,
    /// `TF` — inter-wallet transfers.
    Transfer,
    /// `AD` — manual adjustments.
    Adjustment,
    /// `IC` — income categories.
    IncomeCategory,
    /// `EC` — expense categories.
    ExpenseCategory,
    /// `PR` — projects.
    Project,
    /// `WJ` — workshop jobs.
    WorkshopJob,
}

impl CodePrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wallet => "W",
            Self::Income => "PT",
            Self::Expense => "PC",
            Self::Transfer => "TF",
            Self::Adjustment => "AD",
            Self::IncomeCategory => "IC",
            Self::ExpenseCategory => "EC",
            Self::Project => "PR",
            Self::WorkshopJob => "WJ",
        }
    }
}

/// Formats `prefix + zero-padded sequence`, e.g. `(Income, 7)` → `PT0007`.
///
/// Sequences past [`MAX_SEQUENCE`] are a conflict, never a silently widened
/// code: lexicographic max-scans rely on the fixed width.
pub fn format_code(prefix: CodePrefix, sequence: u32) -> ResultLedger<String> {
    if sequence == 0 || sequence > MAX_SEQUENCE {
        return Err(LedgerError::Conflict(format!(
            "code space exhausted for prefix {}",
            prefix.as_str()
        )));
    }
    Ok(format!(
        "{}{:0width$}",
        prefix.as_str(),
        sequence,
        width = CODE_WIDTH
    ))
}

/// Parses the numeric suffix out of a stored code of the given family.
pub fn parse_sequence(code: &str, prefix: CodePrefix) -> Option<u32> {
    let suffix = code.strip_prefix(prefix.as_str())?;
    if suffix.len() != CODE_WIDTH {
        return None;
    }
    suffix.parse().ok()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "document_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub prefix: String,
    pub allocated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_pads_to_fixed_width() {
        assert_eq!(format_code(CodePrefix::Income, 7).unwrap(), "PT0007");
        assert_eq!(format_code(CodePrefix::Wallet, 12).unwrap(), "W0012");
        assert_eq!(format_code(CodePrefix::Expense, 9999).unwrap(), "PC9999");
    }

    #[test]
    fn format_rejects_exhausted_space() {
        let err = format_code(CodePrefix::Income, MAX_SEQUENCE + 1).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Conflict("code space exhausted for prefix PT".to_string())
        );
    }

    #[test]
    fn parse_roundtrips_and_rejects_foreign_families() {
        assert_eq!(parse_sequence("PT0007", CodePrefix::Income), Some(7));
        assert_eq!(parse_sequence("PT0007", CodePrefix::Expense), None);
        assert_eq!(parse_sequence("PT007", CodePrefix::Income), None);
        assert_eq!(parse_sequence("PT00070", CodePrefix::Income), None);
    }
}
