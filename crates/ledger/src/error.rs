//! The module contains the errors the ledger can surface.
//!
//! Every variant is recoverable by the caller: fix the input
//! ([`Validation`]), retry the whole operation ([`Conflict`]), purge or
//! restore in the right order ([`ReferentialIntegrity`]), or pick another
//! target ([`NotFound`]).
//!
//! [`Validation`]: LedgerError::Validation
//! [`Conflict`]: LedgerError::Conflict
//! [`ReferentialIntegrity`]: LedgerError::ReferentialIntegrity
//! [`NotFound`]: LedgerError::NotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Missing or contradictory fields; the message names the offending
    /// field. Nothing was applied.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A concurrent writer won a race (code allocation, state change between
    /// validation and commit). Safe to retry the whole operation.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Child-before-parent ordering was violated, or a restore target
    /// references an entity that is not live.
    #[error("referential integrity: {0}")]
    ReferentialIntegrity(String),
    /// The target id does not exist. Soft-deleted rows are *not* reported as
    /// missing; they are addressable for restore.
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::ReferentialIntegrity(a), Self::ReferentialIntegrity(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
