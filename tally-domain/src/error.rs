//! Error types for tally-domain.

use rust_decimal::Decimal;
use thiserror::Error;

use tally_core::{PersistError, RepoError};

pub type DomainResult<T> = Result<T, DomainError>;

/// Every outcome a manager verb can report instead of succeeding.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Duplicate id, unknown id, or a rejected value.
    #[error(transparent)]
    Repo(#[from] RepoError),

    /// Saving or loading failed. In-memory changes made by the same call
    /// are kept.
    #[error("persistence failed: {0}")]
    Persist(#[from] PersistError),

    /// A savings account refused a debit larger than its balance.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },
}

impl DomainError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repo(RepoError::NotFound { .. }))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Repo(RepoError::DuplicateKey { .. }))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Repo(RepoError::InvalidValue { .. }))
    }
}
