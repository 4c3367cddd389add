//! Error types for tally-core.

use std::path::PathBuf;

use thiserror::Error;

/// Recoverable failures raised by [`crate::Repository`] operations.
///
/// Ids are carried in their display form so one error type serves every
/// entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    /// An entity with the same id is already stored.
    #[error("{kind} with id {id} already exists")]
    DuplicateKey { kind: &'static str, id: String },

    /// No entity with this id is stored.
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// The requested value violates a domain constraint; nothing was changed.
    #[error("invalid {kind}: {reason}")]
    InvalidValue { kind: &'static str, reason: String },
}

impl RepoError {
    pub fn duplicate(kind: &'static str, id: impl ToString) -> Self {
        Self::DuplicateKey {
            kind,
            id: id.to_string(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            kind,
            reason: reason.into(),
        }
    }
}

/// Failures raised while saving or loading a snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The stored document exists but could not be decoded.
    #[error("corrupt snapshot '{name}': {detail}")]
    CorruptData { name: String, detail: String },

    /// The snapshot could not be encoded (write path).
    #[error("failed to encode snapshot '{name}': {detail}")]
    Encode { name: String, detail: String },

    /// The underlying sink or source failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`PersistError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PersistError {
    PersistError::Io {
        path: path.into(),
        source,
    }
}
