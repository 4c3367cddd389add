//! Error types for tally-store.

use thiserror::Error;

use tally_core::PersistError;

/// Errors raised while resolving or opening a data directory.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `dirs::home_dir()` returned `None`; cannot locate `~/.tally/`.
    #[error("cannot determine home directory; set $HOME or pass --data-dir")]
    HomeNotFound,

    /// The data directory exists but is not a directory.
    #[error("data path {0} is not a directory")]
    NotADirectory(std::path::PathBuf),

    /// A snapshot read or write failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
}
