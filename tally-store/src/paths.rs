//! Data directory layout.
//!
//! ```text
//! ~/.tally/
//!   electronics.json    (one document per repository, mode 0600)
//!   groceries.json
//!   patients.json
//!   ...
//! ```
//!
//! Every function has an `_at` form taking an explicit home; tests must use
//! those and never the no-arg wrappers.

use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Directory name created under the home directory.
pub const DATA_DIR_NAME: &str = ".tally";

/// `<home>/.tally`; pure, no I/O.
pub fn data_dir_at(home: &Path) -> PathBuf {
    home.join(DATA_DIR_NAME)
}

/// `<home>/.tally` for the current user.
pub fn default_data_dir() -> Result<PathBuf, StoreError> {
    Ok(data_dir_at(&home()?))
}

fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}
