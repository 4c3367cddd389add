//! Resolved runtime settings shared by every command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tally_core::{Format, SnapshotStore};
use tally_store::FileStorage;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub format: Format,
}

impl Config {
    /// Fill in the default data directory when none was given.
    pub fn resolve(data_dir: Option<PathBuf>, format: Format) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => tally_store::default_data_dir()
                .context("could not determine home directory; pass --data-dir")?,
        };
        Ok(Self { data_dir, format })
    }

    /// Open (creating if needed) the data directory as a snapshot store.
    pub fn store(&self) -> Result<SnapshotStore<FileStorage>> {
        let storage = FileStorage::open(&self.data_dir).with_context(|| {
            format!("failed to open data directory {}", self.data_dir.display())
        })?;
        Ok(SnapshotStore::new(storage, self.format))
    }
}
