//! # tally-store
//!
//! File-backed [`tally_core::Storage`] with atomic writes, and data
//! directory resolution.
//!
//! Open a store with [`FileStorage::open`] and hand it to a
//! [`tally_core::SnapshotStore`].

pub mod error;
pub mod file;
pub mod paths;

pub use error::StoreError;
pub use file::FileStorage;
pub use paths::{data_dir_at, default_data_dir};
