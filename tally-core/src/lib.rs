//! Tally core library: keyed repositories, derived indexes, snapshots.
//!
//! Public API surface:
//! - [`entity`] — the [`Entity`] identity contract
//! - [`repository`] — [`Repository`], strict and lenient CRUD
//! - [`index`] — [`GroupIndex`], group-by projections of a snapshot
//! - [`persist`] — [`Storage`], [`Format`], [`SnapshotStore`]
//! - [`error`] — [`RepoError`], [`PersistError`]

pub mod entity;
pub mod error;
pub mod index;
pub mod persist;
pub mod repository;

pub use entity::Entity;
pub use error::{PersistError, RepoError};
pub use index::{GroupIndex, SortOrder};
pub use persist::{Format, MemoryStorage, SnapshotStore, Storage};
pub use repository::Repository;
