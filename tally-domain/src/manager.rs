//! Plumbing shared by every manager.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tally_core::{Entity, Repository, SnapshotStore, Storage};

use crate::error::DomainResult;

/// When a manager writes its snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// Only on an explicit `save()`.
    #[default]
    Manual,
    /// After every successful mutating verb.
    EveryChange,
}

/// Snapshot name for `stem` in the store's format, e.g. `patients.json`.
pub(crate) fn doc_name<S: Storage>(store: &SnapshotStore<S>, stem: &str) -> String {
    store.format().file_name(stem)
}

/// Save one repository under `stem`.
pub(crate) fn save_repo<S, T>(
    store: &SnapshotStore<S>,
    stem: &str,
    repo: &Repository<T>,
) -> DomainResult<()>
where
    S: Storage,
    T: Entity + Serialize,
{
    store.save_repo(&doc_name(store, stem), repo)?;
    Ok(())
}

/// Replace `repo`'s contents with the snapshot saved under `stem`.
pub(crate) fn load_repo<S, T>(
    store: &SnapshotStore<S>,
    stem: &str,
    repo: &mut Repository<T>,
) -> DomainResult<usize>
where
    S: Storage,
    T: Entity + DeserializeOwned,
{
    Ok(store.load_into(&doc_name(store, stem), repo)?)
}
