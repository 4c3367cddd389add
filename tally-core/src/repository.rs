//! Generic keyed store with duplicate / not-found / validation semantics.
//!
//! # Invariants
//!
//! - At most one entry per id; the map is the only answer to "does this
//!   entity exist".
//! - Every failing call leaves the map exactly as it was.
//! - Stored ids always equal the id of the value stored under them.

use std::collections::BTreeMap;

use crate::entity::Entity;
use crate::error::RepoError;

/// In-memory repository keyed by [`Entity::id`].
#[derive(Debug, Clone)]
pub struct Repository<T: Entity> {
    items: BTreeMap<T::Id, T>,
}

impl<T: Entity> Default for Repository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Strict operations
    // -----------------------------------------------------------------------

    /// Insert `item`. Fails with `DuplicateKey` if its id is already stored.
    pub fn add(&mut self, item: T) -> Result<(), RepoError> {
        let id = item.id();
        if self.items.contains_key(&id) {
            return Err(RepoError::duplicate(T::KIND, id));
        }
        tracing::debug!(kind = T::KIND, %id, "add");
        self.items.insert(id, item);
        Ok(())
    }

    pub fn get(&self, id: T::Id) -> Result<&T, RepoError> {
        self.items
            .get(&id)
            .ok_or_else(|| RepoError::not_found(T::KIND, id))
    }

    /// Delete and return the entity stored under `id`.
    pub fn remove(&mut self, id: T::Id) -> Result<T, RepoError> {
        let removed = self
            .items
            .remove(&id)
            .ok_or_else(|| RepoError::not_found(T::KIND, id))?;
        tracing::debug!(kind = T::KIND, %id, "remove");
        Ok(removed)
    }

    /// Replace the value stored under `id` wholesale.
    ///
    /// Fails with `NotFound` if `id` is absent and with `InvalidValue` if
    /// `value` carries a different id.
    pub fn update(&mut self, id: T::Id, value: T) -> Result<(), RepoError> {
        if value.id() != id {
            return Err(RepoError::invalid(
                T::KIND,
                format!("replacement id {} does not match {id}", value.id()),
            ));
        }
        let slot = self
            .items
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found(T::KIND, id))?;
        *slot = value;
        tracing::debug!(kind = T::KIND, %id, "update");
        Ok(())
    }

    /// Build a replacement from the current value and store it.
    ///
    /// `build` may reject the change with `InvalidValue`; in that case, and
    /// when `id` is absent, nothing is modified.
    pub fn replace_with<F>(&mut self, id: T::Id, build: F) -> Result<&T, RepoError>
    where
        F: FnOnce(&T) -> Result<T, RepoError>,
    {
        let current = self.get(id)?;
        let next = build(current)?;
        self.update(id, next)?;
        self.get(id)
    }

    // -----------------------------------------------------------------------
    // Lenient operations
    // -----------------------------------------------------------------------

    /// Replace the value stored under `id`, reporting success as a flag.
    ///
    /// Returns `false` (and changes nothing) when `id` is absent or `value`
    /// carries a different id. Never creates an entry.
    pub fn try_update(&mut self, id: T::Id, value: T) -> bool {
        match self.update(id, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(kind = T::KIND, %id, error = %err, "lenient update skipped");
                false
            }
        }
    }

    /// Remove the entity stored under `id`, if any.
    pub fn try_remove(&mut self, id: T::Id) -> Option<T> {
        let removed = self.items.remove(&id);
        if removed.is_none() {
            tracing::warn!(kind = T::KIND, %id, "lenient remove found nothing");
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Snapshots and bulk operations
    // -----------------------------------------------------------------------

    /// Defensive copy of every stored entity, in ascending id order.
    pub fn all(&self) -> Vec<T> {
        self.items.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn ids(&self) -> Vec<T::Id> {
        self.items.keys().copied().collect()
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Clear the repository and repopulate it from `items`.
    ///
    /// The new contents are assembled aside first: a duplicate id inside
    /// `items` fails with `DuplicateKey` and leaves the current contents
    /// untouched.
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), RepoError> {
        let mut next = BTreeMap::new();
        for item in items {
            let id = item.id();
            if next.insert(id, item).is_some() {
                return Err(RepoError::duplicate(T::KIND, id));
            }
        }
        tracing::debug!(kind = T::KIND, count = next.len(), "replace_all");
        self.items = next;
        Ok(())
    }
}

impl<T: Entity> FromIterator<T> for Repository<T> {
    /// Later items win when ids repeat.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|item| (item.id(), item)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::fixtures::{widget, Widget};

    fn repo_with(ids: &[u32]) -> Repository<Widget> {
        let mut repo = Repository::new();
        for id in ids {
            repo.add(widget(*id, 1, "w", 1)).expect("add");
        }
        repo
    }

    #[test]
    fn duplicate_add_keeps_first_value() {
        let mut repo = Repository::new();
        repo.add(widget(1, 1, "first", 1)).expect("add");

        let err = repo.add(widget(1, 2, "second", 2)).unwrap_err();
        assert_eq!(err, RepoError::duplicate("widget", 1));
        assert_eq!(repo.get(1).unwrap().label, "first");
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn remove_then_get_is_not_found() {
        let mut repo = repo_with(&[1, 2]);
        let removed = repo.remove(1).expect("remove");
        assert_eq!(removed.id, 1);
        assert!(matches!(repo.get(1), Err(RepoError::NotFound { .. })));
        assert!(matches!(repo.remove(1), Err(RepoError::NotFound { .. })));
    }

    #[test]
    fn update_absent_id_never_creates_entry() {
        let mut repo = repo_with(&[1]);
        let err = repo.update(7, widget(7, 1, "ghost", 1)).unwrap_err();
        assert!(matches!(err, RepoError::NotFound { .. }));
        assert!(!repo.try_update(7, widget(7, 1, "ghost", 1)));
        assert!(!repo.contains(7));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn update_rejects_identity_change() {
        let mut repo = repo_with(&[1, 2]);
        let err = repo.update(1, widget(2, 1, "swap", 1)).unwrap_err();
        assert!(matches!(err, RepoError::InvalidValue { .. }));
        assert!(!repo.try_update(1, widget(2, 1, "swap", 1)));
        assert_eq!(repo.get(1).unwrap().label, "w");
    }

    #[test]
    fn replace_with_validation_failure_changes_nothing() {
        let mut repo = repo_with(&[1]);
        let err = repo
            .replace_with(1, |_| Err(RepoError::invalid("widget", "no")))
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidValue { .. }));
        assert_eq!(repo.get(1).unwrap().label, "w");
    }

    #[test]
    fn replace_with_stores_built_value() {
        let mut repo = repo_with(&[1]);
        let updated = repo
            .replace_with(1, |w| {
                Ok(Widget {
                    label: format!("{}-v2", w.label),
                    ..w.clone()
                })
            })
            .expect("replace");
        assert_eq!(updated.label, "w-v2");
    }

    #[test]
    fn snapshot_is_defensive_copy() {
        let repo = repo_with(&[3, 1, 2]);
        let mut snapshot = repo.all();
        snapshot[0].label = "mutated".to_string();
        snapshot.clear();
        assert_eq!(repo.len(), 3);
        assert_eq!(repo.get(1).unwrap().label, "w");
        assert_eq!(repo.ids(), vec![1, 2, 3]);
    }

    #[test]
    fn replace_all_with_duplicates_is_atomic() {
        let mut repo = repo_with(&[9]);
        let err = repo
            .replace_all(vec![widget(1, 1, "a", 1), widget(1, 1, "b", 1)])
            .unwrap_err();
        assert!(matches!(err, RepoError::DuplicateKey { .. }));
        assert_eq!(repo.ids(), vec![9]);

        repo.replace_all(vec![widget(1, 1, "a", 1), widget(2, 1, "b", 1)])
            .expect("replace_all");
        assert_eq!(repo.ids(), vec![1, 2]);
    }

    #[test]
    fn try_remove_reports_absence() {
        let mut repo = repo_with(&[1]);
        assert!(repo.try_remove(1).is_some());
        assert!(repo.try_remove(1).is_none());
        assert!(repo.is_empty());
    }
}
