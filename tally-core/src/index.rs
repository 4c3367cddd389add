//! Read-optimized secondary grouping derived from a repository snapshot.
//!
//! A [`GroupIndex`] caches a projection and nothing else: it can always be
//! rebuilt from the snapshot it came from, and it goes stale the moment the
//! repository changes. Tracking staleness is the owner's job.

use std::collections::BTreeMap;

/// Direction of the within-group ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    /// Newest-first style indexes.
    Descending,
}

/// Groups of `T` keyed by `K`, each ordered by a declared sort key.
#[derive(Debug, Clone)]
pub struct GroupIndex<K, T> {
    groups: BTreeMap<K, Vec<T>>,
}

impl<K: Ord, T> Default for GroupIndex<K, T> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<K: Ord, T: Clone> GroupIndex<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `snapshot`.
    ///
    /// Members sharing a sort key keep their snapshot order, so the result
    /// is a pure function of the inputs.
    pub fn build<S, G, O>(snapshot: &[T], group_key: G, sort_key: O, order: SortOrder) -> Self
    where
        S: Ord,
        G: Fn(&T) -> K,
        O: Fn(&T) -> S,
    {
        let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
        for item in snapshot {
            groups.entry(group_key(item)).or_default().push(item.clone());
        }
        for members in groups.values_mut() {
            match order {
                SortOrder::Ascending => members.sort_by(|a, b| sort_key(a).cmp(&sort_key(b))),
                SortOrder::Descending => members.sort_by(|a, b| sort_key(b).cmp(&sort_key(a))),
            }
        }
        Self { groups }
    }

    /// Replace the whole index with one built from `snapshot`.
    pub fn rebuild<S, G, O>(&mut self, snapshot: &[T], group_key: G, sort_key: O, order: SortOrder)
    where
        S: Ord,
        G: Fn(&T) -> K,
        O: Fn(&T) -> S,
    {
        *self = Self::build(snapshot, group_key, sort_key, order);
        tracing::debug!(groups = self.groups.len(), "index rebuilt");
    }

    /// Members of the group for `key`; `None` when the key has no members.
    pub fn lookup(&self, key: &K) -> Option<&[T]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[T])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::fixtures::{widget, Widget};

    fn by_owner_newest_first(snapshot: &[Widget]) -> GroupIndex<u32, Widget> {
        GroupIndex::build(snapshot, |w| w.owner, |w| w.made_at, SortOrder::Descending)
    }

    #[test]
    fn groups_and_sorts_descending() {
        let snapshot = vec![
            widget(1, 10, "a", 1),
            widget(2, 10, "b", 5),
            widget(3, 20, "c", 3),
            widget(4, 10, "d", 3),
        ];
        let index = by_owner_newest_first(&snapshot);

        let ids: Vec<u32> = index.lookup(&10).unwrap().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![2, 4, 1]);
        assert_eq!(index.lookup(&20).unwrap().len(), 1);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn missing_key_is_none_not_empty() {
        let index = by_owner_newest_first(&[widget(1, 10, "a", 1)]);
        assert!(index.lookup(&99).is_none());
        assert!(GroupIndex::<u32, Widget>::new().is_empty());
    }

    #[test]
    fn ascending_keeps_ties_in_snapshot_order() {
        let snapshot = vec![
            widget(5, 1, "x", 2),
            widget(3, 1, "y", 2),
            widget(4, 1, "z", 1),
        ];
        let index = GroupIndex::build(&snapshot, |w| w.owner, |w| w.made_at, SortOrder::Ascending);
        let ids: Vec<u32> = index.lookup(&1).unwrap().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![4, 5, 3]);
    }

    #[test]
    fn rebuild_replaces_previous_groups() {
        let mut index = by_owner_newest_first(&[widget(1, 10, "a", 1)]);
        index.rebuild(
            &[widget(2, 20, "b", 1)],
            |w| w.owner,
            |w| w.made_at,
            SortOrder::Descending,
        );
        assert!(index.lookup(&10).is_none());
        assert_eq!(index.keys().copied().collect::<Vec<_>>(), vec![20]);
    }
}
