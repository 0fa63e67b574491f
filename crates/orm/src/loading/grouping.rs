//! Order-preserving grouping
//!
//! Rows come back sorted by (parent key, child key). Grouping them through a
//! `HashMap` would hand the aggregates back in hash order, so everything here
//! is keyed through an `IndexMap`, whose iteration order is first-insertion
//! order.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::OrmResult;

/// Aggregates keyed by parent key, iterated in first-seen order
#[derive(Debug, Clone)]
pub struct OrderedGroups<K, A> {
    groups: IndexMap<K, A>,
}

impl<K: Hash + Eq, A> Default for OrderedGroups<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, A> OrderedGroups<K, A> {
    pub fn new() -> Self {
        Self {
            groups: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            groups: IndexMap::with_capacity(capacity),
        }
    }

    /// Aggregate for `key`, created by `create` on first sight of the key.
    ///
    /// `create` is only called for unseen keys, so building the parent from
    /// the current row happens once per parent rather than once per row.
    pub fn get_or_try_insert_with<F>(&mut self, key: K, create: F) -> OrmResult<&mut A>
    where
        F: FnOnce() -> OrmResult<A>,
    {
        let entry = self.groups.entry(key);
        match entry {
            indexmap::map::Entry::Occupied(occupied) => Ok(occupied.into_mut()),
            indexmap::map::Entry::Vacant(vacant) => Ok(vacant.insert(create()?)),
        }
    }

    /// Aggregates in first-seen key order
    pub fn into_values(self) -> Vec<A> {
        self.groups.into_values().collect()
    }
}

/// Group values by key in one linear pass.
///
/// Values keep their relative input order inside each group, and groups are
/// ordered by the first appearance of their key.
pub fn group_by_key<K, V, I, F>(values: I, mut key_of: F) -> IndexMap<K, Vec<V>>
where
    K: Hash + Eq,
    I: IntoIterator<Item = V>,
    F: FnMut(&V) -> K,
{
    let mut grouped: IndexMap<K, Vec<V>> = IndexMap::new();
    for value in values {
        grouped.entry(key_of(&value)).or_default().push(value);
    }
    grouped
}
