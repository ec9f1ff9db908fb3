use super::{ArenaFull, NodeId};
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Table mapping each generated state to its node.
///
/// When reopening is disabled, closed nodes that received a cheaper path are parked in
/// a separate table of inconsistent nodes instead of returning to the frontier.
pub struct ClosedTable<K> {
    map: FxHashMap<K, NodeId>,
    inconsistent: FxHashMap<K, NodeId>,
}

impl<K> Default for ClosedTable<K> {
    fn default() -> Self {
        Self {
            map: FxHashMap::default(),
            inconsistent: FxHashMap::default(),
        }
    }
}

impl<K: Hash + Eq> ClosedTable<K> {
    /// Creates a new table with the given capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            inconsistent: FxHashMap::default(),
        }
    }

    /// Returns the node of the state.
    #[inline]
    pub fn get(&self, key: &K) -> Option<NodeId> {
        self.map.get(key).copied()
    }

    /// Registers the node of a state.
    ///
    /// Returns the node previously registered for the state, which is replaced,
    /// or an error if the table cannot grow.
    #[inline]
    pub fn insert(&mut self, key: K, id: NodeId) -> Result<Option<NodeId>, ArenaFull> {
        self.map.try_reserve(1)?;

        Ok(self.map.insert(key, id))
    }

    /// Records that a closed node has a cheaper path but is not reopened.
    pub fn mark_inconsistent(&mut self, key: K, id: NodeId) -> Result<(), ArenaFull> {
        self.inconsistent.try_reserve(1)?;
        self.inconsistent.insert(key, id);

        Ok(())
    }

    /// Returns whether the state has a parked inconsistent node.
    pub fn is_inconsistent(&self, key: &K) -> bool {
        self.inconsistent.contains_key(key)
    }

    /// Iterates over the parked inconsistent nodes.
    pub fn inconsistent_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inconsistent.values().copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn inconsistent_len(&self) -> usize {
        self.inconsistent.len()
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.inconsistent.clear();
    }
}
