// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity map: host node reference → generational [`NodeKey`].
//!
//! Keys are created lazily the first time a node gets a listener and stay stable until the
//! node is [released](NodeIdentities::release). Released slots are reused with a bumped
//! generation, so a stale key never matches the slot's next occupant.

use alloc::vec::Vec;
use core::hash::Hash;
use hashbrown::HashMap;

/// Storage key for a host node.
///
/// This is a small, copyable handle consisting of a slot index and a generation counter.
///
/// ## Semantics
///
/// - A fresh slot starts at generation `1`.
/// - On release, the slot is freed; any existing `NodeKey` that pointed to it is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct key.
///
/// Two nodes that are bound at the same time never share a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey(u32, u32);

impl NodeKey {
    /// Slot index of this key.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Generation of this key.
    #[must_use]
    #[inline]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

#[derive(Copy, Clone, Debug)]
struct Slot {
    generation: u32,
    live: bool,
}

/// Maps host nodes to [`NodeKey`]s.
///
/// This is the only bridge between node references and listener storage. Lookups during
/// dispatch go through [`NodeIdentities::get`], which never creates a key.
#[derive(Clone, Debug)]
pub struct NodeIdentities<N> {
    by_node: HashMap<N, NodeKey>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl<N> Default for NodeIdentities<N> {
    fn default() -> Self {
        Self {
            by_node: HashMap::default(),
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> NodeIdentities<N> {
    /// Creates an empty identity map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key for `node` without creating one.
    #[must_use]
    #[inline]
    pub fn get(&self, node: N) -> Option<NodeKey> {
        self.by_node.get(&node).copied()
    }

    /// Returns the key for `node`, creating one if it has none yet.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots would be allocated.
    pub fn get_or_insert(&mut self, node: N) -> NodeKey {
        if let Some(&key) = self.by_node.get(&node) {
            return key;
        }
        let key = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.live = true;
            NodeKey(idx, slot.generation)
        } else {
            assert!(
                self.slots.len() < u32::MAX as usize,
                "too many node identities (max {})",
                u32::MAX
            );
            #[expect(clippy::cast_possible_truncation, reason = "checked above")]
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                live: true,
            });
            NodeKey(idx, 1)
        };
        self.by_node.insert(node, key);
        key
    }

    /// Unbinds `node` and frees its slot.
    ///
    /// Returns the key the node held, or `None` if it had none.
    pub fn release(&mut self, node: N) -> Option<NodeKey> {
        let key = self.by_node.remove(&node)?;
        let slot = &mut self.slots[key.index() as usize];
        slot.live = false;
        self.free.push(key.index());
        Some(key)
    }

    /// Returns `true` if `key` still refers to a bound node.
    #[must_use]
    pub fn contains_key(&self, key: NodeKey) -> bool {
        self.slots
            .get(key.index() as usize)
            .is_some_and(|slot| slot.live && slot.generation == key.generation())
    }

    /// Number of bound nodes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    /// Returns `true` if no node is bound.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_node_same_key() {
        let mut ids: NodeIdentities<u32> = NodeIdentities::new();
        let a = ids.get_or_insert(10);
        let b = ids.get_or_insert(10);
        assert_eq!(a, b);
        assert_eq!(ids.get(10), Some(a));
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn lookup_does_not_create() {
        let mut ids: NodeIdentities<u32> = NodeIdentities::new();
        assert_eq!(ids.get(3), None);
        assert!(ids.is_empty());
        let _ = ids.get_or_insert(4);
        assert_eq!(ids.get(3), None);
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn distinct_nodes_distinct_keys() {
        let mut ids: NodeIdentities<u32> = NodeIdentities::new();
        let a = ids.get_or_insert(1);
        let b = ids.get_or_insert(2);
        assert_ne!(a, b);
        assert_eq!(a.generation(), 1);
        assert_eq!(b.index(), a.index() + 1);
    }

    #[test]
    fn release_bumps_generation_on_reuse() {
        let mut ids: NodeIdentities<u32> = NodeIdentities::new();
        let old = ids.get_or_insert(1);
        assert_eq!(ids.release(1), Some(old));
        assert!(!ids.contains_key(old));
        assert_eq!(ids.get(1), None);

        // The freed slot is reused for the next node, with a new generation.
        let new = ids.get_or_insert(2);
        assert_eq!(new.index(), old.index());
        assert_eq!(new.generation(), old.generation() + 1);
        assert_ne!(new, old);
        assert!(ids.contains_key(new));
        assert!(!ids.contains_key(old));
    }

    #[test]
    fn release_unknown_is_none() {
        let mut ids: NodeIdentities<u32> = NodeIdentities::new();
        assert_eq!(ids.release(99), None);
        let key = ids.get_or_insert(1);
        assert_eq!(ids.release(1), Some(key));
        assert_eq!(ids.release(1), None);
    }
}
