// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener storage: node key → event type → active [`ListenerEntry`].
//!
//! This is the authoritative record of what is currently wired on each node. Per-node entries
//! live in a sorted `SmallVec` keyed by [`EventType`]; most nodes carry one or two listeners,
//! so the common case stays inline.

use core::fmt;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::host::Host;
use crate::identity::NodeKey;
use crate::listener::{Handler, ListenerEntry};
use crate::registry::EventType;

/// Default inline capacity for per-node entries.
const INLINE_CAPACITY: usize = 2;

/// All entries registered on one node, sorted by [`EventType`].
pub type NodeListeners<H> = SmallVec<[(EventType, ListenerEntry<H>); INLINE_CAPACITY]>;

/// Per-node listener entries.
pub struct ListenerStorage<H: Host> {
    nodes: HashMap<NodeKey, NodeListeners<H>>,
}

impl<H: Host> Default for ListenerStorage<H> {
    fn default() -> Self {
        Self {
            nodes: HashMap::default(),
        }
    }
}

impl<H: Host> ListenerStorage<H> {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `(key, ty)`.
    #[must_use]
    pub fn get(&self, key: NodeKey, ty: EventType) -> Option<&ListenerEntry<H>> {
        let entries = self.nodes.get(&key)?;
        let i = find(entries, ty).ok()?;
        Some(&entries[i].1)
    }

    /// Returns `true` if `(key, ty)` has an entry.
    #[must_use]
    pub fn contains(&self, key: NodeKey, ty: EventType) -> bool {
        self.get(key, ty).is_some()
    }

    /// Clones out the dispatch handler for `(key, ty)`.
    ///
    /// The clone lets the caller release its borrow of storage before invoking the handler.
    #[must_use]
    pub fn handler(&self, key: NodeKey, ty: EventType) -> Option<Handler<H>> {
        self.get(key, ty).map(|entry| entry.handler().clone())
    }

    /// Stores `entry` for `(key, ty)`.
    ///
    /// If an entry already exists, its cleanup callback runs before the new entry is stored.
    /// Returns `true` if an entry was replaced.
    pub fn insert(&mut self, key: NodeKey, ty: EventType, entry: ListenerEntry<H>) -> bool {
        let entries = self.nodes.entry(key).or_default();
        match find(entries, ty) {
            Ok(i) => {
                entries[i].1.run_destroy();
                entries[i].1 = entry;
                true
            }
            Err(i) => {
                entries.insert(i, (ty, entry));
                false
            }
        }
    }

    /// Removes the entry for `(key, ty)` and hands it back.
    ///
    /// The caller is responsible for running [`ListenerEntry::destroy`].
    pub fn remove(&mut self, key: NodeKey, ty: EventType) -> Option<ListenerEntry<H>> {
        let entries = self.nodes.get_mut(&key)?;
        let i = find(entries, ty).ok()?;
        let (_, entry) = entries.remove(i);
        if entries.is_empty() {
            self.nodes.remove(&key);
        }
        Some(entry)
    }

    /// Removes every entry registered on a node.
    pub fn take_node(&mut self, key: NodeKey) -> Option<NodeListeners<H>> {
        self.nodes.remove(&key)
    }

    /// Event types with an entry on a node, in ascending order.
    pub fn event_types(&self, key: NodeKey) -> impl Iterator<Item = EventType> + '_ {
        self.nodes
            .get(&key)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(ty, _)| *ty))
    }

    /// Number of nodes with at least one entry.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has an entry.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn find<H: Host>(
    entries: &[(EventType, ListenerEntry<H>)],
    ty: EventType,
) -> Result<usize, usize> {
    entries.binary_search_by_key(&ty, |(t, _)| *t)
}

impl<H: Host> fmt::Debug for ListenerStorage<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.nodes.iter().map(|(key, entries)| (key, entries.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::Listener;
    use crate::registry::{EventRegistry, EventTypeDescriptor};
    use crate::testing::TestHost;
    use crate::types::Outcome;
    use crate::NodeIdentities;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    fn setup() -> (NodeKey, EventType, EventType) {
        let mut ids: NodeIdentities<u32> = NodeIdentities::new();
        let mut registry: EventRegistry<TestHost> = EventRegistry::new();
        let click = registry.register("click", EventTypeDescriptor::bubbling());
        let load = registry.register("load", EventTypeDescriptor::direct());
        (ids.get_or_insert(1), click, load)
    }

    fn entry(ty: EventType) -> ListenerEntry<TestHost> {
        Listener::<TestHost>::new(|_, _| Outcome::Continue).into_entry(1, ty)
    }

    #[test]
    fn insert_get_remove() {
        let (key, click, load) = setup();
        let mut storage: ListenerStorage<TestHost> = ListenerStorage::new();
        assert!(!storage.insert(key, load, entry(load)));
        assert!(!storage.insert(key, click, entry(click)));

        assert!(storage.contains(key, click));
        assert!(storage.handler(key, load).is_some());
        // Sorted by event type regardless of insertion order.
        assert_eq!(storage.event_types(key).collect::<Vec<_>>(), vec![click, load]);

        assert!(storage.remove(key, click).is_some());
        assert!(!storage.contains(key, click));
        assert!(storage.remove(key, click).is_none());
        assert_eq!(storage.len(), 1);

        assert!(storage.remove(key, load).is_some());
        assert!(storage.is_empty());
    }

    #[test]
    fn replace_runs_old_destroy_first() {
        let (key, click, _) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut storage: ListenerStorage<TestHost> = ListenerStorage::new();

        let first_log = log.clone();
        let first = Listener::<TestHost>::new(|_, _| Outcome::Continue)
            .on_destroy(move || first_log.borrow_mut().push("first destroyed"))
            .into_entry(1, click);
        assert!(first.has_destroy());
        assert!(!storage.insert(key, click, first));

        let second = Listener::<TestHost>::new(|_, _| Outcome::Continue).into_entry(1, click);
        assert!(!second.has_destroy());
        let second_handler = second.handler().clone();
        assert!(storage.insert(key, click, second));

        assert_eq!(*log.borrow(), vec!["first destroyed"]);
        let stored = storage.handler(key, click).unwrap();
        assert!(Rc::ptr_eq(&stored, &second_handler));
    }

    #[test]
    fn take_node_clears_everything() {
        let (key, click, load) = setup();
        let mut storage: ListenerStorage<TestHost> = ListenerStorage::new();
        storage.insert(key, click, entry(click));
        storage.insert(key, load, entry(load));

        let taken = storage.take_node(key).unwrap();
        assert_eq!(taken.len(), 2);
        assert!(storage.is_empty());
        assert_eq!(storage.event_types(key).count(), 0);
    }
}
