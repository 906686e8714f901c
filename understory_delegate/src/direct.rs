// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direct-dispatch table: one shared native listener per non-bubbling event type.
//!
//! Every node registered for a direct type gets the same host listener attached, so no
//! per-node closure is ever created. The listener resolves the node's entry from storage at
//! delivery time.

use hashbrown::HashMap;

use crate::registry::EventType;

/// Shared host listeners, created lazily per event type.
#[derive(Debug)]
pub struct DirectTable<L> {
    listeners: HashMap<EventType, L>,
}

impl<L> Default for DirectTable<L> {
    fn default() -> Self {
        Self {
            listeners: HashMap::default(),
        }
    }
}

impl<L> DirectTable<L> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the listener for `ty`, creating it with `create` on first use.
    pub fn get_or_create(&mut self, ty: EventType, create: impl FnOnce() -> L) -> &L {
        self.listeners.entry(ty).or_insert_with(create)
    }

    /// Returns the listener for `ty`, if one has been created.
    #[must_use]
    pub fn get(&self, ty: EventType) -> Option<&L> {
        self.listeners.get(&ty)
    }

    /// Number of direct event types with a shared listener.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if no shared listener has been created yet.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EventRegistry, EventTypeDescriptor};

    #[test]
    fn created_once_per_type() {
        let mut registry: EventRegistry<()> = EventRegistry::new();
        let load = registry.register("load", EventTypeDescriptor::direct());
        let error = registry.register("error", EventTypeDescriptor::direct());

        let mut created = 0;
        let mut table: DirectTable<u32> = DirectTable::new();
        assert!(table.is_empty());
        assert!(table.get(load).is_none());
        for _ in 0..3 {
            let _ = table.get_or_create(load, || {
                created += 1;
                7
            });
        }
        assert_eq!(created, 1);
        assert_eq!(table.get(load), Some(&7));

        let _ = table.get_or_create(error, || 9);
        assert_eq!(table.len(), 2);
    }
}
