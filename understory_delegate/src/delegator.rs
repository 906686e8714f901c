// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The public API: [`Delegator`] owns every registry and table and orchestrates
//! registration.
//!
//! Strategy per event type:
//! - **Bubbling** types get one root listener, installed the first time the type is used.
//!   Entries are only recorded in storage; [`Delegator::dispatch_root`] walks the ancestor
//!   chain and invokes them.
//! - **Direct** types share one host listener per type, attached to each registered node.
//!   [`Delegator::dispatch_direct`] looks up the node's entry when the host delivers.

use alloc::rc::Rc;
use core::fmt;
use tracing::{debug, trace, warn};

use crate::direct::DirectTable;
use crate::error::DelegateError;
use crate::hooks::{NameList, SetupHooks};
use crate::host::Host;
use crate::identity::{NodeIdentities, NodeKey};
use crate::listener::{Handler, Listener};
use crate::registry::{EventRegistry, EventType, EventTypeDescriptor};
use crate::storage::ListenerStorage;

/// Event delegation state for one host tree.
pub struct Delegator<H: Host> {
    pub(crate) host: H,
    pub(crate) registry: EventRegistry<H>,
    pub(crate) hooks: SetupHooks<H>,
    pub(crate) identities: NodeIdentities<H::Node>,
    pub(crate) storage: ListenerStorage<H>,
    pub(crate) direct: DirectTable<H::Listener>,
}

impl<H: Host> Delegator<H> {
    /// Creates a delegator with an empty event registry.
    pub fn new(host: H) -> Self {
        Self::with_registry(host, EventRegistry::new())
    }

    /// Creates a delegator around a pre-populated event registry.
    pub fn with_registry(host: H, registry: EventRegistry<H>) -> Self {
        Self {
            host,
            registry,
            hooks: SetupHooks::new(),
            identities: NodeIdentities::new(),
            storage: ListenerStorage::new(),
            direct: DirectTable::new(),
        }
    }

    /// Registers an event type. See [`EventRegistry::register`].
    pub fn register_event_type(
        &mut self,
        name: &str,
        descriptor: EventTypeDescriptor<H>,
    ) -> EventType {
        self.registry.register(name, descriptor)
    }

    /// Registers `hook` for every pair in `types × kinds`.
    ///
    /// During dispatch, when a node whose [element kind](Host::element_kind) matches has a
    /// listener for one of `types`, its handler receives `hook(node, &event)` instead of the
    /// raw event. Later registrations for the same pair win.
    pub fn register_setup_hooks<F>(&mut self, types: impl NameList, kinds: impl NameList, hook: F)
    where
        F: Fn(H::Node, &H::Event) -> H::Args + 'static,
    {
        self.hooks.register(types, kinds, Rc::new(hook));
    }

    /// Sets `listener` as the handler for `type_name` on `node`.
    ///
    /// The first listener for a type activates it: the descriptor's setup function runs, or
    /// for bubbling types the root listener is installed. An existing entry for the same node
    /// and type is destroyed and replaced.
    ///
    /// # Errors
    ///
    /// Returns [`DelegateError::UnregisteredEventType`] if `type_name` has no descriptor. No
    /// state is touched in that case.
    pub fn add_listener(
        &mut self,
        node: H::Node,
        type_name: &str,
        listener: Listener<H>,
    ) -> Result<(), DelegateError> {
        let ty = self
            .registry
            .resolve(type_name)
            .inspect_err(|err| warn!(?node, %err, "rejected listener"))?;
        self.activate(ty);

        let key = self.identities.get_or_insert(node);
        let entry = listener.into_entry(node, ty);
        let replaced = self.storage.insert(key, ty, entry);

        let Some(descriptor) = self.registry.get_mut(ty) else {
            return Ok(());
        };
        if descriptor.is_bubbling() {
            if !replaced {
                descriptor.increment();
            }
        } else if !replaced {
            let host = &mut self.host;
            let shared = self.direct.get_or_create(ty, || {
                debug!(?ty, name = type_name, "creating shared direct listener");
                host.create_direct_listener(ty)
            });
            self.host.attach_listener(node, ty, shared);
        }
        trace!(?node, ?key, name = type_name, replaced, "listener added");
        Ok(())
    }

    /// Removes the handler for `type_name` from `node`.
    ///
    /// Unknown nodes, unknown types, and nodes without a handler for the type are ignored.
    pub fn remove_listener(&mut self, node: H::Node, type_name: &str) {
        let Some(ty) = self.registry.by_name(type_name) else {
            return;
        };
        self.remove_listener_of_type(node, ty);
    }

    /// Removes every listener on `node` and releases its identity.
    ///
    /// Call this when the node is destroyed. Each entry is cleaned up exactly as
    /// [`Delegator::remove_listener`] would.
    pub fn release_node(&mut self, node: H::Node) {
        let Some(key) = self.identities.get(node) else {
            return;
        };
        if let Some(entries) = self.storage.take_node(key) {
            for (ty, entry) in entries {
                entry.destroy();
                self.unwire(node, ty);
            }
        }
        self.identities.release(node);
        debug!(?node, ?key, "node released");
    }

    /// Returns `true` if `node` has a handler for `type_name`.
    #[must_use]
    pub fn has_listener(&self, node: H::Node, type_name: &str) -> bool {
        self.registry
            .by_name(type_name)
            .and_then(|ty| self.stored_original(node, ty))
            .is_some()
    }

    /// The caller-supplied handler registered for `type_name` on `node`.
    #[must_use]
    pub fn listener(&self, node: H::Node, type_name: &str) -> Option<&Handler<H>> {
        let ty = self.registry.by_name(type_name)?;
        self.stored_original(node, ty)
    }

    /// The host this delegator drives.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the delegator and returns the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// The event type registry.
    #[must_use]
    pub fn registry(&self) -> &EventRegistry<H> {
        &self.registry
    }

    /// Mutable access to the event type registry, for registering further types.
    pub fn registry_mut(&mut self) -> &mut EventRegistry<H> {
        &mut self.registry
    }

    /// The setup hook table.
    #[must_use]
    pub fn hooks(&self) -> &SetupHooks<H> {
        &self.hooks
    }

    /// The node identity map.
    #[must_use]
    pub fn identities(&self) -> &NodeIdentities<H::Node> {
        &self.identities
    }

    /// The listener storage.
    #[must_use]
    pub fn storage(&self) -> &ListenerStorage<H> {
        &self.storage
    }

    /// Returns the key `node` is stored under, without creating one.
    #[must_use]
    pub fn node_key(&self, node: H::Node) -> Option<NodeKey> {
        self.identities.get(node)
    }

    pub(crate) fn stored_original(&self, node: H::Node, ty: EventType) -> Option<&Handler<H>> {
        let key = self.identities.get(node)?;
        self.storage.get(key, ty).map(|entry| entry.original())
    }

    pub(crate) fn stored_registration(&self, node: H::Node, ty: EventType) -> Option<&Rc<()>> {
        let key = self.identities.get(node)?;
        self.storage.get(key, ty)?.registration()
    }

    pub(crate) fn remove_listener_of_type(&mut self, node: H::Node, ty: EventType) {
        let Some(key) = self.identities.get(node) else {
            return;
        };
        let Some(entry) = self.storage.remove(key, ty) else {
            return;
        };
        entry.destroy();
        self.unwire(node, ty);
        trace!(?node, ?key, ?ty, "listener removed");
    }

    fn activate(&mut self, ty: EventType) {
        let Some(descriptor) = self.registry.get_mut(ty) else {
            return;
        };
        let custom = descriptor.has_setup();
        let bubbling = descriptor.is_bubbling();
        if descriptor.activate(&mut self.host, ty, |host| host.install_root_listener(ty)) {
            debug!(?ty, bubbling, custom, "event type activated");
        }
    }

    /// Undoes the per-type wiring for a node whose entry was just dropped.
    fn unwire(&mut self, node: H::Node, ty: EventType) {
        let Some(descriptor) = self.registry.get_mut(ty) else {
            return;
        };
        if descriptor.is_bubbling() {
            descriptor.decrement();
        } else if let Some(shared) = self.direct.get(ty) {
            self.host.detach_listener(node, ty, shared);
        }
    }
}

impl<H: Host> fmt::Debug for Delegator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegator")
            .field("registry", &self.registry)
            .field("hooks", &self.hooks)
            .field("nodes", &self.identities.len())
            .field("storage", &self.storage)
            .field("direct_types", &self.direct.len())
            .finish_non_exhaustive()
    }
}
