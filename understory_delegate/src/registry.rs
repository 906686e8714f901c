// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event type registry.
//!
//! Maps event-type names to compact [`EventType`] ids and per-type
//! [`EventTypeDescriptor`]s. Collaborators populate the registry at startup, before any
//! listener for a type is added.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;

use crate::error::DelegateError;

/// A registered event type.
///
/// A lightweight `u16` handle minted by [`EventRegistry::register`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventType(u16);

impl EventType {
    /// Returns the underlying index of this event type.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventType").field(&self.0).finish()
    }
}

bitflags::bitflags! {
    /// Dispatch strategy and activation state of an event type.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventFlags: u8 {
        /// Delivered through one root listener with user-land bubbling.
        const BUBBLING = 0b0000_0001;
        /// The first listener for this type has been added and its wiring is in place.
        const ACTIVE   = 0b0000_0010;
    }
}

/// One-time activation hook for an event type.
///
/// Replaces the generic activation (root listener install) for types that need custom
/// root-level behavior.
pub type SetupFn<H> = Box<dyn FnMut(&mut H, EventType)>;

/// Per-type dispatch strategy and bookkeeping.
pub struct EventTypeDescriptor<H> {
    flags: EventFlags,
    counter: usize,
    setup: Option<SetupFn<H>>,
}

impl<H> EventTypeDescriptor<H> {
    /// A type delivered through the root listener and bubbled in user-land.
    #[must_use]
    pub fn bubbling() -> Self {
        Self {
            flags: EventFlags::BUBBLING,
            counter: 0,
            setup: None,
        }
    }

    /// A type delivered by a shared native listener attached to each node.
    #[must_use]
    pub fn direct() -> Self {
        Self {
            flags: EventFlags::empty(),
            counter: 0,
            setup: None,
        }
    }

    /// Run `setup` once on activation instead of the default wiring.
    #[must_use]
    pub fn with_setup(mut self, setup: impl FnMut(&mut H, EventType) + 'static) -> Self {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Strategy and activation flags.
    #[must_use]
    #[inline]
    pub fn flags(&self) -> EventFlags {
        self.flags
    }

    /// Returns `true` for root-delegated types.
    #[must_use]
    #[inline]
    pub fn is_bubbling(&self) -> bool {
        self.flags.contains(EventFlags::BUBBLING)
    }

    /// Returns `true` once the first listener for this type has been added.
    #[must_use]
    #[inline]
    pub fn is_active(&self) -> bool {
        self.flags.contains(EventFlags::ACTIVE)
    }

    /// Number of nodes currently holding a bubbling registration for this type.
    #[must_use]
    #[inline]
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Returns `true` if a custom setup function replaces the default wiring.
    #[must_use]
    #[inline]
    pub fn has_setup(&self) -> bool {
        self.setup.is_some()
    }

    /// Performs the one-time activation side effect.
    ///
    /// Returns `false` if the type was already active.
    pub(crate) fn activate(
        &mut self,
        host: &mut H,
        ty: EventType,
        install_root: impl FnOnce(&mut H),
    ) -> bool {
        if self.is_active() {
            return false;
        }
        if let Some(setup) = self.setup.as_mut() {
            setup(host, ty);
        } else if self.is_bubbling() {
            install_root(host);
        }
        self.flags.insert(EventFlags::ACTIVE);
        true
    }

    pub(crate) fn increment(&mut self) {
        self.counter += 1;
    }

    pub(crate) fn decrement(&mut self) {
        debug_assert!(self.counter > 0, "bubbling listener counter underflow");
        self.counter = self.counter.saturating_sub(1);
    }
}

impl<H> fmt::Debug for EventTypeDescriptor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTypeDescriptor")
            .field("flags", &self.flags)
            .field("counter", &self.counter)
            .field("has_setup", &self.setup.is_some())
            .finish()
    }
}

/// A registry of event types.
///
/// # Example
///
/// ```rust
/// use understory_delegate::{EventRegistry, EventTypeDescriptor};
///
/// let mut registry: EventRegistry<()> = EventRegistry::new();
/// let click = registry.register("click", EventTypeDescriptor::bubbling());
/// let load = registry.register("load", EventTypeDescriptor::direct());
///
/// assert_eq!(registry.resolve("click"), Ok(click));
/// assert_eq!(registry.name(load), Some("load"));
/// assert!(registry.resolve("wheel").is_err());
/// ```
pub struct EventRegistry<H> {
    types: Vec<(Box<str>, EventTypeDescriptor<H>)>,
    by_name: HashMap<Box<str>, EventType>,
}

impl<H> Default for EventRegistry<H> {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            by_name: HashMap::default(),
        }
    }
}

impl<H> EventRegistry<H> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an event type under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered, or if more than 65,535 types are registered.
    pub fn register(&mut self, name: &str, descriptor: EventTypeDescriptor<H>) -> EventType {
        assert!(
            !self.by_name.contains_key(name),
            "Event type '{name}' is already registered"
        );
        assert!(
            self.types.len() < u16::MAX as usize,
            "Too many event types registered (max {})",
            u16::MAX
        );

        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let ty = EventType(self.types.len() as u16);

        self.types.push((name.into(), descriptor));
        self.by_name.insert(name.into(), ty);
        ty
    }

    /// Looks up an event type by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<EventType> {
        self.by_name.get(name).copied()
    }

    /// Looks up an event type by name, failing with
    /// [`DelegateError::UnregisteredEventType`] if it is unknown.
    pub fn resolve(&self, name: &str) -> Result<EventType, DelegateError> {
        self.by_name(name)
            .ok_or_else(|| DelegateError::UnregisteredEventType { name: name.into() })
    }

    /// Returns the name an event type was registered under.
    #[must_use]
    pub fn name(&self, ty: EventType) -> Option<&str> {
        self.types.get(ty.index() as usize).map(|(name, _)| &**name)
    }

    /// Returns the descriptor for an event type.
    #[must_use]
    pub fn get(&self, ty: EventType) -> Option<&EventTypeDescriptor<H>> {
        self.types.get(ty.index() as usize).map(|(_, d)| d)
    }

    pub(crate) fn get_mut(&mut self, ty: EventType) -> Option<&mut EventTypeDescriptor<H>> {
        self.types.get_mut(ty.index() as usize).map(|(_, d)| d)
    }

    /// Returns `true` if `ty` is delivered through the root listener.
    #[must_use]
    pub fn is_bubbling(&self, ty: EventType) -> bool {
        self.get(ty).is_some_and(EventTypeDescriptor::is_bubbling)
    }

    /// Returns `true` once the first listener for `ty` has been added.
    #[must_use]
    pub fn is_active(&self, ty: EventType) -> bool {
        self.get(ty).is_some_and(EventTypeDescriptor::is_active)
    }

    /// Bubbling registration count for `ty` (zero for unknown or direct types).
    #[must_use]
    pub fn counter(&self, ty: EventType) -> usize {
        self.get(ty).map(EventTypeDescriptor::counter).unwrap_or_default()
    }

    /// Number of registered event types.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no event types are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over all registered types and their names, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (EventType, &str)> + '_ {
        self.types.iter().enumerate().map(|(i, (name, _))| {
            #[expect(clippy::cast_possible_truncation, reason = "bounded by register")]
            let ty = EventType(i as u16);
            (ty, &**name)
        })
    }
}

impl<H> fmt::Debug for EventRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.types.iter().map(|(name, d)| (&**name, d)))
            .finish()
    }
}
