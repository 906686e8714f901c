// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host platform capabilities consumed by the delegator.
//!
//! The delegator never owns the UI tree. It asks the host for parent links and element
//! kinds, and asks it to wire native listeners. The host in turn routes native deliveries
//! back into [`Delegator::dispatch_root`](crate::Delegator::dispatch_root) (for bubbling
//! types) or [`Delegator::dispatch_direct`](crate::Delegator::dispatch_direct) (for direct
//! types).

use core::fmt::Debug;
use core::hash::Hash;

use crate::registry::EventType;

/// A native event as seen by the delegator and by handlers.
pub trait HostEvent<N> {
    /// The node the event was originally dispatched at.
    fn target(&self) -> N;

    /// Request that propagation stop after the current handler.
    fn stop_propagation(&mut self);

    /// Returns `true` once [`HostEvent::stop_propagation`] has been requested.
    fn propagation_stopped(&self) -> bool;
}

/// The host UI tree and its native listener primitives.
///
/// Handlers and hooks are stored as `'static` trait objects over the host's types, so the
/// host itself must be `'static`.
pub trait Host: 'static {
    /// Host node reference. Must be cheap to copy and hashable; it keys the identity map.
    type Node: Copy + Eq + Hash + Debug;
    /// Native event delivered to handlers.
    type Event: HostEvent<Self::Node>;
    /// Argument value produced by setup hooks.
    type Args;
    /// Native listener handle shared by every node of one direct event type.
    type Listener;

    /// Parent of `node` in the rendered tree, or `None` at the root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Element kind of `node` (for example `"input"`), used for setup hook lookup.
    fn element_kind(&self, node: Self::Node) -> Option<&str>;

    /// Install the single root-level listener for a bubbling event type.
    ///
    /// Called at most once per event type.
    fn install_root_listener(&mut self, ty: EventType);

    /// Create the shared native listener for a direct event type.
    ///
    /// Called at most once per event type; the result is reused for every node.
    fn create_direct_listener(&mut self, ty: EventType) -> Self::Listener;

    /// Attach the shared listener for `ty` to `node`.
    fn attach_listener(&mut self, node: Self::Node, ty: EventType, listener: &Self::Listener);

    /// Detach the shared listener for `ty` from `node`.
    fn detach_listener(&mut self, node: Self::Node, ty: EventType, listener: &Self::Listener);
}
