// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_delegate --heading-base-level=0

//! Understory Delegate: event delegation for UI trees.
//!
//! ## Overview
//!
//! Components register handlers per node and event type. Instead of attaching one native
//! listener per node, this crate keeps handlers in its own storage and wires the host in one of
//! two ways, chosen per event type:
//!
//! - **Bubbling** types install a single listener at the root. When it fires, the host calls
//!   [`Delegator::dispatch_root`], which walks from the target up to the root and invokes each
//!   node's handler, nearest first, until one stops propagation.
//! - **Direct** types (events that do not bubble, like `load`) share one native listener per
//!   type. The host attaches it to every node that registers and calls
//!   [`Delegator::dispatch_direct`] when it fires.
//!
//! The crate does not own the tree. A [`Host`] implementation supplies parent links, element
//! kinds, and the native listener primitives.
//!
//! ## Registries
//!
//! - [`EventRegistry`] maps event type names to [`EventTypeDescriptor`]s: whether the type
//!   bubbles, whether it has been activated, and how many bubbling registrations are live.
//!   Descriptors may carry a custom setup function that replaces the root install.
//! - [`SetupHooks`] maps `(event type, element kind)` pairs to hooks that turn a raw event into
//!   handler arguments, so a form input's handler can receive its value instead of the event.
//! - [`NodeIdentities`] gives each host node a stable [`NodeKey`]; [`ListenerStorage`] keeps at
//!   most one entry per node and event type under that key.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_delegate::{
//!     Delegator, EventType, EventTypeDescriptor, Host, HostEvent, Listener, Outcome,
//! };
//!
//! #[derive(Debug)]
//! struct Click {
//!     target: u32,
//!     stopped: bool,
//! }
//!
//! impl HostEvent<u32> for Click {
//!     fn target(&self) -> u32 { self.target }
//!     fn stop_propagation(&mut self) { self.stopped = true; }
//!     fn propagation_stopped(&self) -> bool { self.stopped }
//! }
//!
//! struct Tree {
//!     parents: Vec<Option<u32>>,
//!     roots: Vec<EventType>,
//! }
//!
//! impl Host for Tree {
//!     type Node = u32;
//!     type Event = Click;
//!     type Args = ();
//!     type Listener = ();
//!
//!     fn parent(&self, node: u32) -> Option<u32> { self.parents[node as usize] }
//!     fn element_kind(&self, _: u32) -> Option<&str> { None }
//!     fn install_root_listener(&mut self, ty: EventType) { self.roots.push(ty); }
//!     fn create_direct_listener(&mut self, _: EventType) {}
//!     fn attach_listener(&mut self, _: u32, _: EventType, _: &()) {}
//!     fn detach_listener(&mut self, _: u32, _: EventType, _: &()) {}
//! }
//!
//! // 0 is the root, 1 its child, 2 a grandchild.
//! let tree = Tree { parents: vec![None, Some(0), Some(1)], roots: Vec::new() };
//! let mut delegator = Delegator::new(tree);
//! let click = delegator.register_event_type("click", EventTypeDescriptor::bubbling());
//!
//! let log: Rc<RefCell<Vec<u32>>> = Rc::default();
//! for node in [0_u32, 2] {
//!     let log = log.clone();
//!     let listener: Listener<Tree> = Listener::new(move |_, _| {
//!         log.borrow_mut().push(node);
//!         Outcome::Continue
//!     });
//!     delegator.add_listener(node, "click", listener).unwrap();
//! }
//! assert_eq!(delegator.host().roots, [click]);
//! assert_eq!(delegator.registry().counter(click), 2);
//!
//! // The host's root listener forwards native clicks here.
//! delegator.dispatch_root(click, &mut Click { target: 2, stopped: false });
//! assert_eq!(*log.borrow(), [2, 0]);
//!
//! assert!(delegator.add_listener(1, "hover", Listener::new(|_, _| Outcome::Continue)).is_err());
//! ```
//!
//! ## Re-entrancy
//!
//! Handlers receive `&mut Delegator`, so they may register or remove listeners while an event
//! is being delivered. The ancestor path is computed before the first handler runs; changes to
//! nodes not yet visited are observed, visited nodes are never revisited.
//!
//! ## Logging
//!
//! Registration and dispatch emit [`tracing`] events: `debug` for type activation and node
//! release, `trace` per listener change and handler invocation, `warn` for rejected
//! registrations. Nothing is emitted unless the application installs a subscriber.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. The default `std` feature only forwards to
//! `tracing` and `thiserror`.

#![no_std]

extern crate alloc;

mod delegator;
mod direct;
mod dispatcher;
mod error;
mod hooks;
mod host;
mod identity;
mod listener;
mod registry;
mod storage;
mod types;

#[cfg(test)]
mod testing;

pub use delegator::Delegator;
pub use direct::DirectTable;
pub use error::DelegateError;
pub use hooks::{Hook, NameList, SetupHooks};
pub use host::{Host, HostEvent};
pub use identity::{NodeIdentities, NodeKey};
pub use listener::{Handler, Listener, ListenerEntry};
pub use registry::{EventFlags, EventRegistry, EventType, EventTypeDescriptor, SetupFn};
pub use storage::{ListenerStorage, NodeListeners};
pub use types::{Call, Outcome};
