// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch entry points the host calls when a native event arrives.
//!
//! ## Root delegation
//!
//! [`Delegator::dispatch_root`] runs for bubbling types. It:
//!
//! 1. Builds the target→root path by following [`Host::parent`], before any handler runs.
//! 2. Visits each node on the path, nearest first. Nodes without a key or without an entry for
//!    the event type are skipped; no keys are created.
//! 3. Clones the node's handler out of storage and releases every borrow, then calls it with
//!    either setup hook arguments or the raw event.
//! 4. Stops when the handler returns [`Outcome::Stop`] / [`Outcome::StopAndConsume`] or the
//!    event reports [`HostEvent::propagation_stopped`].
//!
//! Handlers receive `&mut Delegator`, so they may add or remove listeners mid-walk. Changes to
//! nodes further up the path are observed when the walk reaches them; a node already visited
//! is never revisited.
//!
//! A panicking handler unwinds through the walk; remaining ancestors are not visited.
//!
//! ## Direct delivery
//!
//! [`Delegator::dispatch_direct`] runs for non-bubbling types, from the shared listener the
//! host attached to `node`. It invokes only that node's entry.

use smallvec::SmallVec;
use tracing::trace;

use crate::delegator::Delegator;
use crate::host::{Host, HostEvent};
use crate::registry::EventType;
use crate::types::{Call, Outcome};

/// Inline capacity of the ancestor path; deeper trees spill to the heap.
const PATH_INLINE: usize = 16;

impl<H: Host> Delegator<H> {
    /// Delivers a bubbling event received by the root listener for `ty`.
    ///
    /// Returns `true` if a handler consumed the event with [`Outcome::StopAndConsume`].
    pub fn dispatch_root(&mut self, ty: EventType, event: &mut H::Event) -> bool {
        let mut path: SmallVec<[H::Node; PATH_INLINE]> = SmallVec::new();
        let mut next = Some(event.target());
        while let Some(node) = next {
            path.push(node);
            next = self.host.parent(node);
        }
        trace!(?ty, target = ?path[0], depth = path.len(), "root dispatch");

        for node in path {
            let Some(outcome) = self.invoke(ty, node, event) else {
                continue;
            };
            match outcome {
                Outcome::StopAndConsume => return true,
                Outcome::Stop => return false,
                Outcome::Continue if event.propagation_stopped() => {
                    trace!(?ty, ?node, "propagation stopped by event");
                    return false;
                }
                Outcome::Continue => {}
            }
        }
        false
    }

    /// Delivers a direct event received by the shared listener on `node`.
    ///
    /// Returns `true` if the handler consumed the event.
    pub fn dispatch_direct(
        &mut self,
        ty: EventType,
        node: H::Node,
        event: &mut H::Event,
    ) -> bool {
        matches!(self.invoke(ty, node, event), Some(Outcome::StopAndConsume))
    }

    /// Invokes the entry for `(node, ty)`, if there is one.
    fn invoke(
        &mut self,
        ty: EventType,
        node: H::Node,
        event: &mut H::Event,
    ) -> Option<Outcome> {
        let key = self.identities.get(node)?;
        let handler = self.storage.handler(key, ty)?;
        let hook = match (self.registry.name(ty), self.host.element_kind(node)) {
            (Some(name), Some(kind)) => self.hooks.lookup(name, kind).cloned(),
            _ => None,
        };

        let shaped = hook.is_some();
        let outcome = match hook {
            Some(hook) => {
                let args = hook(node, &*event);
                handler(&mut *self, Call::Args(args))
            }
            None => handler(&mut *self, Call::Event(&mut *event)),
        };
        trace!(?ty, ?node, ?outcome, shaped, "handler invoked");
        Some(outcome)
    }
}
