// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener values: what callers hand to
//! [`Delegator::add_listener`](crate::Delegator::add_listener), and what storage keeps.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

use crate::delegator::Delegator;
use crate::host::Host;
use crate::registry::EventType;
use crate::types::{Call, Outcome};

/// A stored event handler.
///
/// Handlers get the delegator itself, so they can add or remove listeners while an event is
/// being dispatched.
pub type Handler<H> = Rc<
    dyn Fn(&mut Delegator<H>, Call<'_, <H as Host>::Event, <H as Host>::Args>) -> Outcome,
>;

fn erase<H, F>(f: F) -> Handler<H>
where
    H: Host,
    F: Fn(&mut Delegator<H>, Call<'_, H::Event, H::Args>) -> Outcome + 'static,
{
    Rc::new(f)
}

/// A listener to register on a node.
///
/// ```rust
/// # use understory_delegate::{Host, HostEvent, EventType, Listener, Outcome};
/// # #[derive(Debug)] struct Ev;
/// # impl HostEvent<u32> for Ev {
/// #     fn target(&self) -> u32 { 0 }
/// #     fn stop_propagation(&mut self) {}
/// #     fn propagation_stopped(&self) -> bool { false }
/// # }
/// # struct Dom;
/// # impl Host for Dom {
/// #     type Node = u32; type Event = Ev; type Args = (); type Listener = ();
/// #     fn parent(&self, _: u32) -> Option<u32> { None }
/// #     fn element_kind(&self, _: u32) -> Option<&str> { None }
/// #     fn install_root_listener(&mut self, _: EventType) {}
/// #     fn create_direct_listener(&mut self, _: EventType) {}
/// #     fn attach_listener(&mut self, _: u32, _: EventType, _: &()) {}
/// #     fn detach_listener(&mut self, _: u32, _: EventType, _: &()) {}
/// # }
/// let listener = Listener::<Dom>::new(|_, _| Outcome::Continue)
///     .on_destroy(|| { /* release resources tied to the handler */ })
///     .once();
/// assert!(listener.is_once());
/// ```
pub struct Listener<H: Host> {
    handler: Handler<H>,
    destroy: Option<Box<dyn FnOnce()>>,
    once: bool,
}

impl<H: Host> Listener<H> {
    /// Wraps a handler function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Delegator<H>, Call<'_, H::Event, H::Args>) -> Outcome + 'static,
    {
        Self::from_handler(erase(f))
    }

    /// Wraps an already shared handler.
    ///
    /// Use this when the same handler is registered on several nodes, or when the caller wants
    /// to compare it later with [`Delegator::listener`](crate::Delegator::listener).
    #[must_use]
    pub fn from_handler(handler: Handler<H>) -> Self {
        Self {
            handler,
            destroy: None,
            once: false,
        }
    }

    /// Runs `destroy` when this registration is replaced, removed, or its node released.
    #[must_use]
    pub fn on_destroy(mut self, destroy: impl FnOnce() + 'static) -> Self {
        self.destroy = Some(Box::new(destroy));
        self
    }

    /// Removes the registration after its first invocation.
    #[must_use]
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Returns `true` if this listener removes itself after firing.
    #[must_use]
    #[inline]
    pub fn is_once(&self) -> bool {
        self.once
    }

    /// The handler this listener was built from.
    #[must_use]
    #[inline]
    pub fn handler(&self) -> &Handler<H> {
        &self.handler
    }

    pub(crate) fn into_entry(self, node: H::Node, ty: EventType) -> ListenerEntry<H> {
        let original = self.handler;
        let (handler, registration) = if self.once {
            let inner = original.clone();
            let registration = Rc::new(());
            let mine = registration.clone();
            let handler = erase(move |d: &mut Delegator<H>, call| {
                let outcome = inner(&mut *d, call);
                // Only drop the registration this wrapper was stored with; a replacement made by
                // the handler stays, even if it reuses the same handler.
                if d.stored_registration(node, ty)
                    .is_some_and(|current| Rc::ptr_eq(current, &mine))
                {
                    d.remove_listener_of_type(node, ty);
                }
                outcome
            });
            (handler, Some(registration))
        } else {
            (original.clone(), None)
        };
        ListenerEntry {
            handler,
            original,
            destroy: self.destroy,
            registration,
        }
    }
}

impl<H: Host> fmt::Debug for Listener<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("once", &self.once)
            .field("has_destroy", &self.destroy.is_some())
            .finish_non_exhaustive()
    }
}

/// The active registration for one (node, event type) pair.
pub struct ListenerEntry<H: Host> {
    handler: Handler<H>,
    original: Handler<H>,
    destroy: Option<Box<dyn FnOnce()>>,
    /// Identity of a once-registration, shared with its wrapper.
    registration: Option<Rc<()>>,
}

impl<H: Host> ListenerEntry<H> {
    /// The function dispatch invokes.
    #[must_use]
    #[inline]
    pub fn handler(&self) -> &Handler<H> {
        &self.handler
    }

    /// The caller-supplied function.
    ///
    /// Identical to [`ListenerEntry::handler`] except for once-listeners, whose stored
    /// handler wraps the original.
    #[must_use]
    #[inline]
    pub fn original(&self) -> &Handler<H> {
        &self.original
    }

    /// Returns `true` if a cleanup callback is attached.
    #[must_use]
    #[inline]
    pub fn has_destroy(&self) -> bool {
        self.destroy.is_some()
    }

    pub(crate) fn registration(&self) -> Option<&Rc<()>> {
        self.registration.as_ref()
    }

    /// Runs the cleanup callback, if any, consuming the entry.
    pub fn destroy(mut self) {
        self.run_destroy();
    }

    pub(crate) fn run_destroy(&mut self) {
        if let Some(destroy) = self.destroy.take() {
            destroy();
        }
    }
}

impl<H: Host> fmt::Debug for ListenerEntry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("wrapped", &!Rc::ptr_eq(&self.handler, &self.original))
            .field("has_destroy", &self.destroy.is_some())
            .finish_non_exhaustive()
    }
}
