// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Setup hooks: per (event type, element kind) transforms from a raw event to handler
//! arguments.
//!
//! Hooks let element-specific code (form inputs, for example) hand handlers a shaped value
//! instead of the raw host event. When no hook matches, dispatch passes the event through.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;

use crate::host::Host;

/// A setup hook: `(node, event) -> args`.
pub type Hook<H> =
    Rc<dyn Fn(<H as Host>::Node, &<H as Host>::Event) -> <H as Host>::Args>;

/// One name or a list of names.
///
/// Accepted wherever hook registration takes event types or element kinds.
pub trait NameList {
    /// The names in this list.
    fn names(&self) -> &[&str];
}

impl NameList for &str {
    fn names(&self) -> &[&str] {
        core::slice::from_ref(self)
    }
}

impl NameList for &[&str] {
    fn names(&self) -> &[&str] {
        self
    }
}

impl<const N: usize> NameList for [&str; N] {
    fn names(&self) -> &[&str] {
        self
    }
}

impl NameList for Vec<&str> {
    fn names(&self) -> &[&str] {
        self
    }
}

/// Registered setup hooks, keyed by event type name and then element kind.
///
/// Registration is last-write-wins and never fails; hooks may be registered for a type name
/// before (or without) the type itself being registered.
pub struct SetupHooks<H: Host> {
    by_type: HashMap<Box<str>, HashMap<Box<str>, Hook<H>>>,
}

impl<H: Host> Default for SetupHooks<H> {
    fn default() -> Self {
        Self {
            by_type: HashMap::default(),
        }
    }
}

impl<H: Host> SetupHooks<H> {
    /// Creates an empty hook table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `hook` for every pair in `types × kinds`.
    pub fn register(&mut self, types: impl NameList, kinds: impl NameList, hook: Hook<H>) {
        for &ty in types.names() {
            let per_kind = self.by_type.entry(Box::from(ty)).or_default();
            for &kind in kinds.names() {
                per_kind.insert(kind.into(), hook.clone());
            }
        }
    }

    /// Returns the hook for `(ty, kind)`, if any.
    #[must_use]
    pub fn lookup(&self, ty: &str, kind: &str) -> Option<&Hook<H>> {
        self.by_type.get(ty)?.get(kind)
    }

    /// Number of `(type, kind)` pairs with a hook.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.values().map(HashMap::len).sum()
    }

    /// Returns `true` if no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: Host> fmt::Debug for SetupHooks<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.by_type
                    .iter()
                    .map(|(ty, kinds)| (ty, kinds.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}
