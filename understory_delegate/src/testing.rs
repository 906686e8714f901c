// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recording host for unit tests.

use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::host::{Host, HostEvent};
use crate::registry::EventType;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum HostCall {
    InstallRoot(EventType),
    Create(EventType),
    Attach(u32, EventType),
    Detach(u32, EventType),
}

#[derive(Debug, Default)]
pub(crate) struct TestHost {
    parents: HashMap<u32, u32>,
    kinds: HashMap<u32, &'static str>,
    pub(crate) calls: Vec<HostCall>,
}

impl TestHost {
    /// Builds a host from `(child, parent)` links.
    pub(crate) fn with_tree(links: &[(u32, u32)]) -> Self {
        Self {
            parents: links.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn set_kind(&mut self, node: u32, kind: &'static str) {
        self.kinds.insert(node, kind);
    }

    pub(crate) fn count(&self, call: HostCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

#[derive(Debug)]
pub(crate) struct TestEvent {
    pub(crate) target: u32,
    pub(crate) value: i32,
    pub(crate) stopped: bool,
}

impl TestEvent {
    pub(crate) fn at(target: u32) -> Self {
        Self {
            target,
            value: 0,
            stopped: false,
        }
    }
}

impl HostEvent<u32> for TestEvent {
    fn target(&self) -> u32 {
        self.target
    }

    fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    fn propagation_stopped(&self) -> bool {
        self.stopped
    }
}

impl Host for TestHost {
    type Node = u32;
    type Event = TestEvent;
    type Args = i32;
    type Listener = EventType;

    fn parent(&self, node: u32) -> Option<u32> {
        self.parents.get(&node).copied()
    }

    fn element_kind(&self, node: u32) -> Option<&str> {
        self.kinds.get(&node).copied()
    }

    fn install_root_listener(&mut self, ty: EventType) {
        self.calls.push(HostCall::InstallRoot(ty));
    }

    fn create_direct_listener(&mut self, ty: EventType) -> EventType {
        self.calls.push(HostCall::Create(ty));
        ty
    }

    fn attach_listener(&mut self, node: u32, ty: EventType, _listener: &EventType) {
        self.calls.push(HostCall::Attach(node, ty));
    }

    fn detach_listener(&mut self, node: u32, ty: EventType, _listener: &EventType) {
        self.calls.push(HostCall::Detach(node, ty));
    }
}
