// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_delegate`: registration churn and the root bubbling walk.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::vec::Vec;

use understory_delegate::{
    Delegator, EventType, EventTypeDescriptor, Host, HostEvent, Listener, Outcome,
};

struct Ev {
    target: u32,
    stopped: bool,
}

impl HostEvent<u32> for Ev {
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

/// A linear chain: node `i` is the parent of node `i + 1`.
struct Chain {
    kinds: Vec<&'static str>,
}

impl Host for Chain {
    type Node = u32;
    type Event = Ev;
    type Args = u32;
    type Listener = ();

    fn parent(&self, node: u32) -> Option<u32> {
        node.checked_sub(1)
    }

    fn element_kind(&self, node: u32) -> Option<&str> {
        self.kinds.get(node as usize).copied()
    }

    fn install_root_listener(&mut self, _: EventType) {}
    fn create_direct_listener(&mut self, _: EventType) {}
    fn attach_listener(&mut self, _: u32, _: EventType, _: &()) {}
    fn detach_listener(&mut self, _: u32, _: EventType, _: &()) {}
}

fn counting() -> Listener<Chain> {
    Listener::new(|_, _| Outcome::Continue)
}

/// A chain of `depth` nodes with a click listener on every `stride`th node.
fn chain(depth: u32, stride: u32) -> (Delegator<Chain>, EventType) {
    let kinds = (0..depth)
        .map(|i| if i % 4 == 0 { "input" } else { "div" })
        .collect();
    let mut d = Delegator::new(Chain { kinds });
    let click = d.register_event_type("click", EventTypeDescriptor::bubbling());
    d.register_setup_hooks("click", "input", |node, _| node);
    for node in (0..depth).step_by(stride as usize) {
        d.add_listener(node, "click", counting())
            .expect("click is registered");
    }
    (d, click)
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("delegate/dispatch_root");
    for depth in [8_u32, 16, 64, 256] {
        let (mut d, click) = chain(depth, 3);
        group.bench_function(BenchmarkId::new("depth", depth), |b| {
            b.iter(|| {
                let mut ev = Ev {
                    target: depth - 1,
                    stopped: false,
                };
                black_box(d.dispatch_root(click, &mut ev))
            });
        });
    }
    group.finish();
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("delegate/registration");
    group.bench_function("add_remove_1k", |b| {
        b.iter_batched(
            || chain(1024, 1024),
            |(mut d, _)| {
                for node in 0..1024 {
                    d.add_listener(node, "click", counting())
                        .expect("click is registered");
                }
                for node in 0..1024 {
                    d.remove_listener(node, "click");
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("replace_same_node", |b| {
        let (mut d, _) = chain(1, 1);
        b.iter(|| {
            d.add_listener(0, "click", counting())
                .expect("click is registered");
        });
    });
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_registration);
criterion_main!(benches);
