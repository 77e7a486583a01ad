// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for token generation, callback registry churn, and
// event fan-out in the webbridge-runtime crate.

use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use webbridge_core::TimeoutPolicy;
use webbridge_runtime::{BridgeLogger, CallbackRegistry, EventRegistry, Outcome, listener};

fn bench_generate_token(c: &mut Criterion) {
    let registry = CallbackRegistry::new(TimeoutPolicy::Reject, BridgeLogger::new("Bench", false));
    c.bench_function("generate_token", |b| {
        b.iter(|| black_box(registry.generate_token()));
    });
}

/// Register then resolve without timers, the hot path of every native call.
fn bench_register_resolve(c: &mut Criterion) {
    let registry = CallbackRegistry::new(TimeoutPolicy::Reject, BridgeLogger::new("Bench", false));
    let response = json!({"success": true, "data": {"x": 1}});
    c.bench_function("register_resolve", |b| {
        b.iter(|| {
            let token = registry.generate_token();
            registry.register(token.clone(), Box::new(|outcome: Outcome| drop(black_box(outcome))), Duration::ZERO);
            black_box(registry.resolve(&token, response.clone()))
        });
    });
}

fn bench_emit_fanout(c: &mut Criterion) {
    let events = EventRegistry::new(BridgeLogger::new("Bench", false));
    for _ in 0..16 {
        events.on("tick", listener(|data| {
            black_box(data);
            Ok(())
        }));
    }
    let payload = json!({"frame": 1});
    c.bench_function("emit_16_listeners", |b| {
        b.iter(|| black_box(events.emit("tick", &payload)));
    });
}

criterion_group!(benches, bench_generate_token, bench_register_resolve, bench_emit_fanout);
criterion_main!(benches);
