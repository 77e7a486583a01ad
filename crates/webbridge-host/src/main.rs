// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WebBridge host simulator.
//
// Initialises logging, loads an optional JSON bridge config (first
// argument), wires the bridge to an in-process loopback host, and runs a
// short scripted session of calls, sends, and events.

mod loopback;

use std::sync::Arc;

use serde_json::json;

use webbridge_core::BridgeConfig;
use webbridge_runtime::{NativeBridge, listener};
use webbridge_transport::HostBindings;

const SIMULATED_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) WebBridgeHost";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match BridgeConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(%path, error = %e, "config load failed, using defaults");
                BridgeConfig::default()
            }
        },
        None => BridgeConfig::default(),
    };

    tracing::info!("WebBridge host simulator starting");

    let (handler, inbox) = loopback::channel();
    let bindings = HostBindings::browser(SIMULATED_UA).with_webkit_handler(Arc::new(handler));
    let bridge = NativeBridge::new(config, bindings);
    let host = tokio::spawn(loopback::serve(bridge.clone(), inbox));

    let info = bridge.platform_info();
    tracing::info!(platform = %info.platform, native = info.is_native, "bridge ready");

    bridge.on(
        "appState",
        listener(|data| {
            tracing::info!(state = %data, "appState event");
            Ok(())
        }),
    );

    for (method, params) in [
        ("echo", json!({ "greeting": "hello" })),
        ("version", json!({})),
        ("fail", json!({})),
        ("silent", json!({})),
        ("missing", json!({})),
    ] {
        match bridge.call(method, params).await {
            Ok(value) => tracing::info!(%method, result = %value, "call resolved"),
            Err(e) => tracing::warn!(%method, error = %e, "call rejected"),
        }
    }

    bridge.send("analytics", json!({ "event": "session_end" }));
    bridge.emit("appState", &json!({ "foreground": false }));

    bridge.destroy();
    drop(bridge);
    host.abort();
    tracing::info!("WebBridge host simulator finished");
}
