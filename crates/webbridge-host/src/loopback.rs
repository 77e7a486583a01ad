// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process stand-in for a WKWebView host.
//
// Envelopes posted by the bridge are queued to a task that answers them
// asynchronously through `handle_host_message`, the same entry point a real
// host would drive from `evaluateJavaScript`.

use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::{debug, info};

use webbridge_core::error::{BridgeError, Result};
use webbridge_runtime::NativeBridge;
use webbridge_transport::WebKitMessageHandler;

/// Message handler half: hands envelopes to the responder task.
pub struct LoopbackHandler {
    outbox: mpsc::UnboundedSender<Value>,
}

impl WebKitMessageHandler for LoopbackHandler {
    fn post_message(&self, message: Value) -> Result<()> {
        self.outbox
            .send(message)
            .map_err(|_| BridgeError::TransportSend("loopback host has shut down".into()))
    }
}

pub fn channel() -> (LoopbackHandler, mpsc::UnboundedReceiver<Value>) {
    let (outbox, inbox) = mpsc::unbounded_channel();
    (LoopbackHandler { outbox }, inbox)
}

/// Answer every envelope until the bridge side hangs up.
pub async fn serve(bridge: NativeBridge, mut inbox: mpsc::UnboundedReceiver<Value>) {
    while let Some(envelope) = inbox.recv().await {
        let method = envelope["method"].as_str().unwrap_or_default().to_string();
        let params = envelope["params"].clone();

        let Some(token) = envelope["callbackId"].as_str() else {
            info!(%method, "one-way message received");
            continue;
        };

        let response = respond(&method, params);
        let message = json!({ "type": "callback", "callbackId": token, "response": response });
        match bridge.handle_host_message(&message.to_string()) {
            Ok(true) => debug!(%method, "response delivered"),
            Ok(false) => debug!(%method, "response arrived after the call was gone"),
            Err(e) => tracing::error!(%method, error = %e, "failed to route response"),
        }
    }
}

fn respond(method: &str, params: Value) -> Value {
    match method {
        "echo" => json!({ "success": true, "data": params }),
        "version" => json!(env!("CARGO_PKG_VERSION")),
        "fail" => json!({ "success": false, "error": "requested failure" }),
        "silent" => json!({ "success": false }),
        other => json!({ "success": false, "error": format!("unknown method: {other}") }),
    }
}
