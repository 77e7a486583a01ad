// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android transport over the `window.AndroidBridge` JavaScript interface.
//
// `@JavascriptInterface` methods only accept primitives, so the envelope is
// serialised to a JSON string before it crosses into the JVM.

use std::sync::Arc;

use webbridge_core::error::{BridgeError, Result};
use webbridge_core::{BridgeLogger, OutboundEnvelope};

use crate::traits::{JavascriptInterface, Transport};

pub struct JsInterfaceTransport {
    interface: Option<Arc<dyn JavascriptInterface>>,
    logger: BridgeLogger,
}

impl JsInterfaceTransport {
    pub fn new(interface: Option<Arc<dyn JavascriptInterface>>, logger: BridgeLogger) -> Self {
        Self { interface, logger }
    }
}

impl Transport for JsInterfaceTransport {
    fn name(&self) -> &str {
        "js-interface"
    }

    fn is_available(&self) -> bool {
        self.interface.is_some()
    }

    fn post_message(&self, envelope: &OutboundEnvelope) -> Result<()> {
        let Some(interface) = &self.interface else {
            return Err(BridgeError::TransportUnavailable(
                "Android bridge not available".into(),
            ));
        };

        let json = serde_json::to_string(envelope)?;
        interface.post_message(&json).map_err(|e| {
            self.logger.error(format!("Android message send failed: {}", envelope.method), &e);
            match e {
                BridgeError::TransportSend(_) => e,
                other => BridgeError::TransportSend(other.to_string()),
            }
        })?;

        self.logger.debug(format!("Android message sent: {} ({} bytes)", envelope.method, json.len()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl JavascriptInterface for Recorder {
        fn post_message(&self, json: &str) -> Result<()> {
            self.seen.lock().unwrap().push(json.to_string());
            Ok(())
        }
    }

    struct Broken;

    impl JavascriptInterface for Broken {
        fn post_message(&self, _json: &str) -> Result<()> {
            Err(BridgeError::TransportSend("JVM detached".into()))
        }
    }

    #[test]
    fn posts_json_text() {
        let recorder = Arc::new(Recorder::default());
        let transport = JsInterfaceTransport::new(Some(recorder.clone()), BridgeLogger::default());
        transport
            .post_message(&OutboundEnvelope::oneway("log", json!({"level": "info"})))
            .unwrap();

        let seen = recorder.seen.lock().unwrap();
        let decoded: Value = serde_json::from_str(&seen[0]).unwrap();
        assert_eq!(decoded, json!({"method": "log", "params": {"level": "info"}, "callbackId": null}));
    }

    #[test]
    fn missing_interface_is_unavailable() {
        let transport = JsInterfaceTransport::new(None, BridgeLogger::default());
        assert!(!transport.is_available());
        assert!(matches!(
            transport.post_message(&OutboundEnvelope::oneway("x", Value::Null)),
            Err(BridgeError::TransportUnavailable(_))
        ));
    }

    #[test]
    fn interface_errors_propagate() {
        let transport = JsInterfaceTransport::new(Some(Arc::new(Broken)), BridgeLogger::default());
        let err = transport
            .post_message(&OutboundEnvelope::oneway("x", Value::Null))
            .unwrap_err();
        assert_eq!(err.to_string(), "transport send failed: JVM detached");
    }
}
