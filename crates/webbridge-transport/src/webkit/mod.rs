// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS transport over `window.webkit.messageHandlers.NativeBridge`.
//
// WKWebView serialises posted values itself, so the envelope is handed over
// as a structured JSON value rather than a string.

use std::sync::Arc;

use webbridge_core::error::{BridgeError, Result};
use webbridge_core::{BridgeLogger, OutboundEnvelope};

use crate::traits::{Transport, WebKitMessageHandler};

pub struct WebKitTransport {
    handler: Option<Arc<dyn WebKitMessageHandler>>,
    logger: BridgeLogger,
}

impl WebKitTransport {
    pub fn new(handler: Option<Arc<dyn WebKitMessageHandler>>, logger: BridgeLogger) -> Self {
        Self { handler, logger }
    }
}

impl Transport for WebKitTransport {
    fn name(&self) -> &str {
        "webkit"
    }

    fn is_available(&self) -> bool {
        self.handler.is_some()
    }

    fn post_message(&self, envelope: &OutboundEnvelope) -> Result<()> {
        let Some(handler) = &self.handler else {
            return Err(BridgeError::TransportUnavailable(
                "iOS WebKit bridge not available".into(),
            ));
        };

        let message = serde_json::to_value(envelope)?;
        match handler.post_message(message) {
            Ok(()) => {
                self.logger.debug(format!("iOS message sent: {}", envelope.method));
                Ok(())
            }
            Err(e) => {
                self.logger.error(format!("iOS message send failed: {}", envelope.method), &e);
                Err(match e {
                    BridgeError::TransportSend(_) => e,
                    other => BridgeError::TransportSend(other.to_string()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Value>>,
        fail: bool,
    }

    impl WebKitMessageHandler for Recorder {
        fn post_message(&self, message: Value) -> Result<()> {
            if self.fail {
                return Err(BridgeError::Config("handler detached".into()));
            }
            self.seen.lock().unwrap().push(message);
            Ok(())
        }
    }

    #[test]
    fn posts_structured_envelope() {
        let recorder = Arc::new(Recorder::default());
        let transport = WebKitTransport::new(Some(recorder.clone()), BridgeLogger::default());
        let envelope = OutboundEnvelope::request("scan", json!({"dpi": 300}), "cb_1".into());

        transport.post_message(&envelope).unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[0], json!({"method": "scan", "params": {"dpi": 300}, "callbackId": "cb_1"}));
    }

    #[test]
    fn missing_handler_is_unavailable() {
        let transport = WebKitTransport::new(None, BridgeLogger::default());
        assert!(!transport.is_available());
        let err = transport
            .post_message(&OutboundEnvelope::oneway("ping", Value::Null))
            .unwrap_err();
        assert!(matches!(err, BridgeError::TransportUnavailable(_)));
    }

    #[test]
    fn handler_failure_becomes_send_error() {
        let recorder = Arc::new(Recorder { fail: true, ..Default::default() });
        let transport = WebKitTransport::new(Some(recorder), BridgeLogger::default());
        let err = transport
            .post_message(&OutboundEnvelope::oneway("ping", Value::Null))
            .unwrap_err();
        assert!(matches!(err, BridgeError::TransportSend(ref msg) if msg.contains("handler detached")));
    }
}
