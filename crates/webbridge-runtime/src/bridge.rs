// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The bridge: platform detection, transport selection, request/response
// calls, one-way sends, events, and lifecycle.
//
// Outside a native host every `call` resolves with a mock result after a
// short delay, so script code can be developed in a plain browser.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};
use tokio::sync::oneshot;

use webbridge_core::error::{BridgeError, Result};
use webbridge_core::platform::{self, detect};
use webbridge_core::types::normalize_params;
use webbridge_core::{
    BridgeConfig, CorrelationToken, HostMessage, OutboundEnvelope, Platform, PlatformInfo,
    ResponseEnvelope,
};
use webbridge_transport::{HostBindings, Transport, transport_for};

use crate::callbacks::{CallbackRegistry, Outcome};
use crate::events::{EventRegistry, Listener};
use webbridge_core::BridgeLogger;

struct BridgeState {
    initialized: bool,
    platform: Platform,
    transport: Option<Arc<dyn Transport>>,
}

struct BridgeInner {
    config: BridgeConfig,
    bindings: HostBindings,
    logger: BridgeLogger,
    callbacks: CallbackRegistry,
    events: EventRegistry,
    state: Mutex<BridgeState>,
}

/// How a call left `call()` before anything was awaited.
enum Dispatch {
    Mock(Value),
    Failed(BridgeError),
    Pending(CorrelationToken, oneshot::Receiver<Result<Value>>),
}

/// Script-facing handle to the native host.
///
/// Cheap to clone; all clones share one callback registry, one event
/// registry, and one lifecycle.
#[derive(Clone)]
pub struct NativeBridge {
    inner: Arc<BridgeInner>,
}

impl NativeBridge {
    /// Build and initialise a bridge for the given host.
    pub fn new(config: BridgeConfig, bindings: HostBindings) -> Self {
        let logger = BridgeLogger::new(&config.log_prefix, config.log_enabled);
        let bridge = Self {
            inner: Arc::new(BridgeInner {
                callbacks: CallbackRegistry::new(config.timeout_policy, logger.clone()),
                events: EventRegistry::new(logger.clone()),
                logger,
                bindings,
                config,
                state: Mutex::new(BridgeState {
                    initialized: false,
                    platform: Platform::Headless,
                    transport: None,
                }),
            }),
        };
        bridge.init();
        bridge
    }

    pub fn with_defaults(bindings: HostBindings) -> Self {
        Self::new(BridgeConfig::default(), bindings)
    }

    fn state(&self) -> MutexGuard<'_, BridgeState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Detect the platform and pick a transport. No-op when already
    /// initialised; after `destroy` it starts from scratch.
    pub fn init(&self) {
        let (platform, transport_name) = {
            let mut state = self.state();
            if state.initialized {
                return;
            }
            state.platform = detect(&self.inner.bindings.environment());
            state.transport = transport_for(state.platform, &self.inner.bindings, &self.inner.logger);
            state.initialized = true;
            (
                state.platform,
                state.transport.as_ref().map(|t| t.name().to_string()),
            )
        };

        self.inner.logger.log(format!(
            "Initialized platform={platform} native={} transport={}",
            platform.is_native(),
            transport_name.as_deref().unwrap_or("none"),
        ));
    }

    pub fn is_initialized(&self) -> bool {
        self.state().initialized
    }

    /// Invoke `method` on the native host and wait for its response.
    ///
    /// The envelope is posted before this returns; the future only waits
    /// for the outcome. A transport failure is reported immediately and
    /// leaves nothing pending.
    pub fn call(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value>> + Send + 'static {
        let dispatch = self.dispatch(method.to_string(), normalize_params(params));
        let mock_delay = self.inner.config.mock_delay();

        async move {
            match dispatch {
                Dispatch::Mock(value) => {
                    tokio::time::sleep(mock_delay).await;
                    Ok(value)
                }
                Dispatch::Failed(e) => Err(e),
                Dispatch::Pending(token, rx) => match rx.await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(BridgeError::Cancelled(token.to_string())),
                },
            }
        }
    }

    fn dispatch(&self, method: String, params: Value) -> Dispatch {
        let (initialized, platform, transport) = {
            let state = self.state();
            (state.initialized, state.platform, state.transport.clone())
        };

        if !initialized {
            return Dispatch::Failed(BridgeError::NotInitialized);
        }

        if !platform.is_native() {
            self.inner.logger.warn(format!("Not in native environment: {method}"));
            return Dispatch::Mock(json!({ "mock": true, "method": method, "params": params }));
        }

        let transport = match transport {
            Some(t) if t.is_available() => t,
            _ => {
                let err = BridgeError::TransportUnavailable(format!("no transport for {platform}"));
                self.inner.logger.error(format!("Call failed: {method}"), &err);
                return Dispatch::Failed(err);
            }
        };

        let callbacks = &self.inner.callbacks;
        let token = callbacks.generate_token();
        let (tx, rx) = oneshot::channel();

        let logger = self.inner.logger.clone();
        let callback_method = method.clone();
        callbacks.register(
            token.clone(),
            Box::new(move |outcome: Outcome| {
                logger.log(format!("Callback: {callback_method}"));
                let result = outcome.and_then(|response| ResponseEnvelope::classify(response).into_result());
                // The caller may have dropped its future; nothing to deliver to.
                let _ = tx.send(result);
            }),
            self.inner.config.call_timeout(),
        );

        self.inner.logger.log(format!("Call: {method} ({token})"));
        let envelope = OutboundEnvelope::request(method, params, token.clone());
        if let Err(e) = transport.post_message(&envelope) {
            self.inner.logger.error(format!("Send failed: {}", envelope.method), &e);
            callbacks.remove(&token);
            return Dispatch::Failed(e);
        }

        // A `destroy` that ran between the state check and `register` has
        // already cleared the registry; this entry would outlive it.
        if !self.state().initialized {
            callbacks.remove(&token);
            self.inner.logger.warn(format!("Bridge destroyed during call: {}", envelope.method));
            return Dispatch::Failed(BridgeError::NotInitialized);
        }

        Dispatch::Pending(token, rx)
    }

    /// Fire-and-forget message. Failures are logged, never returned.
    pub fn send(&self, method: &str, data: Value) {
        let (initialized, platform, transport) = {
            let state = self.state();
            (state.initialized, state.platform, state.transport.clone())
        };

        if !initialized {
            self.inner.logger.warn(format!("Not initialized: {method}"));
            return;
        }

        if !platform.is_native() {
            self.inner.logger.warn(format!("Not in native environment: {method}"));
            return;
        }

        let Some(transport) = transport else {
            self.inner.logger.error(
                format!("Send failed: {method}"),
                BridgeError::TransportUnavailable(platform.to_string()),
            );
            return;
        };

        self.inner.logger.log(format!("Send: {method}"));
        let envelope = OutboundEnvelope::oneway(method, data);
        if let Err(e) = transport.post_message(&envelope) {
            self.inner.logger.error(format!("Send failed: {method}"), e);
        }
    }

    /// Entry point for the host: deliver the response for `token`.
    pub fn resolve(&self, token: impl Into<CorrelationToken>, response: Value) -> bool {
        self.inner.callbacks.resolve(&token.into(), response)
    }

    /// Entry point for the host: route a raw JSON message.
    ///
    /// Returns whether anything consumed it (a pending call, or at least one
    /// listener).
    pub fn handle_host_message(&self, json: &str) -> Result<bool> {
        match HostMessage::from_json(json)? {
            HostMessage::Callback { token, response } => Ok(self.inner.callbacks.resolve(&token, response)),
            HostMessage::Event { event, data } => Ok(self.emit(&event, &data) > 0),
        }
    }

    pub fn on(&self, event: &str, listener: Listener) {
        self.inner.events.on(event, listener);
    }

    pub fn off(&self, event: &str, listener: Option<&Listener>) -> usize {
        self.inner.events.off(event, listener)
    }

    pub fn emit(&self, event: &str, data: &Value) -> usize {
        self.inner.events.emit(event, data)
    }

    pub fn is_native(&self) -> bool {
        platform::is_native(self.platform())
    }

    pub fn platform(&self) -> Platform {
        self.state().platform
    }

    pub fn platform_info(&self) -> PlatformInfo {
        PlatformInfo::new(self.platform(), self.inner.bindings.user_agent.as_deref())
    }

    pub fn set_log_enabled(&self, enabled: bool) {
        self.inner.logger.set_enabled(enabled);
    }

    pub fn is_log_enabled(&self) -> bool {
        self.inner.logger.is_enabled()
    }

    /// Number of calls still waiting for the host.
    pub fn pending_calls(&self) -> usize {
        self.inner.callbacks.count()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// Mark the bridge uninitialised, then abandon every pending call and
    /// drop every listener. Abandoned calls resolve with
    /// `BridgeError::Cancelled`.
    pub fn destroy(&self) {
        {
            let mut state = self.state();
            state.initialized = false;
            state.transport = None;
        }
        let abandoned = self.inner.callbacks.clear();
        self.inner.events.clear();
        self.inner.logger.log(format!("Destroyed ({abandoned} pending calls abandoned)"));
    }
}
