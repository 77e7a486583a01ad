// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WebBridge — One-way transports from script to the native host.
//
// Each transport wraps a handle the embedder injects (the WKWebView message
// handler on iOS, the `@JavascriptInterface` object on Android). The runtime
// only ever sees the `Transport` trait.

use std::sync::Arc;

use webbridge_core::{BridgeLogger, HostEnvironment, Platform};

pub mod js_interface;
pub mod traits;
pub mod webkit;

pub use js_interface::JsInterfaceTransport;
pub use traits::{JavascriptInterface, Transport, WebKitMessageHandler};
pub use webkit::WebKitTransport;

/// Everything the embedder hands the bridge at construction time.
#[derive(Clone, Default)]
pub struct HostBindings {
    /// A windowing/document context exists.
    pub has_window: bool,
    /// Browser user-agent string.
    pub user_agent: Option<String>,
    /// iOS `window.webkit.messageHandlers.NativeBridge`.
    pub webkit_handler: Option<Arc<dyn WebKitMessageHandler>>,
    /// Android `window.AndroidBridge`.
    pub js_interface: Option<Arc<dyn JavascriptInterface>>,
}

impl HostBindings {
    pub fn headless() -> Self {
        Self::default()
    }

    pub fn browser(user_agent: impl Into<String>) -> Self {
        Self {
            has_window: true,
            user_agent: Some(user_agent.into()),
            ..Self::default()
        }
    }

    pub fn with_webkit_handler(mut self, handler: Arc<dyn WebKitMessageHandler>) -> Self {
        self.has_window = true;
        self.webkit_handler = Some(handler);
        self
    }

    pub fn with_js_interface(mut self, interface: Arc<dyn JavascriptInterface>) -> Self {
        self.has_window = true;
        self.js_interface = Some(interface);
        self
    }

    /// Presence probes for platform detection.
    pub fn environment(&self) -> HostEnvironment {
        HostEnvironment {
            has_window: self.has_window,
            has_webkit_handler: self.webkit_handler.is_some(),
            has_js_interface: self.js_interface.is_some(),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl std::fmt::Debug for HostBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBindings")
            .field("has_window", &self.has_window)
            .field("user_agent", &self.user_agent)
            .field("webkit_handler", &self.webkit_handler.is_some())
            .field("js_interface", &self.js_interface.is_some())
            .finish()
    }
}

/// Select the transport for a detected platform.
///
/// Only the two native platforms have a transport; browsers and headless
/// hosts get `None` and the bridge falls back to mock responses. The
/// transport logs through `logger`, so it goes quiet with the bridge.
pub fn transport_for(
    platform: Platform,
    bindings: &HostBindings,
    logger: &BridgeLogger,
) -> Option<Arc<dyn Transport>> {
    match platform {
        Platform::NativeIos => Some(Arc::new(WebKitTransport::new(
            bindings.webkit_handler.clone(),
            logger.clone(),
        ))),
        Platform::NativeAndroid => Some(Arc::new(JsInterfaceTransport::new(
            bindings.js_interface.clone(),
            logger.clone(),
        ))),
        Platform::IosBrowser | Platform::AndroidBrowser | Platform::Browser | Platform::Headless => {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webbridge_core::error::Result;
    use webbridge_core::platform::detect;

    struct Sink;

    impl WebKitMessageHandler for Sink {
        fn post_message(&self, _message: serde_json::Value) -> Result<()> {
            Ok(())
        }
    }

    impl JavascriptInterface for Sink {
        fn post_message(&self, _json: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bindings_feed_detection() {
        let bindings = HostBindings::browser("Mozilla/5.0").with_webkit_handler(Arc::new(Sink));
        assert_eq!(detect(&bindings.environment()), Platform::NativeIos);

        let bindings = HostBindings::browser("Mozilla/5.0").with_js_interface(Arc::new(Sink));
        assert_eq!(detect(&bindings.environment()), Platform::NativeAndroid);

        assert_eq!(detect(&HostBindings::headless().environment()), Platform::Headless);
    }

    #[test]
    fn only_native_platforms_get_a_transport() {
        let bindings = HostBindings::browser("x")
            .with_webkit_handler(Arc::new(Sink))
            .with_js_interface(Arc::new(Sink));
        let logger = BridgeLogger::default();

        let ios = transport_for(Platform::NativeIos, &bindings, &logger).unwrap();
        assert_eq!(ios.name(), "webkit");
        assert!(ios.is_available());

        let android = transport_for(Platform::NativeAndroid, &bindings, &logger).unwrap();
        assert_eq!(android.name(), "js-interface");

        for platform in [Platform::Browser, Platform::IosBrowser, Platform::AndroidBrowser, Platform::Headless] {
            assert!(transport_for(platform, &bindings, &logger).is_none());
        }
    }

    #[test]
    fn debug_hides_handles() {
        let bindings = HostBindings::headless().with_js_interface(Arc::new(Sink));
        let text = format!("{bindings:?}");
        assert!(text.contains("js_interface: true"));
    }
}
