// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform detection from host-supplied environment probes.
//
// Detection is a pure function of `HostEnvironment`. The embedder fills the
// probes in once at start-up; anything it leaves out is treated as absent.

use serde::{Deserialize, Serialize};

use crate::types::{Platform, PlatformInfo};

/// Ambient facts about the host the bridge was loaded into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostEnvironment {
    /// A windowing/document context exists.
    pub has_window: bool,
    /// The WebKit `messageHandlers.NativeBridge` handler was injected.
    pub has_webkit_handler: bool,
    /// The Android `AndroidBridge` JavaScript interface was injected.
    pub has_js_interface: bool,
    /// Browser user-agent string, if one could be read.
    pub user_agent: Option<String>,
}

impl HostEnvironment {
    /// Environment with no window at all.
    pub fn headless() -> Self {
        Self::default()
    }

    /// Plain browser window with the given user agent.
    pub fn browser(user_agent: impl Into<String>) -> Self {
        Self {
            has_window: true,
            user_agent: Some(user_agent.into()),
            ..Self::default()
        }
    }

    pub fn with_webkit_handler(mut self) -> Self {
        self.has_window = true;
        self.has_webkit_handler = true;
        self
    }

    pub fn with_js_interface(mut self) -> Self {
        self.has_window = true;
        self.has_js_interface = true;
        self
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

/// Classify the environment. First match wins.
pub fn detect(env: &HostEnvironment) -> Platform {
    if !env.has_window {
        return Platform::Headless;
    }
    if env.has_webkit_handler {
        return Platform::NativeIos;
    }
    if env.has_js_interface {
        return Platform::NativeAndroid;
    }

    let ua = env.user_agent().unwrap_or_default().to_ascii_lowercase();
    if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") {
        return Platform::IosBrowser;
    }
    if ua.contains("android") {
        return Platform::AndroidBrowser;
    }
    Platform::Browser
}

pub fn is_native(platform: Platform) -> bool {
    platform.is_native()
}

/// Platform summary for the given environment.
pub fn platform_info(platform: Platform, env: &HostEnvironment) -> PlatformInfo {
    PlatformInfo::new(platform, env.user_agent())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0";
    const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/121.0";

    #[test]
    fn no_window_is_headless() {
        assert_eq!(detect(&HostEnvironment::headless()), Platform::Headless);

        // Injected handles without a window still count as headless.
        let env = HostEnvironment {
            has_webkit_handler: true,
            ..Default::default()
        };
        assert_eq!(detect(&env), Platform::Headless);
    }

    #[test]
    fn injected_handles_win_over_user_agent() {
        let ios = HostEnvironment::browser(ANDROID_UA).with_webkit_handler();
        assert_eq!(detect(&ios), Platform::NativeIos);

        let android = HostEnvironment::browser(IPHONE_UA).with_js_interface();
        assert_eq!(detect(&android), Platform::NativeAndroid);

        let both = HostEnvironment::browser(DESKTOP_UA)
            .with_js_interface()
            .with_webkit_handler();
        assert_eq!(detect(&both), Platform::NativeIos);
    }

    #[test]
    fn user_agent_classifies_browsers() {
        assert_eq!(detect(&HostEnvironment::browser(IPHONE_UA)), Platform::IosBrowser);
        assert_eq!(detect(&HostEnvironment::browser("Mozilla/5.0 (iPad; CPU OS 16_0)")), Platform::IosBrowser);
        assert_eq!(detect(&HostEnvironment::browser(ANDROID_UA)), Platform::AndroidBrowser);
        assert_eq!(detect(&HostEnvironment::browser(DESKTOP_UA)), Platform::Browser);
    }

    #[test]
    fn missing_user_agent_is_plain_browser() {
        let env = HostEnvironment {
            has_window: true,
            ..Default::default()
        };
        assert_eq!(detect(&env), Platform::Browser);
        assert_eq!(platform_info(Platform::Browser, &env).user_agent, "N/A");
    }

    #[test]
    fn partial_probe_json_is_accepted() {
        let env: HostEnvironment = serde_json::from_str(r#"{"has_window":true}"#).unwrap();
        assert_eq!(detect(&env), Platform::Browser);
    }

    #[test]
    fn info_reports_native_flag() {
        let env = HostEnvironment::browser(IPHONE_UA).with_webkit_handler();
        let info = platform_info(detect(&env), &env);
        assert!(info.is_native);
        assert!(!info.is_browser);
        assert_eq!(info.user_agent, IPHONE_UA);
        assert!(is_native(info.platform));
    }
}
