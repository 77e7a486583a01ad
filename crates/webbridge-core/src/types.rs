// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the bridge: platform tags, correlation tokens, and
// the envelopes exchanged across the script/native boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};

/// Message returned to callers when the host rejects without a reason.
pub const DEFAULT_REMOTE_ERROR: &str = "Unknown error";

/// Hosting environment a bridge instance is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// WKWebView with the bridge message handler injected.
    NativeIos,
    /// Android WebView with the bridge JavaScript interface injected.
    NativeAndroid,
    /// Plain Safari / in-app browser on iOS.
    IosBrowser,
    /// Plain Chrome / in-app browser on Android.
    AndroidBrowser,
    /// Any other browser.
    Browser,
    /// No windowing context at all (tests, server-side tooling).
    Headless,
}

impl Platform {
    /// Wire tag for this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NativeIos => "native-ios",
            Self::NativeAndroid => "native-android",
            Self::IosBrowser => "ios-browser",
            Self::AndroidBrowser => "android-browser",
            Self::Browser => "browser",
            Self::Headless => "headless",
        }
    }

    /// Whether a native host transport is expected on this platform.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::NativeIos | Self::NativeAndroid)
    }

    /// Whether this is a plain browser with no native host.
    pub fn is_browser(&self) -> bool {
        matches!(self, Self::IosBrowser | Self::AndroidBrowser | Self::Browser)
    }

    /// All platform tags, in detection order.
    pub fn all() -> [Platform; 6] {
        [
            Self::Headless,
            Self::NativeIos,
            Self::NativeAndroid,
            Self::IosBrowser,
            Self::AndroidBrowser,
            Self::Browser,
        ]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the detected platform, as reported to script code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    #[serde(rename = "type")]
    pub platform: Platform,
    pub is_native: bool,
    pub is_browser: bool,
    pub user_agent: String,
}

impl PlatformInfo {
    pub fn new(platform: Platform, user_agent: Option<&str>) -> Self {
        Self {
            platform,
            is_native: platform.is_native(),
            is_browser: platform.is_browser(),
            user_agent: user_agent.unwrap_or("N/A").to_string(),
        }
    }
}

/// Opaque identifier linking an outbound call to its native response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationToken(String);

impl CorrelationToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CorrelationToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CorrelationToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload posted from script to the native host.
///
/// `token` is serialised as `callbackId`; `null` marks a fire-and-forget
/// message that expects no response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEnvelope {
    pub method: String,
    pub params: Value,
    #[serde(rename = "callbackId")]
    pub token: Option<CorrelationToken>,
}

impl OutboundEnvelope {
    /// Envelope for a request that expects a response.
    pub fn request(method: impl Into<String>, params: Value, token: CorrelationToken) -> Self {
        Self {
            method: method.into(),
            params: normalize_params(params),
            token: Some(token),
        }
    }

    /// Envelope for a one-way message.
    pub fn oneway(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params: normalize_params(params),
            token: None,
        }
    }

    pub fn expects_response(&self) -> bool {
        self.token.is_some()
    }
}

/// Missing params are sent as an empty object, never as `null`.
pub fn normalize_params(params: Value) -> Value {
    if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    }
}

/// Native-side response, classified by its `success` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// `{success: true, data}`; falsy data (absent, `null`, `false`, `0`,
    /// `""`) becomes `{}`.
    Success(Value),
    /// `{success: false, error}`.
    Failure(String),
    /// Any other shape, passed through untouched.
    Raw(Value),
}

impl ResponseEnvelope {
    pub fn classify(response: Value) -> Self {
        let success = match &response {
            Value::Object(map) => map.get("success").and_then(Value::as_bool),
            _ => None,
        };

        match (success, response) {
            (Some(true), Value::Object(mut map)) => {
                let data = match map.remove("data") {
                    Some(data) if !is_falsy(&data) => data,
                    _ => Value::Object(Default::default()),
                };
                Self::Success(data)
            }
            (Some(false), Value::Object(map)) => Self::Failure(error_message(map.get("error"))),
            (_, other) => Self::Raw(other),
        }
    }

    /// Map the envelope onto the caller-visible outcome.
    pub fn into_result(self) -> Result<Value> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(message) => Err(BridgeError::Remote(message)),
            Self::Raw(value) => Ok(value),
        }
    }
}

/// Script truthiness for JSON values: `null`, `false`, `0` and `""` are falsy.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn error_message(error: Option<&Value>) -> String {
    match error {
        None => DEFAULT_REMOTE_ERROR.to_string(),
        Some(value) if is_falsy(value) => DEFAULT_REMOTE_ERROR.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Message pushed from the native host into script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostMessage {
    /// Response to a previous `call`.
    Callback {
        #[serde(rename = "callbackId")]
        token: CorrelationToken,
        #[serde(default)]
        response: Value,
    },
    /// Event broadcast to script listeners.
    Event {
        event: String,
        #[serde(default)]
        data: Value,
    },
}

impl HostMessage {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
