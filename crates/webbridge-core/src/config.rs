// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// What happens to a pending call when its timeout fires first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutPolicy {
    /// Evict and fail the caller with `BridgeError::Timeout`.
    #[default]
    Reject,
    /// Evict silently; the caller's continuation is dropped uninvoked.
    Drop,
}

/// Runtime settings for a bridge instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// How long a native call may stay pending (0 disables eviction).
    pub call_timeout_ms: u64,
    /// Delay before a mock result is returned outside a native host.
    pub mock_delay_ms: u64,
    /// Behaviour when a pending call times out.
    pub timeout_policy: TimeoutPolicy,
    /// Whether the bridge logger emits anything at start-up.
    pub log_enabled: bool,
    /// Component prefix attached to every bridge log line.
    pub log_prefix: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 10_000,
            mock_delay_ms: 100,
            timeout_policy: TimeoutPolicy::Reject,
            log_enabled: true,
            log_prefix: "NativeBridge".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    /// Write this config as pretty JSON.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_prefix.trim().is_empty() {
            return Err(BridgeError::Config("log_prefix must not be empty".into()));
        }
        Ok(())
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_historical_behaviour() {
        let config = BridgeConfig::default();
        assert_eq!(config.call_timeout(), Duration::from_secs(10));
        assert_eq!(config.mock_delay(), Duration::from_millis(100));
        assert_eq!(config.timeout_policy, TimeoutPolicy::Reject);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = BridgeConfig::from_json(r#"{"timeout_policy":"drop","call_timeout_ms":500}"#)
            .unwrap();
        assert_eq!(config.timeout_policy, TimeoutPolicy::Drop);
        assert_eq!(config.call_timeout_ms, 500);
        assert_eq!(config.mock_delay_ms, 100);
        assert_eq!(config.log_prefix, "NativeBridge");
    }

    #[test]
    fn blank_prefix_is_rejected() {
        let err = BridgeConfig::from_json(r#"{"log_prefix":"  "}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.json");
        let config = BridgeConfig {
            mock_delay_ms: 5,
            log_enabled: false,
            ..Default::default()
        };
        config.persist(&path).unwrap();
        assert_eq!(BridgeConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BridgeConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }
}
