// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the bridge.

use thiserror::Error;

/// Top-level error type for all bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Transport errors --
    #[error("transport not available: {0}")]
    TransportUnavailable(String),

    #[error("transport send failed: {0}")]
    TransportSend(String),

    // -- Call outcomes --
    #[error("{0}")]
    Remote(String),

    #[error("call {token} timed out after {timeout_ms}ms")]
    Timeout { token: String, timeout_ms: u64 },

    #[error("call {0} was abandoned before the host responded")]
    Cancelled(String),

    #[error("bridge is not initialised")]
    NotInitialized,

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// True for errors produced by the native side rather than by the bridge.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;
