// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for script → native transports.

use serde_json::Value;
use webbridge_core::error::Result;
use webbridge_core::OutboundEnvelope;

/// One-way channel from script to the native host.
///
/// Implementations must report every delivery failure; a transport that
/// swallows errors would leave callers waiting for a response that can
/// never arrive.
pub trait Transport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether the underlying host handle is present. Pure.
    fn is_available(&self) -> bool;

    /// Deliver an envelope to the host.
    fn post_message(&self, envelope: &OutboundEnvelope) -> Result<()>;
}

/// Host-injected WKScriptMessageHandler. Receives structured values.
pub trait WebKitMessageHandler: Send + Sync {
    fn post_message(&self, message: Value) -> Result<()>;
}

/// Host-injected Android `@JavascriptInterface` object. Receives JSON text.
pub trait JavascriptInterface: Send + Sync {
    fn post_message(&self, json: &str) -> Result<()>;
}
