// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide bridge instance.
//
// The bridge is still built explicitly by the embedder; this only gives
// script-side code that cannot thread a handle through one well-known place
// to find it.

use std::sync::OnceLock;

use webbridge_core::error::{BridgeError, Result};

use crate::bridge::NativeBridge;

static INSTANCE: OnceLock<NativeBridge> = OnceLock::new();

/// Publish `bridge` as the process-wide instance. Only the first install
/// wins; later attempts are rejected.
pub fn install(bridge: NativeBridge) -> Result<&'static NativeBridge> {
    INSTANCE
        .set(bridge)
        .map_err(|_| BridgeError::Config("a process-wide bridge is already installed".into()))?;
    instance().ok_or(BridgeError::NotInitialized)
}

/// The installed bridge, if any.
pub fn instance() -> Option<&'static NativeBridge> {
    INSTANCE.get()
}
