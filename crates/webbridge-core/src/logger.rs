// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Switchable log sink for the bridge.
//
// Everything goes through `tracing`; the sink only adds a component prefix
// and a runtime on/off switch that script code can flip.

use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct BridgeLogger {
    prefix: Arc<str>,
    enabled: Arc<AtomicBool>,
}

impl BridgeLogger {
    pub fn new(prefix: &str, enabled: bool) -> Self {
        Self {
            prefix: Arc::from(prefix),
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn debug(&self, message: impl Display) {
        if self.is_enabled() {
            debug!(component = %self.prefix, "{message}");
        }
    }

    pub fn log(&self, message: impl Display) {
        if self.is_enabled() {
            info!(component = %self.prefix, "{message}");
        }
    }

    pub fn warn(&self, message: impl Display) {
        if self.is_enabled() {
            warn!(component = %self.prefix, "{message}");
        }
    }

    pub fn error(&self, message: impl Display, cause: impl Display) {
        if self.is_enabled() {
            error!(component = %self.prefix, error = %cause, "{message}");
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for BridgeLogger {
    fn default() -> Self {
        Self::new("NativeBridge", true)
    }
}
