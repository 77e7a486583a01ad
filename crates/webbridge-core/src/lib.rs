// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WebBridge — Core types, errors, configuration, and platform detection
// shared across all crates.

pub mod config;
pub mod error;
pub mod logger;
pub mod platform;
pub mod types;

pub use config::{BridgeConfig, TimeoutPolicy};
pub use error::BridgeError;
pub use logger::BridgeLogger;
pub use platform::HostEnvironment;
pub use types::*;
