// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WebBridge — Script-side runtime: correlates calls with native responses,
// fans native events out to listeners, and owns the bridge lifecycle.

pub mod bridge;
pub mod callbacks;
pub mod events;
pub mod global;

pub use bridge::NativeBridge;
pub use callbacks::{CallbackRegistry, Continuation, Outcome};
pub use events::{EventRegistry, Listener, ListenerResult, listener};
pub use webbridge_core::BridgeLogger;
