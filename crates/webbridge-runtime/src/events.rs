// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Event subscriptions: event name → listeners in registration order.
//
// `emit` works on a snapshot taken under the lock, so listeners may freely
// call `on`/`off`/`emit` themselves. A failing or panicking listener is
// logged and skipped; it never stops the ones after it.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use webbridge_core::BridgeLogger;

/// What a listener reports back to the registry.
pub type ListenerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Event callback. Identity (for `off`) is the `Arc` allocation.
pub type Listener = Arc<dyn Fn(&Value) -> ListenerResult + Send + Sync>;

/// Wrap a closure as a `Listener`.
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&Value) -> ListenerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

type HandlerMap = HashMap<String, Vec<Listener>>;

pub struct EventRegistry {
    handlers: Mutex<HandlerMap>,
    logger: BridgeLogger,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new(BridgeLogger::default())
    }
}

impl EventRegistry {
    pub fn new(logger: BridgeLogger) -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
            logger,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HandlerMap> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `listener` to the sequence for `name`. Any name is accepted.
    pub fn on(&self, name: &str, listener: Listener) {
        self.lock().entry(name.to_string()).or_default().push(listener);
        self.logger.log(format!("Listen: {name}"));
    }

    /// Remove one listener (by identity) or, with `None`, all of them.
    ///
    /// Returns how many listeners were removed.
    pub fn off(&self, name: &str, listener: Option<&Listener>) -> usize {
        let removed = {
            let mut handlers = self.lock();
            match listener {
                None => handlers.remove(name).map_or(0, |list| list.len()),
                Some(target) => {
                    let Some(list) = handlers.get_mut(name) else {
                        return 0;
                    };
                    let removed = match list.iter().position(|l| Arc::ptr_eq(l, target)) {
                        Some(index) => {
                            list.remove(index);
                            1
                        }
                        None => 0,
                    };
                    if list.is_empty() {
                        handlers.remove(name);
                    }
                    removed
                }
            }
        };

        self.logger.log(format!("Unlisten: {name}"));
        removed
    }

    /// Invoke every listener for `name` with `data`, in registration order.
    ///
    /// Returns the number of listeners that were invoked (including ones
    /// that failed).
    pub fn emit(&self, name: &str, data: &Value) -> usize {
        let snapshot: Vec<Listener> = self.lock().get(name).cloned().unwrap_or_default();

        if snapshot.is_empty() {
            self.logger.warn(format!("No listeners for: {name}"));
            return 0;
        }

        self.logger.log(format!("Emit: {name}"));

        for listener in &snapshot {
            match catch_unwind(AssertUnwindSafe(|| listener(data))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.logger.error(format!("Event handler error: {name}"), e);
                }
                Err(panic) => {
                    let cause = panic_message(panic.as_ref());
                    self.logger.error(format!("Event handler panicked: {name}"), cause);
                }
            }
        }
        snapshot.len()
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.lock().get(name).map_or(0, Vec::len)
    }

    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop every listener for every event.
    pub fn clear(&self) {
        let dropped = std::mem::take(&mut *self.lock());
        drop(dropped);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
