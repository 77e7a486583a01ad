// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pending-call registry: correlation tokens → continuations.
//
// Every entry leaves the map exactly once, through `resolve`, `remove`,
// `clear`, or its timeout. Removal always happens under the lock and the
// continuation always runs after the lock is released, so whichever path
// removes the entry first is the only one that can invoke it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use uuid::Uuid;

use webbridge_core::error::{BridgeError, Result};
use webbridge_core::{BridgeLogger, CorrelationToken, TimeoutPolicy};

/// What a continuation receives: the raw host response, or why none came.
pub type Outcome = Result<Value>;

/// Deferred success/failure handler for one pending call.
pub type Continuation = Box<dyn FnOnce(Outcome) + Send + 'static>;

/// Length of the random suffix appended to every token.
const TOKEN_SUFFIX_LEN: usize = 9;

struct PendingCall {
    continuation: Continuation,
    registered_at: Instant,
    /// Distinguishes re-registrations of the same token.
    seq: u64,
    timeout: Option<AbortHandle>,
}

impl PendingCall {
    fn cancel_timeout(&self) {
        if let Some(handle) = &self.timeout {
            handle.abort();
        }
    }
}

struct Inner {
    pending: Mutex<HashMap<CorrelationToken, PendingCall>>,
    next_id: AtomicU64,
    next_seq: AtomicU64,
    policy: TimeoutPolicy,
    logger: BridgeLogger,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, HashMap<CorrelationToken, PendingCall>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expire(&self, token: &CorrelationToken, seq: u64, timeout: Duration) {
        let entry = {
            let mut pending = self.lock();
            let current = pending.get(token).is_some_and(|call| call.seq == seq);
            if current { pending.remove(token) } else { None }
        };

        let Some(call) = entry else { return };
        let waited = call.registered_at.elapsed();
        let timeout_ms = timeout.as_millis() as u64;

        match self.policy {
            TimeoutPolicy::Reject => {
                self.logger.warn(format!(
                    "Callback timed out: {token} ({timeout_ms}ms, waited {}ms)",
                    waited.as_millis()
                ));
                (call.continuation)(Err(BridgeError::Timeout {
                    token: token.to_string(),
                    timeout_ms,
                }));
            }
            TimeoutPolicy::Drop => {
                self.logger.warn(format!(
                    "Callback timed out, dropped without response: {token} ({timeout_ms}ms)"
                ));
            }
        }
    }
}

/// Owns every in-flight call of one bridge instance.
///
/// Cloning is cheap and clones share the same map.
#[derive(Clone)]
pub struct CallbackRegistry {
    inner: Arc<Inner>,
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new(TimeoutPolicy::default(), BridgeLogger::default())
    }
}

impl CallbackRegistry {
    /// Timeout and re-registration warnings go through `logger`, so they
    /// follow the owning bridge's on/off switch.
    pub fn new(policy: TimeoutPolicy, logger: BridgeLogger) -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                next_seq: AtomicU64::new(0),
                policy,
                logger,
            }),
        }
    }

    pub fn policy(&self) -> TimeoutPolicy {
        self.inner.policy
    }

    /// Issue a fresh token: `cb_<unix-millis>_<counter>_<random>`.
    ///
    /// The counter alone makes tokens unique within this registry; the
    /// timestamp and random suffix keep them apart across page reloads.
    pub fn generate_token(&self) -> CorrelationToken {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let timestamp = Utc::now().timestamp_millis();
        let random = Uuid::new_v4().simple().to_string();
        CorrelationToken::from(format!("cb_{timestamp}_{id}_{}", &random[..TOKEN_SUFFIX_LEN]))
    }

    /// Store a continuation under `token`.
    ///
    /// A non-zero `timeout` schedules eviction on the ambient tokio runtime.
    /// Re-registering a live token replaces (and drops) the old entry.
    pub fn register(&self, token: CorrelationToken, continuation: Continuation, timeout: Duration) {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);

        let replaced = {
            let mut pending = self.inner.lock();
            let timeout_handle = if timeout.is_zero() {
                None
            } else {
                self.schedule_eviction(token.clone(), seq, timeout)
            };
            pending.insert(
                token.clone(),
                PendingCall {
                    continuation,
                    registered_at: Instant::now(),
                    seq,
                    timeout: timeout_handle,
                },
            )
        };

        if let Some(old) = replaced {
            self.inner
                .logger
                .warn(format!("Token re-registered, previous continuation dropped: {token}"));
            old.cancel_timeout();
        }
        self.inner
            .logger
            .debug(format!("Callback registered: {token} ({}ms)", timeout.as_millis()));
    }

    fn schedule_eviction(
        &self,
        token: CorrelationToken,
        seq: u64,
        timeout: Duration,
    ) -> Option<AbortHandle> {
        let Ok(runtime) = Handle::try_current() else {
            self.inner
                .logger
                .warn(format!("No async runtime, callback timeout not scheduled: {token}"));
            return None;
        };

        let registry: Weak<Inner> = Arc::downgrade(&self.inner);
        let task = runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(inner) = registry.upgrade() {
                inner.expire(&token, seq, timeout);
            }
        });
        Some(task.abort_handle())
    }

    /// Hand `response` to the continuation for `token`, if still pending.
    ///
    /// Returns `false` for unknown, already-resolved, or evicted tokens; in
    /// that case nothing is invoked.
    pub fn resolve(&self, token: &CorrelationToken, response: Value) -> bool {
        let entry = self.inner.lock().remove(token);
        match entry {
            Some(call) => {
                call.cancel_timeout();
                self.inner.logger.debug(format!(
                    "Callback resolved: {token} after {}ms",
                    call.registered_at.elapsed().as_millis()
                ));
                (call.continuation)(Ok(response));
                true
            }
            None => {
                self.inner.logger.debug(format!("No pending callback for: {token}"));
                false
            }
        }
    }

    /// Drop the entry for `token` without invoking it. Idempotent.
    pub fn remove(&self, token: &CorrelationToken) -> bool {
        let entry = self.inner.lock().remove(token);
        match entry {
            Some(call) => {
                call.cancel_timeout();
                true
            }
            None => false,
        }
    }

    /// Drop every pending entry without invoking any of them.
    pub fn clear(&self) -> usize {
        let drained: Vec<PendingCall> = {
            let mut pending = self.inner.lock();
            pending.drain().map(|(_, call)| call).collect()
        };
        for call in &drained {
            call.cancel_timeout();
        }
        let cleared = drained.len();
        if cleared > 0 {
            self.inner.logger.debug(format!("Pending callbacks cleared: {cleared}"));
        }
        cleared
    }

    pub fn count(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn contains(&self, token: &CorrelationToken) -> bool {
        self.inner.lock().contains_key(token)
    }
}
