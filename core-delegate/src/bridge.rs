//! # Delegate Resolution Bridge
//!
//! Turns a blocking native lifecycle callback into an awaited application
//! handler and reports exactly one completion code back to the engine.
//!
//! ## Dispatch
//!
//! ```text
//! native invocation ──> in-flight guard ──> publish notification
//!                                          │
//!                                          v
//!                        capture handler from registry
//!                                          │
//!                  none ──> 0              v
//!                              run handler (optional deadline)
//!                                          │
//!                                          v
//!                      Ok ──> 0 · Code(c) ──> c · other ──> -1
//!                                          │
//!                                          v
//!                          DelegateResolver::resolve(kind, code)
//! ```
//!
//! Each kind is an independent `Idle → Dispatched → Resolved` machine. The
//! engine never overlaps invocations of one kind; if it does anyway the
//! second dispatch fails with [`DelegateError::InvocationPending`] and no
//! resolve call is made for it.
//!
//! Handler failures stop here. They become a code and are not logged.

use crate::error::{DelegateError, Result};
use crate::handler::{completion_code, LifecycleHandler};
use crate::registry::HandlerRegistry;
use bridge_traits::{CompletionCode, DelegateResolver, EngineState, LifecycleEvent, LifecycleEventKind};
use core_async::time::{timeout, Duration};
use core_runtime::config::AdmConfig;
use core_runtime::events::AdmEvent;
use core_runtime::notifications::NotificationChannel;
use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct DelegateBridge {
    registry: Arc<HandlerRegistry>,
    resolver: Arc<dyn DelegateResolver>,
    notifications: Option<NotificationChannel>,
    handler_timeout: Option<Duration>,
    timeout_code: CompletionCode,
    in_flight: [AtomicBool; LifecycleEventKind::COUNT],
}

impl DelegateBridge {
    /// Creates a bridge with no handler deadline and no notifications.
    pub fn new(registry: Arc<HandlerRegistry>, resolver: Arc<dyn DelegateResolver>) -> Self {
        Self {
            registry,
            resolver,
            notifications: None,
            handler_timeout: None,
            timeout_code: CompletionCode::TIMED_OUT,
            in_flight: Default::default(),
        }
    }

    /// Applies the handler deadline from `config`.
    pub fn with_config(self, config: &AdmConfig) -> Self {
        self.with_handler_timeout(config.handler_timeout, config.timeout_code)
    }

    pub fn with_handler_timeout(mut self, limit: Option<Duration>, code: CompletionCode) -> Self {
        self.handler_timeout = limit;
        self.timeout_code = code;
        self
    }

    /// Mirrors every accepted invocation onto `channel` before its handler runs.
    pub fn with_notifications(mut self, channel: NotificationChannel) -> Self {
        self.notifications = Some(channel);
        self
    }

    pub fn publishes_notifications(&self) -> bool {
        self.notifications.is_some()
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    pub fn is_in_flight(&self, kind: LifecycleEventKind) -> bool {
        self.in_flight[kind.index()].load(Ordering::Acquire)
    }

    /// Handles one native invocation and resolves it.
    ///
    /// Returns the code sent to the engine. Errors mean either the invocation
    /// overlapped a pending one of the same kind (nothing was resolved) or the
    /// resolve call itself failed.
    #[instrument(skip(self, event), fields(kind = %event.kind()))]
    pub async fn dispatch(&self, event: LifecycleEvent) -> Result<CompletionCode> {
        let kind = event.kind();
        let guard = InFlightGuard::acquire(&self.in_flight[kind.index()], kind)?;

        if let Some(channel) = &self.notifications {
            channel.emit(AdmEvent::Lifecycle(event));
        }

        let code = match self.registry.handler(kind) {
            Some(handler) => self.run(handler, event.payload()).await,
            None => {
                debug!("no handler registered");
                CompletionCode::SUCCESS
            }
        };

        // The resolve may wake the engine into its next invocation of `kind`.
        drop(guard);

        self.resolver
            .resolve(kind, code)
            .map_err(|source| DelegateError::Resolve { kind, source })?;

        debug!(code = %code, "lifecycle invocation resolved");
        Ok(code)
    }

    async fn run(&self, handler: LifecycleHandler, state: Option<EngineState>) -> CompletionCode {
        // A panicking handler is a failed handler; the engine still gets a code.
        // The call itself sits inside the guarded future so a panic before the
        // handler's first await is caught too.
        let outcome = AssertUnwindSafe(async move { handler(state).await }).catch_unwind();

        let outcome = match self.handler_timeout {
            None => outcome.await,
            Some(limit) => match timeout(limit, outcome).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(timeout_ms = limit.as_millis() as u64, code = %self.timeout_code, "lifecycle handler timed out");
                    return self.timeout_code;
                }
            },
        };

        match outcome {
            Ok(result) => completion_code(&result),
            Err(_) => CompletionCode::HANDLER_FAILED,
        }
    }
}

impl fmt::Debug for DelegateBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateBridge")
            .field("registry", &self.registry)
            .field("notifications", &self.notifications.is_some())
            .field("handler_timeout", &self.handler_timeout)
            .field("timeout_code", &self.timeout_code)
            .finish()
    }
}

/// Marks a kind as dispatched for the guard's lifetime.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, kind: LifecycleEventKind) -> Result<Self> {
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(kind = %kind, "overlapping lifecycle invocation rejected");
            return Err(DelegateError::InvocationPending(kind));
        }
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
