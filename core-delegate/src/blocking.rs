//! # Blocking Delegate Host
//!
//! Entry point for native engine threads. The engine calls a lifecycle
//! delegate on its own thread and cannot proceed until it has a completion
//! code; [`BlockingDelegateHost::invoke_blocking`] schedules the dispatch on
//! the async runtime and parks the calling thread until the code arrives.
//!
//! ```text
//! engine thread                     runtime
//! ─────────────                     ───────
//! invoke_blocking(event)
//!   pending.begin(kind) ──────┐
//!   spawn ───────────────────────> bridge.dispatch(event)
//!   blocking_recv() ...       │        handler.await
//!                             └──<── pending.resolve(kind, code)
//!   <── code
//! ```
//!
//! Every accepted invocation is settled: a dispatch that unwinds before
//! resolving reports [`CompletionCode::HANDLER_FAILED`].

use crate::bridge::DelegateBridge;
use crate::error::{DelegateError, Result};
use crate::pending::PendingResolutions;
use crate::registry::HandlerRegistry;
use bridge_traits::{CompletionCode, DelegateResolver, LifecycleEvent};
use core_async::runtime::{self, Handle};
use core_runtime::config::AdmConfig;
use core_runtime::notifications::NotificationChannel;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct BlockingDelegateHost {
    bridge: Arc<DelegateBridge>,
    pending: Arc<PendingResolutions>,
    handle: Handle,
}

impl BlockingDelegateHost {
    /// Wires a bridge that resolves into this host's pending slots.
    pub fn new(
        registry: Arc<HandlerRegistry>,
        config: &AdmConfig,
        notifications: Option<NotificationChannel>,
        handle: Handle,
    ) -> Self {
        let pending = Arc::new(PendingResolutions::new());
        let mut bridge = DelegateBridge::new(registry, pending.clone()).with_config(config);
        if config.publish_lifecycle_notifications {
            if let Some(channel) = notifications {
                bridge = bridge.with_notifications(channel);
            }
        }

        Self::from_parts(Arc::new(bridge), pending, handle)
    }

    /// `bridge` must resolve into `pending`, otherwise waiters never wake.
    pub fn from_parts(
        bridge: Arc<DelegateBridge>,
        pending: Arc<PendingResolutions>,
        handle: Handle,
    ) -> Self {
        Self {
            bridge,
            pending,
            handle,
        }
    }

    pub fn bridge(&self) -> &Arc<DelegateBridge> {
        &self.bridge
    }

    pub fn pending(&self) -> &Arc<PendingResolutions> {
        &self.pending
    }

    /// Dispatches `event` and blocks the calling thread until it is resolved.
    ///
    /// Must be called from a thread that is not driving the runtime; calling
    /// it from inside the runtime fails with [`DelegateError::Runtime`]
    /// instead of deadlocking.
    pub fn invoke_blocking(&self, event: LifecycleEvent) -> Result<CompletionCode> {
        if runtime::current_handle().is_some() {
            return Err(DelegateError::Runtime(
                "invoke_blocking called from inside the async runtime".to_string(),
            ));
        }

        let kind = event.kind();
        let receiver = self.pending.begin(kind)?;
        debug!(kind = %kind, "native thread waiting for lifecycle handler");

        let bridge = Arc::clone(&self.bridge);
        let pending = Arc::clone(&self.pending);
        self.handle.spawn(async move {
            match AssertUnwindSafe(bridge.dispatch(event)).catch_unwind().await {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => {
                    warn!(kind = %kind, error = %err, "lifecycle dispatch failed");
                    pending.abandon(kind);
                }
                Err(_) => {
                    // Unwound before resolving; the waiter still needs a code.
                    warn!(kind = %kind, "lifecycle dispatch panicked");
                    let _ = pending.resolve(kind, CompletionCode::HANDLER_FAILED);
                }
            }
        });

        receiver
            .blocking_recv()
            .map_err(|_| DelegateError::Abandoned(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{LifecycleEventKind, Platform};

    #[test]
    fn test_invoke_blocking_inside_runtime_fails() {
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let config = AdmConfig::builder().platform(Platform::Ios).build().unwrap();
        let host = BlockingDelegateHost::new(
            Arc::new(HandlerRegistry::new()),
            &config,
            None,
            runtime.handle().clone(),
        );

        let result = runtime.block_on(async { host.invoke_blocking(LifecycleEvent::EngineCreated) });

        assert!(matches!(result, Err(DelegateError::Runtime(_))));
        assert!(!host.pending().is_pending(LifecycleEventKind::EngineCreated));
    }

    #[test]
    fn test_notifications_follow_config() {
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let config = AdmConfig::builder()
            .platform(Platform::Ios)
            .publish_lifecycle_notifications(false)
            .build()
            .unwrap();
        let host = BlockingDelegateHost::new(
            Arc::new(HandlerRegistry::new()),
            &config,
            Some(NotificationChannel::new(4)),
            runtime.handle().clone(),
        );

        assert!(!host.bridge().publishes_notifications());
    }
}
