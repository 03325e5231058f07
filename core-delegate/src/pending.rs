//! # Pending Resolutions
//!
//! In-process [`DelegateResolver`] holding one `oneshot` slot per lifecycle
//! kind. A blocked native thread calls [`begin`](PendingResolutions::begin)
//! and waits on the receiver; the bridge's resolve call fills the slot.

use crate::error::{DelegateError, Result};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{BridgeError, CompletionCode, DelegateResolver, LifecycleEventKind};
use core_async::sync::oneshot;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{trace, warn};

type Slot = Option<oneshot::Sender<CompletionCode>>;

#[derive(Default)]
pub struct PendingResolutions {
    slots: Mutex<[Slot; LifecycleEventKind::COUNT]>,
}

impl PendingResolutions {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, [Slot; LifecycleEventKind::COUNT]> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the slot for `kind` and returns the receiving end.
    ///
    /// Fails with [`DelegateError::InvocationPending`] if an invocation of
    /// the same kind is still waiting. A slot whose receiver was dropped is
    /// treated as free.
    pub fn begin(&self, kind: LifecycleEventKind) -> Result<oneshot::Receiver<CompletionCode>> {
        let mut slots = self.slots();
        let slot = &mut slots[kind.index()];

        if slot.as_ref().is_some_and(|sender| !sender.is_closed()) {
            warn!(kind = %kind, "overlapping lifecycle invocation rejected");
            return Err(DelegateError::InvocationPending(kind));
        }

        let (sender, receiver) = oneshot::channel();
        *slot = Some(sender);
        trace!(kind = %kind, "resolution pending");
        Ok(receiver)
    }

    pub fn is_pending(&self, kind: LifecycleEventKind) -> bool {
        self.slots()[kind.index()]
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Drops the slot for `kind` without a code; the waiter observes
    /// [`DelegateError::Abandoned`].
    pub fn abandon(&self, kind: LifecycleEventKind) {
        if self.slots()[kind.index()].take().is_some() {
            trace!(kind = %kind, "resolution abandoned");
        }
    }
}

impl DelegateResolver for PendingResolutions {
    fn resolve(&self, kind: LifecycleEventKind, code: CompletionCode) -> BridgeResult<()> {
        let sender = self.slots()[kind.index()].take().ok_or_else(|| {
            BridgeError::OperationFailed(format!(
                "{}: no pending {} invocation",
                kind.resolve_name(),
                kind
            ))
        })?;

        sender.send(code).map_err(|_| {
            BridgeError::OperationFailed(format!(
                "{}: waiter for {} is gone",
                kind.resolve_name(),
                kind
            ))
        })
    }
}

impl fmt::Debug for PendingResolutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending: Vec<_> = LifecycleEventKind::ALL
            .into_iter()
            .filter(|kind| self.is_pending(*kind))
            .collect();
        f.debug_struct("PendingResolutions")
            .field("pending", &pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[core_async::test]
    async fn test_resolve_delivers_code() {
        let pending = PendingResolutions::new();
        let receiver = pending.begin(LifecycleEventKind::EngineDidStop).unwrap();

        pending
            .resolve(LifecycleEventKind::EngineDidStop, CompletionCode::new(7))
            .unwrap();

        assert_eq!(receiver.await.unwrap().value(), 7);
        assert!(!pending.is_pending(LifecycleEventKind::EngineDidStop));
    }

    #[test]
    fn test_overlapping_begin_fails_fast() {
        let pending = PendingResolutions::new();
        let _receiver = pending.begin(LifecycleEventKind::EngineWillStart).unwrap();

        let second = pending.begin(LifecycleEventKind::EngineWillStart);
        assert!(matches!(
            second,
            Err(DelegateError::InvocationPending(LifecycleEventKind::EngineWillStart))
        ));

        // Other kinds are independent.
        assert!(pending.begin(LifecycleEventKind::EngineWillEnable).is_ok());
    }

    #[test]
    fn test_dropped_receiver_frees_slot() {
        let pending = PendingResolutions::new();
        drop(pending.begin(LifecycleEventKind::EngineCreated).unwrap());

        assert!(!pending.is_pending(LifecycleEventKind::EngineCreated));
        assert!(pending.begin(LifecycleEventKind::EngineCreated).is_ok());
    }

    #[test]
    fn test_resolve_without_pending_invocation() {
        let pending = PendingResolutions::new();
        let result = pending.resolve(LifecycleEventKind::EngineWillRelease, CompletionCode::SUCCESS);
        assert!(matches!(result, Err(BridgeError::OperationFailed(msg)) if msg.starts_with("resolveWillReleaseEngine")));
    }

    #[core_async::test]
    async fn test_abandon_wakes_waiter() {
        let pending = PendingResolutions::new();
        let receiver = pending.begin(LifecycleEventKind::EngineDidDisable).unwrap();

        pending.abandon(LifecycleEventKind::EngineDidDisable);

        assert!(receiver.await.is_err());
    }
}
