//! # Handler Registry
//!
//! One handler slot per [`LifecycleEventKind`]; the last registration wins.
//!
//! The registry is a plain value owned by whoever wires the bridge, so tests
//! and hosts can hold independent registries. Replacing a slot never affects
//! a dispatch that already captured the previous handler.

use crate::handler::{handler_fn, HandlerError, LifecycleHandler};
use bridge_traits::{EngineState, LifecycleEventKind};
use std::fmt;
use std::future::Future;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

type Slots = [Option<LifecycleHandler>; LifecycleEventKind::COUNT];

#[derive(Default)]
pub struct HandlerRegistry {
    slots: RwLock<Slots>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the slot for `kind`, or clears it when `handler` is `None`.
    ///
    /// Returns the handler that was previously registered.
    pub fn set_handler(
        &self,
        kind: LifecycleEventKind,
        handler: Option<LifecycleHandler>,
    ) -> Option<LifecycleHandler> {
        let registered = handler.is_some();
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut slots[kind.index()], handler);
        debug!(kind = %kind, registered, "lifecycle handler updated");
        previous
    }

    /// Registers an async closure for `kind`. See [`handler_fn`].
    pub fn register<F, Fut, E>(&self, kind: LifecycleEventKind, f: F)
    where
        F: Fn(Option<EngineState>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<HandlerError> + Send + 'static,
    {
        self.set_handler(kind, Some(handler_fn(f)));
    }

    pub fn clear_handler(&self, kind: LifecycleEventKind) -> Option<LifecycleHandler> {
        self.set_handler(kind, None)
    }

    /// Snapshot of the handler currently registered for `kind`.
    pub fn handler(&self, kind: LifecycleEventKind) -> Option<LifecycleHandler> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots[kind.index()].clone()
    }

    pub fn is_registered(&self, kind: LifecycleEventKind) -> bool {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots[kind.index()].is_some()
    }

    pub fn registered_kinds(&self) -> Vec<LifecycleEventKind> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        LifecycleEventKind::ALL
            .into_iter()
            .filter(|kind| slots[kind.index()].is_some())
            .collect()
    }

    /// Empties every slot.
    pub fn clear(&self) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        *slots = Slots::default();
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("registered", &self.registered_kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn ok_handler() -> LifecycleHandler {
        handler_fn(|_| async { Ok::<(), HandlerError>(()) })
    }

    #[test]
    fn test_empty_by_default() {
        let registry = HandlerRegistry::new();
        for kind in LifecycleEventKind::ALL {
            assert!(registry.handler(kind).is_none());
        }
        assert!(registry.registered_kinds().is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = HandlerRegistry::new();
        let first = ok_handler();
        let second = ok_handler();

        registry.set_handler(LifecycleEventKind::EngineWillStart, Some(first.clone()));
        let previous =
            registry.set_handler(LifecycleEventKind::EngineWillStart, Some(second.clone()));

        assert!(Arc::ptr_eq(&previous.unwrap(), &first));
        assert!(Arc::ptr_eq(
            &registry.handler(LifecycleEventKind::EngineWillStart).unwrap(),
            &second
        ));
    }

    #[test]
    fn test_slots_are_independent() {
        let registry = HandlerRegistry::new();
        registry.register(LifecycleEventKind::EngineCreated, |_| async {
            Ok::<(), HandlerError>(())
        });

        assert!(registry.is_registered(LifecycleEventKind::EngineCreated));
        assert!(!registry.is_registered(LifecycleEventKind::EngineWillRelease));
        assert_eq!(
            registry.registered_kinds(),
            vec![LifecycleEventKind::EngineCreated]
        );
    }

    #[test]
    fn test_clearing_slots() {
        let registry = HandlerRegistry::new();
        registry.set_handler(LifecycleEventKind::EngineDidStop, Some(ok_handler()));
        registry.set_handler(LifecycleEventKind::EngineDidDisable, Some(ok_handler()));

        assert!(registry
            .clear_handler(LifecycleEventKind::EngineDidStop)
            .is_some());
        assert!(!registry.is_registered(LifecycleEventKind::EngineDidStop));

        registry.clear();
        assert!(registry.registered_kinds().is_empty());
    }

    #[test]
    fn test_snapshot_outlives_replacement() {
        let registry = HandlerRegistry::new();
        let original = ok_handler();
        registry.set_handler(LifecycleEventKind::EngineWillEnable, Some(original.clone()));

        let captured = registry.handler(LifecycleEventKind::EngineWillEnable).unwrap();
        registry.set_handler(LifecycleEventKind::EngineWillEnable, None);

        assert!(Arc::ptr_eq(&captured, &original));
    }
}
