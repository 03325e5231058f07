//! Bridge → native resolve channel for lifecycle delegate callbacks.

use crate::audio::{CompletionCode, LifecycleEventKind};
use crate::error::Result;

/// Delivers a completion code to the native engine.
///
/// One call per dispatched invocation. The `kind` selects the dedicated
/// resolve channel (see [`LifecycleEventKind::resolve_name`]); the engine
/// never has more than one invocation of a kind pending, so no request id is
/// needed.
///
/// Implementations must not block: the native side is parked waiting for
/// exactly this signal.
pub trait DelegateResolver: Send + Sync {
    fn resolve(&self, kind: LifecycleEventKind, code: CompletionCode) -> Result<()>;
}
