//! # Delegate Error Types

use bridge_traits::{BridgeError, LifecycleEventKind};
use thiserror::Error;

/// Errors raised by the delegate bridge itself.
///
/// Handler failures are not represented here: they are absorbed by the
/// bridge and reported to the engine as a completion code.
#[derive(Error, Debug)]
pub enum DelegateError {
    /// A second invocation of a kind arrived before the first was resolved.
    #[error("A {0} invocation is already pending")]
    InvocationPending(LifecycleEventKind),

    /// The resolve call to the native engine failed.
    #[error("Failed to resolve {kind}: {source}")]
    Resolve {
        kind: LifecycleEventKind,
        #[source]
        source: BridgeError,
    },

    /// The pending invocation was dropped without a completion code.
    #[error("Resolution for {0} was abandoned")]
    Abandoned(LifecycleEventKind),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, DelegateError>;
