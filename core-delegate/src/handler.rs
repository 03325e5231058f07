//! # Lifecycle Handlers
//!
//! Application callbacks for lifecycle delegate invocations and the mapping
//! from their outcome to a [`CompletionCode`].
//!
//! A handler receives the engine state for the four kinds that carry one and
//! `None` for `EngineCreated` / `EngineWillRelease`. It succeeds with `()` or
//! fails with a [`HandlerError`]:
//!
//! | Outcome | Code reported to the engine |
//! |---------|-----------------------------|
//! | `Ok(())` | `0` |
//! | `Err(HandlerError::Code(c))` | `c` |
//! | `Err(HandlerError::Failed(_))` | `-1` |
//!
//! ```
//! use core_delegate::handler::{handler_fn, HandlerError};
//!
//! let handler = handler_fn(|state| async move {
//!     match state {
//!         Some(state) if !state.is_playout_enabled => Err(HandlerError::Code(7)),
//!         _ => Ok(()),
//!     }
//! });
//! # let _ = handler;
//! ```

use bridge_traits::{CompletionCode, EngineState};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Future returned by a [`LifecycleHandler`].
pub type HandlerFuture = BoxFuture<'static, Result<(), HandlerError>>;

/// A registered application callback for one lifecycle kind.
pub type LifecycleHandler = Arc<dyn Fn(Option<EngineState>) -> HandlerFuture + Send + Sync>;

/// Failure of an application lifecycle handler.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Failure carrying an explicit engine code.
    #[error("handler failed with code {0}")]
    Code(i64),

    /// Any other failure.
    #[error(transparent)]
    Failed(anyhow::Error),
}

impl HandlerError {
    pub fn completion_code(&self) -> CompletionCode {
        match self {
            HandlerError::Code(code) => CompletionCode::new(*code),
            HandlerError::Failed(_) => CompletionCode::HANDLER_FAILED,
        }
    }
}

/// Handlers written against `anyhow::Result` keep an explicit code if the
/// error chain was built from a [`HandlerError`].
impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<HandlerError>() {
            Ok(inner) => inner,
            Err(err) => HandlerError::Failed(err),
        }
    }
}

impl From<i64> for HandlerError {
    fn from(code: i64) -> Self {
        HandlerError::Code(code)
    }
}

/// Maps a handler outcome to the code reported to the engine.
pub fn completion_code(outcome: &Result<(), HandlerError>) -> CompletionCode {
    match outcome {
        Ok(()) => CompletionCode::SUCCESS,
        Err(err) => err.completion_code(),
    }
}

/// Wraps an async closure as a [`LifecycleHandler`].
///
/// The closure may fail with any error convertible into [`HandlerError`],
/// which includes `anyhow::Error` and bare `i64` codes.
pub fn handler_fn<F, Fut, E>(f: F) -> LifecycleHandler
where
    F: Fn(Option<EngineState>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<HandlerError> + Send + 'static,
{
    Arc::new(move |state| {
        let outcome = f(state);
        async move { outcome.await.map_err(Into::into) }.boxed()
    })
}
