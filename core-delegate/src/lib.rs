//! # Lifecycle Delegate Bridge
//!
//! Lets the native audio engine block on lifecycle callbacks (engine created,
//! will enable, will start, did stop, did disable, will release) while the
//! application answers them with async handlers.
//!
//! ## Overview
//!
//! - [`HandlerRegistry`]: one replaceable handler per lifecycle kind
//! - [`DelegateBridge`]: dispatches an invocation, maps the handler outcome
//!   to a [`CompletionCode`](bridge_traits::CompletionCode) and resolves it
//!   exactly once
//! - [`PendingResolutions`]: one-slot-per-kind resolver for in-process hosts
//! - [`BlockingDelegateHost`]: the entry point native engine threads call
//!
//! ## Usage
//!
//! ```ignore
//! use core_delegate::{BlockingDelegateHost, HandlerError, HandlerRegistry};
//! use bridge_traits::{LifecycleEvent, LifecycleEventKind, EngineState};
//!
//! let registry = Arc::new(HandlerRegistry::new());
//! registry.register(LifecycleEventKind::EngineDidStop, |_| async {
//!     Err::<(), _>(HandlerError::Code(7))
//! });
//!
//! let host = BlockingDelegateHost::new(registry, &config, None, runtime.handle().clone());
//!
//! // On the engine's delegate thread:
//! let code = host.invoke_blocking(LifecycleEvent::EngineDidStop(EngineState::new(true, false)))?;
//! assert_eq!(code.value(), 7);
//! ```

pub mod blocking;
pub mod bridge;
pub mod error;
pub mod handler;
pub mod pending;
pub mod registry;

pub use blocking::BlockingDelegateHost;
pub use bridge::DelegateBridge;
pub use error::{DelegateError, Result};
pub use handler::{completion_code, handler_fn, HandlerError, HandlerFuture, LifecycleHandler};
pub use pending::PendingResolutions;
pub use registry::HandlerRegistry;
