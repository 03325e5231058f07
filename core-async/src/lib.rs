//! Runtime abstraction layer for the audio device module bridge.
//!
//! Every crate in the workspace reaches the async runtime through this crate
//! instead of depending on Tokio directly. The native audio engine only exists
//! on Apple platforms, so there is a single Tokio-backed implementation; the
//! indirection keeps executor choices in one place.
//!
//! # Modules
//!
//! - `runtime`: runtime handles and `block_on` for native threads
//! - `task`: task spawning
//! - `time`: sleep, timeout and instants
//! - `sync`: channels and async locks
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::oneshot;
//! use core_async::task;
//!
//! async fn example() {
//!     let (tx, rx) = oneshot::channel();
//!     task::spawn(async move {
//!         let _ = tx.send(0_i64);
//!     });
//!     assert_eq!(rx.await.unwrap(), 0);
//! }
//! ```

// Re-export the async entry-point/test macros so downstream crates never need
// direct Tokio dependencies.
pub use core_async_macros::{main, test};

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, timeout, Duration, Instant};
