//! Synchronization primitives.
//!
//! All primitives are async-aware and `Send + Sync`. `oneshot` carries
//! completion codes back to blocked native threads; `broadcast` backs the
//! notification stream.

pub use tokio::sync::{broadcast, oneshot, Mutex};
