//! Time-related abstractions.
//!
//! `timeout` backs the optional handler deadline of the delegate bridge.

pub use tokio::time::{error::Elapsed, sleep, timeout};

pub use std::time::{Duration, Instant};
