//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the audio device module binding:
//! - Configuration management
//! - Notification channel for one-way engine events
//! - Logging and tracing infrastructure
//!
//! ## Overview
//!
//! The delegate bridge, the capability facade and the service root all build
//! on this crate. It owns the only process-wide decision that is evaluated once
//! at startup: which [`Platform`](bridge_traits::Platform) the binding runs on.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod notifications;

pub use error::{Error, Result};
