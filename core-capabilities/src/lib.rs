//! # Audio Device Module Capabilities
//!
//! Typed request/response wrappers over the native engine's device controls:
//! playout and recording, microphone mute, voice processing, AGC and ducking.
//!
//! Every call is a fresh round trip. There is no caching and no validation
//! beyond the argument types; results and remote errors come back exactly as
//! the engine produced them. On platforms without the engine every call fails
//! with [`CapabilityError::PlatformUnsupported`] and nothing is sent.

pub mod error;
pub mod facade;

pub use error::{CapabilityError, Result};
pub use facade::AudioDeviceModule;
