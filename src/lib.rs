//! Workspace placeholder crate.
//!
//! Re-exports the audio device module service so host applications can depend
//! on `adm-workspace` alone and toggle the `service` feature instead of wiring
//! `core-service`, `core-delegate` and `core-capabilities` individually.

#[cfg(feature = "service")]
pub use core_service::*;
