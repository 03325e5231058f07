//! # Capability Error Types

use bridge_traits::{BridgeError, CapabilityOp, Platform};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CapabilityError {
    /// The native audio engine does not exist on this platform. Raised before
    /// any remote call.
    #[error("{op} is not supported on {platform}: the audio device module is only available on iOS/macOS")]
    PlatformUnsupported { platform: Platform, op: CapabilityOp },

    /// Failure reported by the native endpoint, passed through unmodified.
    #[error(transparent)]
    Remote(#[from] BridgeError),
}

impl CapabilityError {
    pub fn is_platform_unsupported(&self) -> bool {
        matches!(self, CapabilityError::PlatformUnsupported { .. })
    }
}

pub type Result<T> = std::result::Result<T, CapabilityError>;
