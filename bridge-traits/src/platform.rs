//! Deployment target detection.
//!
//! The native audio engine only ships on Apple platforms. Capability presence
//! is derived from a [`Platform`] value once at startup; callers never compare
//! OS strings per call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host platform the bridge is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Macos,
    Android,
    Windows,
    Linux,
    Web,
    Other,
}

impl Platform {
    /// Platform of the current compilation target.
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "macos") {
            Platform::Macos
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_arch = "wasm32") {
            Platform::Web
        } else {
            Platform::Other
        }
    }

    /// Whether the native audio device module exists on this platform.
    pub fn supports_audio_device_module(self) -> bool {
        matches!(self, Platform::Ios | Platform::Macos)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Macos => "macos",
            Platform::Android => "android",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Web => "web",
            Platform::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_apple_platforms_support_the_engine() {
        assert!(Platform::Ios.supports_audio_device_module());
        assert!(Platform::Macos.supports_audio_device_module());
        assert!(!Platform::Android.supports_audio_device_module());
        assert!(!Platform::Linux.supports_audio_device_module());
        assert!(!Platform::Web.supports_audio_device_module());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Platform::Macos).unwrap();
        assert_eq!(json, "\"macos\"");
    }
}
