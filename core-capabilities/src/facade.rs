//! # Audio Device Module Facade
//!
//! Pass-through wrapper over [`AudioEngineEndpoint`].
//!
//! Capability presence is decided once, at construction, from the
//! [`Platform`]: on platforms without the native engine the endpoint is not
//! retained and every operation fails with
//! [`CapabilityError::PlatformUnsupported`] before reaching it.
//!
//! ## Usage
//!
//! ```ignore
//! let adm = AudioDeviceModule::new(Platform::Ios, endpoint);
//!
//! let result = adm.set_microphone_muted(true).await?;
//! assert!(result.muted);
//!
//! adm.set_ducking_level(40).await?;
//! ```

use crate::error::{CapabilityError, Result};
use bridge_traits::{
    AudioEngineEndpoint, CapabilityOp, DuckingLevelResult, MuteMode, MuteModeResult, MuteResult,
    OperationResult, Platform, ToggleResult,
};
use core_runtime::config::AdmConfig;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Clone)]
pub struct AudioDeviceModule {
    platform: Platform,
    endpoint: Option<Arc<dyn AudioEngineEndpoint>>,
}

impl AudioDeviceModule {
    pub fn new(platform: Platform, endpoint: Arc<dyn AudioEngineEndpoint>) -> Self {
        if !platform.supports_audio_device_module() {
            debug!(platform = %platform, "audio device module unavailable; endpoint ignored");
            return Self::unsupported(platform);
        }

        Self {
            platform,
            endpoint: Some(endpoint),
        }
    }

    pub fn from_config(config: &AdmConfig, endpoint: Arc<dyn AudioEngineEndpoint>) -> Self {
        Self::new(config.platform, endpoint)
    }

    /// A facade whose every operation fails with `PlatformUnsupported`.
    pub fn unsupported(platform: Platform) -> Self {
        Self {
            platform,
            endpoint: None,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_available(&self) -> bool {
        self.endpoint.is_some()
    }

    fn endpoint(&self, op: CapabilityOp) -> Result<&dyn AudioEngineEndpoint> {
        match &self.endpoint {
            Some(endpoint) => {
                trace!(op = %op, "forwarding capability call");
                Ok(endpoint.as_ref())
            }
            None => Err(CapabilityError::PlatformUnsupported {
                platform: self.platform,
                op,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Playout / recording
    // ------------------------------------------------------------------

    pub async fn start_playout(&self) -> Result<OperationResult> {
        Ok(self.endpoint(CapabilityOp::StartPlayout)?.start_playout().await?)
    }

    pub async fn stop_playout(&self) -> Result<OperationResult> {
        Ok(self.endpoint(CapabilityOp::StopPlayout)?.stop_playout().await?)
    }

    pub async fn start_recording(&self) -> Result<OperationResult> {
        Ok(self.endpoint(CapabilityOp::StartRecording)?.start_recording().await?)
    }

    pub async fn stop_recording(&self) -> Result<OperationResult> {
        Ok(self.endpoint(CapabilityOp::StopRecording)?.stop_recording().await?)
    }

    /// Starts capturing without sending audio anywhere (e.g. for a level meter).
    pub async fn start_local_recording(&self) -> Result<OperationResult> {
        Ok(self
            .endpoint(CapabilityOp::StartLocalRecording)?
            .start_local_recording()
            .await?)
    }

    pub async fn stop_local_recording(&self) -> Result<OperationResult> {
        Ok(self
            .endpoint(CapabilityOp::StopLocalRecording)?
            .stop_local_recording()
            .await?)
    }

    pub async fn is_playing(&self) -> Result<bool> {
        Ok(self.endpoint(CapabilityOp::IsPlaying)?.is_playing().await?)
    }

    pub async fn is_recording(&self) -> Result<bool> {
        Ok(self.endpoint(CapabilityOp::IsRecording)?.is_recording().await?)
    }

    pub async fn is_engine_running(&self) -> Result<bool> {
        Ok(self
            .endpoint(CapabilityOp::IsEngineRunning)?
            .is_engine_running()
            .await?)
    }

    // ------------------------------------------------------------------
    // Microphone mute
    // ------------------------------------------------------------------

    pub async fn set_microphone_muted(&self, muted: bool) -> Result<MuteResult> {
        Ok(self
            .endpoint(CapabilityOp::SetMicrophoneMuted)?
            .set_microphone_muted(muted)
            .await?)
    }

    pub async fn is_microphone_muted(&self) -> Result<bool> {
        Ok(self
            .endpoint(CapabilityOp::IsMicrophoneMuted)?
            .is_microphone_muted()
            .await?)
    }

    pub async fn set_mute_mode(&self, mode: MuteMode) -> Result<MuteModeResult> {
        Ok(self.endpoint(CapabilityOp::SetMuteMode)?.set_mute_mode(mode).await?)
    }

    pub async fn get_mute_mode(&self) -> Result<MuteMode> {
        Ok(self.endpoint(CapabilityOp::GetMuteMode)?.get_mute_mode().await?)
    }

    // ------------------------------------------------------------------
    // Voice processing
    // ------------------------------------------------------------------

    pub async fn set_voice_processing_enabled(&self, enabled: bool) -> Result<ToggleResult> {
        Ok(self
            .endpoint(CapabilityOp::SetVoiceProcessingEnabled)?
            .set_voice_processing_enabled(enabled)
            .await?)
    }

    pub async fn is_voice_processing_enabled(&self) -> Result<bool> {
        Ok(self
            .endpoint(CapabilityOp::IsVoiceProcessingEnabled)?
            .is_voice_processing_enabled()
            .await?)
    }

    pub async fn set_voice_processing_bypassed(&self, bypassed: bool) -> Result<()> {
        Ok(self
            .endpoint(CapabilityOp::SetVoiceProcessingBypassed)?
            .set_voice_processing_bypassed(bypassed)
            .await?)
    }

    pub async fn is_voice_processing_bypassed(&self) -> Result<bool> {
        Ok(self
            .endpoint(CapabilityOp::IsVoiceProcessingBypassed)?
            .is_voice_processing_bypassed()
            .await?)
    }

    pub async fn set_voice_processing_agc_enabled(&self, enabled: bool) -> Result<ToggleResult> {
        Ok(self
            .endpoint(CapabilityOp::SetVoiceProcessingAgcEnabled)?
            .set_voice_processing_agc_enabled(enabled)
            .await?)
    }

    pub async fn is_voice_processing_agc_enabled(&self) -> Result<bool> {
        Ok(self
            .endpoint(CapabilityOp::IsVoiceProcessingAgcEnabled)?
            .is_voice_processing_agc_enabled()
            .await?)
    }

    // ------------------------------------------------------------------
    // Ducking
    // ------------------------------------------------------------------

    pub async fn set_advanced_ducking_enabled(&self, enabled: bool) -> Result<ToggleResult> {
        Ok(self
            .endpoint(CapabilityOp::SetAdvancedDuckingEnabled)?
            .set_advanced_ducking_enabled(enabled)
            .await?)
    }

    pub async fn is_advanced_ducking_enabled(&self) -> Result<bool> {
        Ok(self
            .endpoint(CapabilityOp::IsAdvancedDuckingEnabled)?
            .is_advanced_ducking_enabled()
            .await?)
    }

    /// Ducking level in percent. Values outside 0-100 are the engine's call.
    pub async fn set_ducking_level(&self, level: u8) -> Result<DuckingLevelResult> {
        Ok(self
            .endpoint(CapabilityOp::SetDuckingLevel)?
            .set_ducking_level(level)
            .await?)
    }

    pub async fn get_ducking_level(&self) -> Result<u8> {
        Ok(self
            .endpoint(CapabilityOp::GetDuckingLevel)?
            .get_ducking_level()
            .await?)
    }
}

impl fmt::Debug for AudioDeviceModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioDeviceModule")
            .field("platform", &self.platform)
            .field("available", &self.is_available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[core_async::test]
    async fn test_unsupported_facade_fails_fast() {
        let adm = AudioDeviceModule::unsupported(Platform::Android);

        assert!(!adm.is_available());
        let err = adm.set_microphone_muted(true).await.unwrap_err();
        assert!(matches!(
            err,
            CapabilityError::PlatformUnsupported {
                platform: Platform::Android,
                op: CapabilityOp::SetMicrophoneMuted,
            }
        ));
    }

    #[core_async::test]
    async fn test_every_operation_gated() {
        let adm = AudioDeviceModule::unsupported(Platform::Web);

        assert!(adm.start_playout().await.unwrap_err().is_platform_unsupported());
        assert!(adm.stop_recording().await.unwrap_err().is_platform_unsupported());
        assert!(adm.get_mute_mode().await.unwrap_err().is_platform_unsupported());
        assert!(adm
            .set_voice_processing_bypassed(true)
            .await
            .unwrap_err()
            .is_platform_unsupported());
        assert!(adm.get_ducking_level().await.unwrap_err().is_platform_unsupported());
    }

    #[test]
    fn test_error_message_names_operation() {
        let err = CapabilityError::PlatformUnsupported {
            platform: Platform::Android,
            op: CapabilityOp::SetDuckingLevel,
        };
        let message = err.to_string();
        assert!(message.contains("audioDeviceModuleSetDuckingLevel"));
        assert!(message.contains("android"));
    }
}
