//! Native audio engine capability endpoint.
//!
//! Each method maps one-to-one onto a native module method. Implementations
//! forward the call across the boundary and return the native response
//! unchanged; structured native rejections surface as
//! [`BridgeError::Rejected`](crate::error::BridgeError::Rejected).

use crate::audio::{
    DuckingLevelResult, MuteMode, MuteModeResult, MuteResult, OperationResult, ToggleResult,
};
use crate::error::Result;
use std::fmt;

/// Request/response surface of the native audio device module.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::engine::AudioEngineEndpoint;
///
/// async fn mute(endpoint: &dyn AudioEngineEndpoint) -> bridge_traits::error::Result<bool> {
///     Ok(endpoint.set_microphone_muted(true).await?.muted)
/// }
/// ```
#[async_trait::async_trait]
pub trait AudioEngineEndpoint: Send + Sync {
    async fn start_playout(&self) -> Result<OperationResult>;
    async fn stop_playout(&self) -> Result<OperationResult>;
    async fn start_recording(&self) -> Result<OperationResult>;
    async fn stop_recording(&self) -> Result<OperationResult>;

    /// Initialize and start local recording without a peer connection.
    async fn start_local_recording(&self) -> Result<OperationResult>;
    async fn stop_local_recording(&self) -> Result<OperationResult>;

    async fn set_microphone_muted(&self, muted: bool) -> Result<MuteResult>;
    async fn is_microphone_muted(&self) -> Result<bool>;

    /// Toggling voice processing restarts the engine.
    async fn set_voice_processing_enabled(&self, enabled: bool) -> Result<ToggleResult>;
    async fn is_voice_processing_enabled(&self) -> Result<bool>;

    /// Bypass voice processing without restarting the engine.
    async fn set_voice_processing_bypassed(&self, bypassed: bool) -> Result<()>;
    async fn is_voice_processing_bypassed(&self) -> Result<bool>;

    async fn set_voice_processing_agc_enabled(&self, enabled: bool) -> Result<ToggleResult>;
    async fn is_voice_processing_agc_enabled(&self) -> Result<bool>;

    async fn is_playing(&self) -> Result<bool>;
    async fn is_recording(&self) -> Result<bool>;
    async fn is_engine_running(&self) -> Result<bool>;

    async fn set_mute_mode(&self, mode: MuteMode) -> Result<MuteModeResult>;
    async fn get_mute_mode(&self) -> Result<MuteMode>;

    async fn set_advanced_ducking_enabled(&self, enabled: bool) -> Result<ToggleResult>;
    async fn is_advanced_ducking_enabled(&self) -> Result<bool>;

    /// Ducking level in percent (0-100). Passed through unvalidated.
    async fn set_ducking_level(&self, level: u8) -> Result<DuckingLevelResult>;
    async fn get_ducking_level(&self) -> Result<u8>;
}

/// Identifies a capability call for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityOp {
    StartPlayout,
    StopPlayout,
    StartRecording,
    StopRecording,
    StartLocalRecording,
    StopLocalRecording,
    SetMicrophoneMuted,
    IsMicrophoneMuted,
    SetVoiceProcessingEnabled,
    IsVoiceProcessingEnabled,
    SetVoiceProcessingBypassed,
    IsVoiceProcessingBypassed,
    SetVoiceProcessingAgcEnabled,
    IsVoiceProcessingAgcEnabled,
    IsPlaying,
    IsRecording,
    IsEngineRunning,
    SetMuteMode,
    GetMuteMode,
    SetAdvancedDuckingEnabled,
    IsAdvancedDuckingEnabled,
    SetDuckingLevel,
    GetDuckingLevel,
}

impl CapabilityOp {
    /// Method name exported by the native module.
    pub fn native_name(self) -> &'static str {
        match self {
            CapabilityOp::StartPlayout => "audioDeviceModuleStartPlayout",
            CapabilityOp::StopPlayout => "audioDeviceModuleStopPlayout",
            CapabilityOp::StartRecording => "audioDeviceModuleStartRecording",
            CapabilityOp::StopRecording => "audioDeviceModuleStopRecording",
            CapabilityOp::StartLocalRecording => "audioDeviceModuleStartLocalRecording",
            CapabilityOp::StopLocalRecording => "audioDeviceModuleStopLocalRecording",
            CapabilityOp::SetMicrophoneMuted => "audioDeviceModuleSetMicrophoneMuted",
            CapabilityOp::IsMicrophoneMuted => "audioDeviceModuleIsMicrophoneMuted",
            CapabilityOp::SetVoiceProcessingEnabled => {
                "audioDeviceModuleSetVoiceProcessingEnabled"
            }
            CapabilityOp::IsVoiceProcessingEnabled => "audioDeviceModuleIsVoiceProcessingEnabled",
            CapabilityOp::SetVoiceProcessingBypassed => {
                "audioDeviceModuleSetVoiceProcessingBypassed"
            }
            CapabilityOp::IsVoiceProcessingBypassed => {
                "audioDeviceModuleIsVoiceProcessingBypassed"
            }
            CapabilityOp::SetVoiceProcessingAgcEnabled => {
                "audioDeviceModuleSetVoiceProcessingAGCEnabled"
            }
            CapabilityOp::IsVoiceProcessingAgcEnabled => {
                "audioDeviceModuleIsVoiceProcessingAGCEnabled"
            }
            CapabilityOp::IsPlaying => "audioDeviceModuleIsPlaying",
            CapabilityOp::IsRecording => "audioDeviceModuleIsRecording",
            CapabilityOp::IsEngineRunning => "audioDeviceModuleIsEngineRunning",
            CapabilityOp::SetMuteMode => "audioDeviceModuleSetMuteMode",
            CapabilityOp::GetMuteMode => "audioDeviceModuleGetMuteMode",
            CapabilityOp::SetAdvancedDuckingEnabled => {
                "audioDeviceModuleSetAdvancedDuckingEnabled"
            }
            CapabilityOp::IsAdvancedDuckingEnabled => "audioDeviceModuleIsAdvancedDuckingEnabled",
            CapabilityOp::SetDuckingLevel => "audioDeviceModuleSetDuckingLevel",
            CapabilityOp::GetDuckingLevel => "audioDeviceModuleGetDuckingLevel",
        }
    }
}

impl fmt::Display for CapabilityOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.native_name())
    }
}
