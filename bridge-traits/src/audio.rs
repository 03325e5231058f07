//! Data contracts shared with the native audio engine.
//!
//! Field names follow the native module's JSON shapes (camelCase), so the
//! same types decode event bodies and describe capability responses.

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Lifecycle
// ============================================================================

/// Kind of an engine lifecycle delegate callback.
///
/// Each kind has its own native callback name and its own resolve channel,
/// which is how the engine correlates a completion code with the pending
/// invocation without a request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleEventKind {
    EngineCreated,
    EngineWillEnable,
    EngineWillStart,
    EngineDidStop,
    EngineDidDisable,
    EngineWillRelease,
}

impl LifecycleEventKind {
    pub const COUNT: usize = 6;

    pub const ALL: [LifecycleEventKind; Self::COUNT] = [
        LifecycleEventKind::EngineCreated,
        LifecycleEventKind::EngineWillEnable,
        LifecycleEventKind::EngineWillStart,
        LifecycleEventKind::EngineDidStop,
        LifecycleEventKind::EngineDidDisable,
        LifecycleEventKind::EngineWillRelease,
    ];

    /// Stable slot index in `0..COUNT`.
    pub fn index(self) -> usize {
        match self {
            LifecycleEventKind::EngineCreated => 0,
            LifecycleEventKind::EngineWillEnable => 1,
            LifecycleEventKind::EngineWillStart => 2,
            LifecycleEventKind::EngineDidStop => 3,
            LifecycleEventKind::EngineDidDisable => 4,
            LifecycleEventKind::EngineWillRelease => 5,
        }
    }

    /// Name of the native → bridge delegate invocation.
    pub fn native_name(self) -> &'static str {
        match self {
            LifecycleEventKind::EngineCreated => "engineCreated",
            LifecycleEventKind::EngineWillEnable => "engineWillEnable",
            LifecycleEventKind::EngineWillStart => "engineWillStart",
            LifecycleEventKind::EngineDidStop => "engineDidStop",
            LifecycleEventKind::EngineDidDisable => "engineDidDisable",
            LifecycleEventKind::EngineWillRelease => "engineWillRelease",
        }
    }

    /// Name of the bridge → native resolve call for this kind.
    pub fn resolve_name(self) -> &'static str {
        match self {
            LifecycleEventKind::EngineCreated => "resolveEngineCreated",
            LifecycleEventKind::EngineWillEnable => "resolveWillEnableEngine",
            LifecycleEventKind::EngineWillStart => "resolveWillStartEngine",
            LifecycleEventKind::EngineDidStop => "resolveDidStopEngine",
            LifecycleEventKind::EngineDidDisable => "resolveDidDisableEngine",
            LifecycleEventKind::EngineWillRelease => "resolveWillReleaseEngine",
        }
    }

    /// Whether invocations of this kind carry an [`EngineState`].
    pub fn carries_payload(self) -> bool {
        !matches!(
            self,
            LifecycleEventKind::EngineCreated | LifecycleEventKind::EngineWillRelease
        )
    }

    pub fn from_native_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.native_name() == name)
    }
}

impl fmt::Display for LifecycleEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.native_name())
    }
}

/// Engine I/O state attached to enable/start/stop/disable callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub is_playout_enabled: bool,
    pub is_recording_enabled: bool,
}

impl EngineState {
    pub fn new(is_playout_enabled: bool, is_recording_enabled: bool) -> Self {
        Self {
            is_playout_enabled,
            is_recording_enabled,
        }
    }
}

/// One native lifecycle delegate invocation.
///
/// Payload-carrying kinds hold their [`EngineState`]; `EngineCreated` and
/// `EngineWillRelease` never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "state")]
pub enum LifecycleEvent {
    EngineCreated,
    EngineWillEnable(EngineState),
    EngineWillStart(EngineState),
    EngineDidStop(EngineState),
    EngineDidDisable(EngineState),
    EngineWillRelease,
}

impl LifecycleEvent {
    pub fn kind(&self) -> LifecycleEventKind {
        match self {
            LifecycleEvent::EngineCreated => LifecycleEventKind::EngineCreated,
            LifecycleEvent::EngineWillEnable(_) => LifecycleEventKind::EngineWillEnable,
            LifecycleEvent::EngineWillStart(_) => LifecycleEventKind::EngineWillStart,
            LifecycleEvent::EngineDidStop(_) => LifecycleEventKind::EngineDidStop,
            LifecycleEvent::EngineDidDisable(_) => LifecycleEventKind::EngineDidDisable,
            LifecycleEvent::EngineWillRelease => LifecycleEventKind::EngineWillRelease,
        }
    }

    pub fn payload(&self) -> Option<EngineState> {
        match *self {
            LifecycleEvent::EngineWillEnable(state)
            | LifecycleEvent::EngineWillStart(state)
            | LifecycleEvent::EngineDidStop(state)
            | LifecycleEvent::EngineDidDisable(state) => Some(state),
            LifecycleEvent::EngineCreated | LifecycleEvent::EngineWillRelease => None,
        }
    }

    /// Rebuild an event from a kind and an optional state.
    ///
    /// A state supplied for a kind without payload is ignored; a missing state
    /// for a payload-carrying kind is an error.
    pub fn from_parts(kind: LifecycleEventKind, state: Option<EngineState>) -> Result<Self> {
        let require = |state: Option<EngineState>| {
            state.ok_or_else(|| {
                BridgeError::OperationFailed(format!("{kind} requires an engine state payload"))
            })
        };

        Ok(match kind {
            LifecycleEventKind::EngineCreated => LifecycleEvent::EngineCreated,
            LifecycleEventKind::EngineWillEnable => LifecycleEvent::EngineWillEnable(require(state)?),
            LifecycleEventKind::EngineWillStart => LifecycleEvent::EngineWillStart(require(state)?),
            LifecycleEventKind::EngineDidStop => LifecycleEvent::EngineDidStop(require(state)?),
            LifecycleEventKind::EngineDidDisable => LifecycleEvent::EngineDidDisable(require(state)?),
            LifecycleEventKind::EngineWillRelease => LifecycleEvent::EngineWillRelease,
        })
    }
}

/// Integer returned to the engine when a delegate callback completes.
///
/// `0` lets the engine proceed; any other value is an engine-specific error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionCode(i64);

impl CompletionCode {
    pub const SUCCESS: CompletionCode = CompletionCode(0);
    /// Handler failed without an explicit integer code.
    pub const HANDLER_FAILED: CompletionCode = CompletionCode(-1);
    /// Default code reported when an optional handler deadline elapses.
    pub const TIMED_OUT: CompletionCode = CompletionCode(-2);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for CompletionCode {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<CompletionCode> for i64 {
    fn from(code: CompletionCode) -> Self {
        code.0
    }
}

impl fmt::Display for CompletionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Voice activity transition reported while the microphone is muted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechActivity {
    Started,
    Ended,
}

/// Body of the speech activity notification: `{ "event": "started" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechActivityPayload {
    pub event: SpeechActivity,
}

/// Voice-processing flags reported when the engine reconfigures processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioProcessingState {
    pub voice_processing_enabled: bool,
    pub voice_processing_bypassed: bool,
    #[serde(rename = "voiceProcessingAGCEnabled")]
    pub voice_processing_agc_enabled: bool,
    pub stereo_playout_enabled: bool,
}

// ============================================================================
// Capability results
// ============================================================================

/// Microphone mute strategy used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum MuteMode {
    Unknown,
    VoiceProcessing,
    RestartEngine,
    InputMixer,
}

impl From<i64> for MuteMode {
    fn from(value: i64) -> Self {
        match value {
            0 => MuteMode::VoiceProcessing,
            1 => MuteMode::RestartEngine,
            2 => MuteMode::InputMixer,
            _ => MuteMode::Unknown,
        }
    }
}

impl From<MuteMode> for i64 {
    fn from(mode: MuteMode) -> Self {
        match mode {
            MuteMode::Unknown => -1,
            MuteMode::VoiceProcessing => 0,
            MuteMode::RestartEngine => 1,
            MuteMode::InputMixer => 2,
        }
    }
}

/// `{ success }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
}

/// `{ success, enabled }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleResult {
    pub success: bool,
    pub enabled: bool,
}

/// `{ success, muted }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteResult {
    pub success: bool,
    pub muted: bool,
}

/// `{ success, mode }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteModeResult {
    pub success: bool,
    pub mode: MuteMode,
}

/// `{ success, level }` where level is the ducking percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuckingLevelResult {
    pub success: bool,
    pub level: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_channels_are_distinct() {
        let mut names: Vec<_> = LifecycleEventKind::ALL
            .iter()
            .map(|k| k.resolve_name())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), LifecycleEventKind::COUNT);
    }

    #[test]
    fn slot_indices_cover_all_kinds() {
        for (i, kind) in LifecycleEventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn payload_shape_per_kind() {
        assert!(!LifecycleEventKind::EngineCreated.carries_payload());
        assert!(!LifecycleEventKind::EngineWillRelease.carries_payload());
        assert!(LifecycleEventKind::EngineWillEnable.carries_payload());
        assert!(LifecycleEventKind::EngineDidDisable.carries_payload());
    }

    #[test]
    fn native_name_lookup() {
        assert_eq!(
            LifecycleEventKind::from_native_name("engineDidStop"),
            Some(LifecycleEventKind::EngineDidStop)
        );
        assert_eq!(LifecycleEventKind::from_native_name("engineExploded"), None);
    }

    #[test]
    fn engine_state_uses_native_field_names() {
        let state: EngineState =
            serde_json::from_str(r#"{"isPlayoutEnabled":true,"isRecordingEnabled":false}"#)
                .unwrap();
        assert_eq!(state, EngineState::new(true, false));
    }

    #[test]
    fn audio_processing_state_agc_field() {
        let json = r#"{
            "voiceProcessingEnabled": true,
            "voiceProcessingBypassed": false,
            "voiceProcessingAGCEnabled": true,
            "stereoPlayoutEnabled": false
        }"#;
        let state: AudioProcessingState = serde_json::from_str(json).unwrap();
        assert!(state.voice_processing_agc_enabled);
        assert!(!state.stereo_playout_enabled);
    }

    #[test]
    fn mute_mode_is_an_integer_on_the_wire() {
        assert_eq!(serde_json::to_string(&MuteMode::InputMixer).unwrap(), "2");
        assert_eq!(serde_json::to_string(&MuteMode::Unknown).unwrap(), "-1");
        let mode: MuteMode = serde_json::from_str("1").unwrap();
        assert_eq!(mode, MuteMode::RestartEngine);
        let unmapped: MuteMode = serde_json::from_str("42").unwrap();
        assert_eq!(unmapped, MuteMode::Unknown);
    }

    #[test]
    fn lifecycle_event_from_parts() {
        let state = EngineState::new(true, false);
        let event =
            LifecycleEvent::from_parts(LifecycleEventKind::EngineWillStart, Some(state)).unwrap();
        assert_eq!(event, LifecycleEvent::EngineWillStart(state));
        assert_eq!(event.kind(), LifecycleEventKind::EngineWillStart);
        assert_eq!(event.payload(), Some(state));

        let created =
            LifecycleEvent::from_parts(LifecycleEventKind::EngineCreated, Some(state)).unwrap();
        assert_eq!(created.payload(), None);

        assert!(LifecycleEvent::from_parts(LifecycleEventKind::EngineDidStop, None).is_err());
    }

    #[test]
    fn completion_code_constants() {
        assert!(CompletionCode::SUCCESS.is_success());
        assert_eq!(CompletionCode::HANDLER_FAILED.value(), -1);
        assert!(!CompletionCode::from(7).is_success());
    }
}
