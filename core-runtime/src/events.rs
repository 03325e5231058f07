//! # Engine Event Types
//!
//! Strongly-typed notifications emitted by the native audio engine.
//!
//! ## Overview
//!
//! The native module emits `(name, body)` pairs. [`AdmEvent::from_native`]
//! decodes them into [`AdmEvent`] values, which the
//! [`NotificationChannel`](crate::notifications::NotificationChannel) fans out
//! to listeners registered for the matching [`EventName`].
//!
//! ## Event Types
//!
//! | Event | Native name | Payload |
//! |-------|-------------|---------|
//! | Speech activity | `audioDeviceModuleSpeechActivity` | `{ event: "started" \| "ended" }` |
//! | Devices updated | `audioDeviceModuleDevicesUpdated` | none |
//! | Processing state | `audioDeviceModuleAudioProcessingStateUpdated` | voice-processing flags |
//! | Lifecycle | `audioDeviceModuleEngine*` | none or engine state |

use crate::error::{Error, Result};
use bridge_traits::{
    AudioProcessingState, EngineState, LifecycleEvent, LifecycleEventKind, SpeechActivityPayload,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a notification, used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    SpeechActivity,
    DevicesUpdated,
    AudioProcessingStateUpdated,
    Lifecycle(LifecycleEventKind),
}

impl EventName {
    pub const ALL: [EventName; 9] = [
        EventName::SpeechActivity,
        EventName::DevicesUpdated,
        EventName::AudioProcessingStateUpdated,
        EventName::Lifecycle(LifecycleEventKind::EngineCreated),
        EventName::Lifecycle(LifecycleEventKind::EngineWillEnable),
        EventName::Lifecycle(LifecycleEventKind::EngineWillStart),
        EventName::Lifecycle(LifecycleEventKind::EngineDidStop),
        EventName::Lifecycle(LifecycleEventKind::EngineDidDisable),
        EventName::Lifecycle(LifecycleEventKind::EngineWillRelease),
    ];

    /// Event name used by the native event emitter.
    pub fn native_name(self) -> &'static str {
        match self {
            EventName::SpeechActivity => "audioDeviceModuleSpeechActivity",
            EventName::DevicesUpdated => "audioDeviceModuleDevicesUpdated",
            EventName::AudioProcessingStateUpdated => {
                "audioDeviceModuleAudioProcessingStateUpdated"
            }
            EventName::Lifecycle(kind) => match kind {
                LifecycleEventKind::EngineCreated => "audioDeviceModuleEngineCreated",
                LifecycleEventKind::EngineWillEnable => "audioDeviceModuleEngineWillEnable",
                LifecycleEventKind::EngineWillStart => "audioDeviceModuleEngineWillStart",
                LifecycleEventKind::EngineDidStop => "audioDeviceModuleEngineDidStop",
                LifecycleEventKind::EngineDidDisable => "audioDeviceModuleEngineDidDisable",
                LifecycleEventKind::EngineWillRelease => "audioDeviceModuleEngineWillRelease",
            },
        }
    }

    pub fn from_native_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.native_name() == name)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.native_name())
    }
}

/// A one-way notification from the native audio engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum AdmEvent {
    /// Voice activity detected or ended while muted.
    SpeechActivity(SpeechActivityPayload),
    /// Input or output device topology changed.
    DevicesUpdated,
    /// Voice-processing configuration changed.
    AudioProcessingStateUpdated(AudioProcessingState),
    /// Mirror of a lifecycle delegate invocation.
    Lifecycle(LifecycleEvent),
}

impl AdmEvent {
    pub fn name(&self) -> EventName {
        match self {
            AdmEvent::SpeechActivity(_) => EventName::SpeechActivity,
            AdmEvent::DevicesUpdated => EventName::DevicesUpdated,
            AdmEvent::AudioProcessingStateUpdated(_) => EventName::AudioProcessingStateUpdated,
            AdmEvent::Lifecycle(event) => EventName::Lifecycle(event.kind()),
        }
    }

    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &'static str {
        match self {
            AdmEvent::SpeechActivity(_) => "Speech activity changed",
            AdmEvent::DevicesUpdated => "Audio devices updated",
            AdmEvent::AudioProcessingStateUpdated(_) => "Audio processing state updated",
            AdmEvent::Lifecycle(event) => match event.kind() {
                LifecycleEventKind::EngineCreated => "Audio engine created",
                LifecycleEventKind::EngineWillEnable => "Audio engine will enable",
                LifecycleEventKind::EngineWillStart => "Audio engine will start",
                LifecycleEventKind::EngineDidStop => "Audio engine stopped",
                LifecycleEventKind::EngineDidDisable => "Audio engine disabled",
                LifecycleEventKind::EngineWillRelease => "Audio engine will release",
            },
        }
    }

    /// Decodes a native `(name, body)` pair.
    ///
    /// Bodies are ignored for events without payload, so the emitter may send
    /// `null` or `{}` for them.
    pub fn from_native(name: &str, body: serde_json::Value) -> Result<Self> {
        let event_name =
            EventName::from_native_name(name).ok_or_else(|| Error::UnknownEvent(name.to_string()))?;

        let decode_err = |source| Error::Payload {
            event: name.to_string(),
            source,
        };

        let event = match event_name {
            EventName::SpeechActivity => {
                AdmEvent::SpeechActivity(serde_json::from_value(body).map_err(decode_err)?)
            }
            EventName::DevicesUpdated => AdmEvent::DevicesUpdated,
            EventName::AudioProcessingStateUpdated => AdmEvent::AudioProcessingStateUpdated(
                serde_json::from_value(body).map_err(decode_err)?,
            ),
            EventName::Lifecycle(kind) => {
                let state = if kind.carries_payload() {
                    Some(serde_json::from_value::<EngineState>(body).map_err(decode_err)?)
                } else {
                    None
                };
                let event = LifecycleEvent::from_parts(kind, state)
                    .map_err(|e| Error::Internal(e.to_string()))?;
                AdmEvent::Lifecycle(event)
            }
        };

        Ok(event)
    }
}
