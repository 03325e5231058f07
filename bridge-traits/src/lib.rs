//! # Native Engine Bridge Traits
//!
//! Contracts between the Rust side of the audio device module binding and the
//! native audio engine.
//!
//! ## Overview
//!
//! The native engine is an external collaborator. This crate fixes what
//! crosses the boundary and in which direction:
//!
//! | Direction | Contract |
//! |-----------|----------|
//! | facade → native | [`AudioEngineEndpoint`](engine::AudioEngineEndpoint) request/response calls |
//! | bridge → native | [`DelegateResolver`](delegate::DelegateResolver) resolve calls, one channel per lifecycle kind |
//! | native → channel | event bodies decoded into the types in [`audio`] |
//! | core → host | [`LoggerSink`](logging::LoggerSink) log mirroring |
//!
//! ## Platform Requirements
//!
//! | Platform | Engine | Status |
//! |----------|--------|--------|
//! | iOS      | WebRTC `RTCAudioDeviceModule` | ✅ |
//! | macOS    | WebRTC `RTCAudioDeviceModule` | ✅ |
//! | Android  | none | ❌ capability calls fail fast |
//!
//! ## Error Handling
//!
//! All traits use [`BridgeError`](error::BridgeError). Native rejections keep
//! their code and message so callers see exactly what the engine reported.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync`: native callbacks arrive on engine
//! threads while application code runs on the async runtime.

pub mod audio;
pub mod delegate;
pub mod engine;
pub mod error;
pub mod logging;
pub mod platform;

pub use error::BridgeError;

pub use audio::{
    AudioProcessingState, CompletionCode, DuckingLevelResult, EngineState, LifecycleEvent,
    LifecycleEventKind, MuteMode, MuteModeResult, MuteResult, OperationResult, SpeechActivity,
    SpeechActivityPayload, ToggleResult,
};
pub use delegate::DelegateResolver;
pub use engine::{AudioEngineEndpoint, CapabilityOp};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use platform::Platform;
