use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::{
    AudioEngineEndpoint, BridgeError, DuckingLevelResult, MuteMode, MuteModeResult, MuteResult,
    OperationResult, Platform, ToggleResult,
};
use core_capabilities::{AudioDeviceModule, CapabilityError};
use core_runtime::config::AdmConfig;
use mockall::mock;
use mockall::predicate::eq;
use std::sync::Arc;

mock! {
    Endpoint {}

    #[async_trait]
    impl AudioEngineEndpoint for Endpoint {
        async fn start_playout(&self) -> Result<OperationResult>;
        async fn stop_playout(&self) -> Result<OperationResult>;
        async fn start_recording(&self) -> Result<OperationResult>;
        async fn stop_recording(&self) -> Result<OperationResult>;
        async fn start_local_recording(&self) -> Result<OperationResult>;
        async fn stop_local_recording(&self) -> Result<OperationResult>;
        async fn set_microphone_muted(&self, muted: bool) -> Result<MuteResult>;
        async fn is_microphone_muted(&self) -> Result<bool>;
        async fn set_voice_processing_enabled(&self, enabled: bool) -> Result<ToggleResult>;
        async fn is_voice_processing_enabled(&self) -> Result<bool>;
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
        async fn set_ducking_level(&self, level: u8) -> Result<DuckingLevelResult>;
        async fn get_ducking_level(&self) -> Result<u8>;
    }
}

fn ios(endpoint: MockEndpoint) -> AudioDeviceModule {
    AudioDeviceModule::new(Platform::Ios, Arc::new(endpoint))
}

#[core_async::test]
async fn test_set_microphone_muted_on_unsupported_platform_makes_no_remote_call() {
    let mut endpoint = MockEndpoint::new();
    endpoint.expect_set_microphone_muted().never();

    let adm = AudioDeviceModule::new(Platform::Android, Arc::new(endpoint));
    let result = adm.set_microphone_muted(true).await;

    assert!(matches!(
        result,
        Err(CapabilityError::PlatformUnsupported {
            platform: Platform::Android,
            ..
        })
    ));
}

#[core_async::test]
async fn test_from_config_respects_platform() {
    let mut endpoint = MockEndpoint::new();
    endpoint.expect_is_playing().never();
    let config = AdmConfig::builder()
        .platform(Platform::Windows)
        .build()
        .unwrap();

    let adm = AudioDeviceModule::from_config(&config, Arc::new(endpoint));

    assert!(!adm.is_available());
    assert!(adm.is_playing().await.unwrap_err().is_platform_unsupported());
}

#[core_async::test]
async fn test_set_microphone_muted_forwards_argument_and_result() {
    let mut endpoint = MockEndpoint::new();
    endpoint
        .expect_set_microphone_muted()
        .with(eq(true))
        .times(1)
        .returning(|muted| {
            Ok(MuteResult {
                success: true,
                muted,
            })
        });

    let result = ios(endpoint).set_microphone_muted(true).await.unwrap();

    assert_eq!(
        result,
        MuteResult {
            success: true,
            muted: true
        }
    );
}

#[core_async::test]
async fn test_remote_failure_passes_through_unchanged() {
    let mut endpoint = MockEndpoint::new();
    endpoint
        .expect_start_recording()
        .times(1)
        .returning(|| Err(BridgeError::rejected("E_ADM", "Recording permission denied")));

    let err = ios(endpoint).start_recording().await.unwrap_err();

    match err {
        CapabilityError::Remote(BridgeError::Rejected { code, message }) => {
            assert_eq!(code, "E_ADM");
            assert_eq!(message, "Recording permission denied");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[core_async::test]
async fn test_unsuccessful_result_is_not_an_error() {
    let mut endpoint = MockEndpoint::new();
    endpoint
        .expect_start_playout()
        .returning(|| Ok(OperationResult { success: false }));

    let result = ios(endpoint).start_playout().await.unwrap();

    assert!(!result.success);
}

#[core_async::test]
async fn test_mute_mode_round_trip() {
    let mut endpoint = MockEndpoint::new();
    endpoint
        .expect_set_mute_mode()
        .with(eq(MuteMode::InputMixer))
        .returning(|mode| {
            Ok(MuteModeResult {
                success: true,
                mode,
            })
        });
    endpoint
        .expect_get_mute_mode()
        .returning(|| Ok(MuteMode::VoiceProcessing));

    let adm = ios(endpoint);

    assert_eq!(
        adm.set_mute_mode(MuteMode::InputMixer).await.unwrap().mode,
        MuteMode::InputMixer
    );
    assert_eq!(adm.get_mute_mode().await.unwrap(), MuteMode::VoiceProcessing);
}

#[core_async::test]
async fn test_ducking_level_passed_unvalidated() {
    let mut endpoint = MockEndpoint::new();
    endpoint
        .expect_set_ducking_level()
        .with(eq(150u8))
        .times(1)
        .returning(|level| {
            Ok(DuckingLevelResult {
                success: false,
                level,
            })
        });
    endpoint.expect_get_ducking_level().returning(|| Ok(40));

    let adm = ios(endpoint);

    assert_eq!(adm.set_ducking_level(150).await.unwrap().level, 150);
    assert_eq!(adm.get_ducking_level().await.unwrap(), 40);
}

#[core_async::test]
async fn test_voice_processing_toggles() {
    let mut endpoint = MockEndpoint::new();
    endpoint
        .expect_set_voice_processing_enabled()
        .with(eq(false))
        .returning(|enabled| {
            Ok(ToggleResult {
                success: true,
                enabled,
            })
        });
    endpoint
        .expect_set_voice_processing_bypassed()
        .with(eq(true))
        .times(1)
        .returning(|_| Ok(()));
    endpoint
        .expect_is_voice_processing_bypassed()
        .returning(|| Ok(true));
    endpoint
        .expect_set_voice_processing_agc_enabled()
        .with(eq(true))
        .returning(|enabled| {
            Ok(ToggleResult {
                success: true,
                enabled,
            })
        });
    endpoint
        .expect_is_voice_processing_agc_enabled()
        .returning(|| Ok(true));

    let adm = ios(endpoint);

    assert!(!adm.set_voice_processing_enabled(false).await.unwrap().enabled);
    adm.set_voice_processing_bypassed(true).await.unwrap();
    assert!(adm.is_voice_processing_bypassed().await.unwrap());
    assert!(adm.set_voice_processing_agc_enabled(true).await.unwrap().enabled);
    assert!(adm.is_voice_processing_agc_enabled().await.unwrap());
}

#[core_async::test]
async fn test_queries_are_fresh_round_trips() {
    let mut endpoint = MockEndpoint::new();
    let mut running = vec![true, false].into_iter();
    endpoint
        .expect_is_engine_running()
        .times(2)
        .returning(move || Ok(running.next().unwrap_or(false)));

    let adm = ios(endpoint);

    assert!(adm.is_engine_running().await.unwrap());
    assert!(!adm.is_engine_running().await.unwrap());
}
