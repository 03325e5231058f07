use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    DuckingLevelResult, MuteMode, MuteModeResult, MuteResult, OperationResult, ToggleResult,
};
use core_async::runtime::{Builder, Runtime};
use core_service::{
    AdmConfig, AdmDependencies, AudioDeviceModuleService, AudioEngineEndpoint, CompletionCode,
    EngineState, HandlerError, LifecycleEvent, LifecycleEventKind, Platform, ServiceError,
};
use mockall::mock;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::thread;

mock! {
    Endpoint {}

    #[async_trait]
    impl AudioEngineEndpoint for Endpoint {
        async fn start_playout(&self) -> BridgeResult<OperationResult>;
        async fn stop_playout(&self) -> BridgeResult<OperationResult>;
        async fn start_recording(&self) -> BridgeResult<OperationResult>;
        async fn stop_recording(&self) -> BridgeResult<OperationResult>;
        async fn start_local_recording(&self) -> BridgeResult<OperationResult>;
        async fn stop_local_recording(&self) -> BridgeResult<OperationResult>;
        async fn set_microphone_muted(&self, muted: bool) -> BridgeResult<MuteResult>;
        async fn is_microphone_muted(&self) -> BridgeResult<bool>;
        async fn set_voice_processing_enabled(&self, enabled: bool) -> BridgeResult<ToggleResult>;
        async fn is_voice_processing_enabled(&self) -> BridgeResult<bool>;
        async fn set_voice_processing_bypassed(&self, bypassed: bool) -> BridgeResult<()>;
        async fn is_voice_processing_bypassed(&self) -> BridgeResult<bool>;
        async fn set_voice_processing_agc_enabled(&self, enabled: bool) -> BridgeResult<ToggleResult>;
        async fn is_voice_processing_agc_enabled(&self) -> BridgeResult<bool>;
        async fn is_playing(&self) -> BridgeResult<bool>;
        async fn is_recording(&self) -> BridgeResult<bool>;
        async fn is_engine_running(&self) -> BridgeResult<bool>;
        async fn set_mute_mode(&self, mode: MuteMode) -> BridgeResult<MuteModeResult>;
        async fn get_mute_mode(&self) -> BridgeResult<MuteMode>;
        async fn set_advanced_ducking_enabled(&self, enabled: bool) -> BridgeResult<ToggleResult>;
        async fn is_advanced_ducking_enabled(&self) -> BridgeResult<bool>;
        async fn set_ducking_level(&self, level: u8) -> BridgeResult<DuckingLevelResult>;
        async fn get_ducking_level(&self) -> BridgeResult<u8>;
    }
}

fn runtime() -> Runtime {
    Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

fn config(platform: Platform) -> AdmConfig {
    AdmConfig::builder().platform(platform).build().unwrap()
}

fn bootstrap(runtime: &Runtime, platform: Platform, endpoint: MockEndpoint) -> AudioDeviceModuleService {
    runtime
        .block_on(AudioDeviceModuleService::bootstrap(
            config(platform),
            AdmDependencies::new(Arc::new(endpoint)),
        ))
        .unwrap()
}

#[test]
fn test_engine_thread_receives_handler_code() {
    let runtime = runtime();
    let service = bootstrap(&runtime, Platform::Ios, MockEndpoint::new());
    service.register_handler(LifecycleEventKind::EngineDidStop, |_| async {
        Err::<(), _>(HandlerError::Code(7))
    });

    let engine = service.clone();
    let code = thread::spawn(move || {
        engine.on_lifecycle_delegate(LifecycleEvent::EngineDidStop(EngineState::new(true, false)))
    })
    .join()
    .unwrap()
    .unwrap();

    assert_eq!(code.value(), 7);
}

#[test]
fn test_cleared_handler_resolves_success() {
    let runtime = runtime();
    let service = bootstrap(&runtime, Platform::Macos, MockEndpoint::new());
    service.register_handler(LifecycleEventKind::EngineCreated, |_| async {
        Err::<(), i64>(3)
    });
    service.set_handler(LifecycleEventKind::EngineCreated, None);

    let code = service
        .on_lifecycle_delegate(LifecycleEvent::EngineCreated)
        .unwrap();

    assert_eq!(code, CompletionCode::SUCCESS);
}

#[test]
fn test_native_events_reach_listeners_in_order() {
    let runtime = runtime();
    let service = bootstrap(&runtime, Platform::Ios, MockEndpoint::new());
    let order = Arc::new(Mutex::new(Vec::new()));

    let first_order = Arc::clone(&order);
    let first = service
        .events()
        .add_devices_updated_listener(move || first_order.lock().unwrap().push(1))
        .unwrap();
    let second_order = Arc::clone(&order);
    let _second = service
        .events()
        .add_devices_updated_listener(move || second_order.lock().unwrap().push(2))
        .unwrap();

    assert_eq!(
        service
            .on_native_event("audioDeviceModuleDevicesUpdated", json!({}))
            .unwrap(),
        2
    );
    first.cancel();
    service
        .on_native_event("audioDeviceModuleDevicesUpdated", json!({}))
        .unwrap();

    assert_eq!(*order.lock().unwrap(), vec![1, 2, 2]);
}

#[test]
fn test_lifecycle_delegate_mirrored_to_listeners() {
    let runtime = runtime();
    let service = bootstrap(&runtime, Platform::Ios, MockEndpoint::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_listener = Arc::clone(&seen);
    let _sub = service
        .events()
        .add_engine_will_enable_listener(move |state| seen_in_listener.lock().unwrap().push(*state))
        .unwrap();

    let state = EngineState::new(true, false);
    service
        .on_lifecycle_delegate(LifecycleEvent::EngineWillEnable(state))
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![state]);
}

#[test]
fn test_setup_is_idempotent() {
    let runtime = runtime();
    let service = bootstrap(&runtime, Platform::Ios, MockEndpoint::new());

    let host = service.delegate_host();
    let channel = service.events().channel().unwrap();
    service.setup();

    assert!(Arc::ptr_eq(&host, &service.delegate_host()));
    assert!(channel.same_channel(&service.events().channel().unwrap()));
}

#[test]
fn test_delegate_before_setup_still_publishes_notifications() {
    let runtime = runtime();
    let service = AudioDeviceModuleService::new(
        config(Platform::Ios),
        AdmDependencies::new(Arc::new(MockEndpoint::new())),
        runtime.handle().clone(),
    )
    .unwrap();

    let code = service
        .on_lifecycle_delegate(LifecycleEvent::EngineCreated)
        .unwrap();

    assert_eq!(code, CompletionCode::SUCCESS);
    assert!(service.events().channel().is_ok());
    assert!(service.delegate_host().bridge().publishes_notifications());

    let seen = Arc::new(Mutex::new(0));
    let seen_in_listener = Arc::clone(&seen);
    let _sub = service
        .events()
        .add_engine_will_release_listener(move || *seen_in_listener.lock().unwrap() += 1)
        .unwrap();
    service
        .on_lifecycle_delegate(LifecycleEvent::EngineWillRelease)
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), 1);
}

#[test]
fn test_unsupported_platform() {
    let runtime = runtime();
    let mut endpoint = MockEndpoint::new();
    endpoint.expect_set_microphone_muted().never();
    let service = bootstrap(&runtime, Platform::Android, endpoint);

    let muted = runtime.block_on(service.capabilities().set_microphone_muted(true));
    assert!(muted.unwrap_err().is_platform_unsupported());

    let event = service.on_native_event("audioDeviceModuleDevicesUpdated", json!({}));
    assert!(matches!(
        event,
        Err(ServiceError::Runtime(core_runtime::Error::CapabilityMissing { .. }))
    ));
}

#[test]
fn test_capability_calls_forwarded() {
    let runtime = runtime();
    let mut endpoint = MockEndpoint::new();
    endpoint
        .expect_start_playout()
        .times(1)
        .returning(|| Ok(OperationResult { success: true }));
    let service = bootstrap(&runtime, Platform::Ios, endpoint);

    let result = runtime
        .block_on(service.capabilities().start_playout())
        .unwrap();

    assert!(result.success);
}

#[test]
fn test_invalid_config_rejected() {
    let runtime = runtime();
    let mut config = config(Platform::Ios);
    config.event_buffer_size = 0;

    let result = AudioDeviceModuleService::new(
        config,
        AdmDependencies::new(Arc::new(MockEndpoint::new())),
        runtime.handle().clone(),
    );

    assert!(matches!(
        result,
        Err(ServiceError::Runtime(core_runtime::Error::Config(_)))
    ));
}
