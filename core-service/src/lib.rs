//! Audio device module service and bootstrap helpers.
//!
//! This crate wires the host-provided native endpoint into the shared Rust
//! core: the capability facade, the notification channel and the lifecycle
//! delegate bridge. Hosts build one [`AudioDeviceModuleService`] at startup
//! and route native callbacks into it:
//!
//! | Native callback | Service entry point |
//! |-----------------|---------------------|
//! | lifecycle delegate (blocking) | [`AudioDeviceModuleService::on_lifecycle_delegate`] |
//! | event emitter `(name, body)` | [`AudioDeviceModuleService::on_native_event`] |
//!
//! ```ignore
//! let service = AudioDeviceModuleService::bootstrap(config, AdmDependencies::new(endpoint)).await?;
//! service.register_handler(LifecycleEventKind::EngineWillStart, |state| async move {
//!     prepare_session(state).await?;
//!     Ok::<(), anyhow::Error>(())
//! });
//! service.capabilities().set_microphone_muted(true).await?;
//! ```

pub mod error;

pub use error::{Result, ServiceError};

pub use bridge_traits::{
    AudioEngineEndpoint, CompletionCode, EngineState, LifecycleEvent, LifecycleEventKind, Platform,
};
pub use core_capabilities::AudioDeviceModule;
pub use core_delegate::{HandlerError, HandlerRegistry, LifecycleHandler};
pub use core_runtime::config::AdmConfig;
pub use core_runtime::notifications::{AudioDeviceModuleEvents, Subscription};

use core_async::runtime::{self, Handle};
use core_delegate::BlockingDelegateHost;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Host-provided native handles the service requires.
pub struct AdmDependencies {
    pub endpoint: Arc<dyn AudioEngineEndpoint>,
}

impl AdmDependencies {
    pub fn new(endpoint: Arc<dyn AudioEngineEndpoint>) -> Self {
        Self { endpoint }
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct AudioDeviceModuleService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    config: AdmConfig,
    capabilities: AudioDeviceModule,
    events: AudioDeviceModuleEvents,
    handlers: Arc<HandlerRegistry>,
    delegate_host: OnceLock<Arc<BlockingDelegateHost>>,
    handle: Handle,
}

impl AudioDeviceModuleService {
    /// Create a service whose delegate dispatches run on `handle`.
    pub fn new(config: AdmConfig, deps: AdmDependencies, handle: Handle) -> Result<Self> {
        config.validate()?;

        let capabilities = AudioDeviceModule::from_config(&config, deps.endpoint);
        let events = AudioDeviceModuleEvents::from_config(&config);

        info!(
            platform = %config.platform,
            engine_available = capabilities.is_available(),
            "audio device module service created"
        );

        Ok(Self {
            inner: Arc::new(ServiceInner {
                config,
                capabilities,
                events,
                handlers: Arc::new(HandlerRegistry::new()),
                delegate_host: OnceLock::new(),
                handle,
            }),
        })
    }

    /// Create a service bound to the runtime the caller is running on, and
    /// set up the notification channel and delegate bridge.
    pub async fn bootstrap(config: AdmConfig, deps: AdmDependencies) -> Result<Self> {
        let handle = runtime::current_handle().ok_or_else(|| {
            ServiceError::InitializationFailed("bootstrap requires a running async runtime".into())
        })?;

        let service = Self::new(config, deps, handle)?;
        service.setup();
        Ok(service)
    }

    /// Sets up the notification channel and the delegate bridge. Idempotent.
    pub fn setup(&self) {
        self.delegate_host();
    }

    pub fn config(&self) -> &AdmConfig {
        &self.inner.config
    }

    pub fn capabilities(&self) -> &AudioDeviceModule {
        &self.inner.capabilities
    }

    pub fn events(&self) -> &AudioDeviceModuleEvents {
        &self.inner.events
    }

    pub fn handlers(&self) -> &Arc<HandlerRegistry> {
        &self.inner.handlers
    }

    /// Replaces or clears the lifecycle handler for `kind`.
    pub fn set_handler(&self, kind: LifecycleEventKind, handler: Option<LifecycleHandler>) {
        self.inner.handlers.set_handler(kind, handler);
    }

    pub fn register_handler<F, Fut, E>(&self, kind: LifecycleEventKind, f: F)
    where
        F: Fn(Option<EngineState>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Into<HandlerError> + Send + 'static,
    {
        self.inner.handlers.register(kind, f);
    }

    /// The delegate host, created on first use.
    ///
    /// Sets up the notification channel first, so lifecycle notifications are
    /// mirrored even when a delegate callback arrives before [`setup`](Self::setup).
    pub fn delegate_host(&self) -> Arc<BlockingDelegateHost> {
        let inner = &self.inner;
        let host = inner.delegate_host.get_or_init(|| {
            let channel = inner.events.setup_listeners();
            if channel.is_none() && inner.config.publish_lifecycle_notifications {
                warn!(
                    platform = %inner.config.platform,
                    "no notification channel; lifecycle notifications disabled"
                );
            }
            debug!("delegate bridge created");
            Arc::new(BlockingDelegateHost::new(
                Arc::clone(&inner.handlers),
                &inner.config,
                channel,
                inner.handle.clone(),
            ))
        });
        Arc::clone(host)
    }

    /// Entry point for a native lifecycle delegate callback.
    ///
    /// Blocks the calling engine thread until the registered handler (if any)
    /// has finished and returns the code the engine was resolved with.
    pub fn on_lifecycle_delegate(&self, event: LifecycleEvent) -> Result<CompletionCode> {
        Ok(self.delegate_host().invoke_blocking(event)?)
    }

    /// Entry point for the native event emitter.
    ///
    /// Returns the number of listeners that received the event.
    pub fn on_native_event(&self, name: &str, body: serde_json::Value) -> Result<usize> {
        let channel = self.inner.events.channel()?;
        Ok(channel.emit_native(name, body)?)
    }
}

impl std::fmt::Debug for AudioDeviceModuleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioDeviceModuleService")
            .field("config", &self.inner.config)
            .field("capabilities", &self.inner.capabilities)
            .field("events", &self.inner.events)
            .field("handlers", &self.inner.handlers)
            .field("delegate_ready", &self.inner.delegate_host.get().is_some())
            .finish()
    }
}
