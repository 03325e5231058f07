//! # Configuration
//!
//! Builder-based configuration for the audio device module binding.
//!
//! ## Overview
//!
//! [`AdmConfig`] captures the decisions that are made once per process:
//! - the deployment [`Platform`], which decides whether the native engine
//!   exists at all
//! - the optional handler deadline for lifecycle delegate callbacks
//! - notification channel sizing
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::AdmConfig;
//! use bridge_traits::Platform;
//! use std::time::Duration;
//!
//! let config = AdmConfig::builder()
//!     .platform(Platform::Ios)
//!     .handler_timeout(Duration::from_secs(5))
//!     .build()
//!     .expect("valid config");
//!
//! assert!(config.engine_available());
//! ```
//!
//! ## Handler deadline
//!
//! By default a lifecycle handler may run forever and the native thread
//! waiting on it stays parked. Setting
//! [`handler_timeout`](AdmConfigBuilder::handler_timeout) bounds that wait:
//! an elapsed deadline is reported to the engine as
//! [`timeout_code`](AdmConfigBuilder::timeout_code).

use crate::error::{Error, Result};
use bridge_traits::{CompletionCode, Platform};
use std::time::Duration;

/// Default broadcast capacity for notification stream subscribers.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Process-wide configuration for the binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmConfig {
    /// Deployment target; decides capability presence.
    pub platform: Platform,

    /// Upper bound on a lifecycle handler's run time. `None` waits forever.
    pub handler_timeout: Option<Duration>,

    /// Code reported to the engine when `handler_timeout` elapses.
    pub timeout_code: CompletionCode,

    /// Capacity of the notification broadcast stream.
    pub event_buffer_size: usize,

    /// Publish a notification for every lifecycle delegate invocation.
    pub publish_lifecycle_notifications: bool,
}

impl Default for AdmConfig {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            handler_timeout: None,
            timeout_code: CompletionCode::TIMED_OUT,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            publish_lifecycle_notifications: true,
        }
    }
}

impl AdmConfig {
    pub fn builder() -> AdmConfigBuilder {
        AdmConfigBuilder::default()
    }

    /// Whether the native audio engine exists on the configured platform.
    pub fn engine_available(&self) -> bool {
        self.platform.supports_audio_device_module()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - the timeout code is non-zero (zero would read as success)
    /// - the handler timeout, when set, is non-zero
    /// - the event buffer size is within `1..=10_000`
    pub fn validate(&self) -> Result<()> {
        if self.timeout_code.is_success() {
            return Err(Error::Config(
                "Timeout code must be non-zero; 0 tells the engine the handler succeeded"
                    .to_string(),
            ));
        }

        if self.handler_timeout == Some(Duration::ZERO) {
            return Err(Error::Config(
                "Handler timeout must be greater than 0. \
                 Leave it unset to wait for handlers indefinitely."
                    .to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

/// Builder for [`AdmConfig`].
#[derive(Debug, Default)]
pub struct AdmConfigBuilder {
    platform: Option<Platform>,
    handler_timeout: Option<Duration>,
    timeout_code: Option<CompletionCode>,
    event_buffer_size: Option<usize>,
    publish_lifecycle_notifications: Option<bool>,
}

impl AdmConfigBuilder {
    /// Overrides the detected platform.
    ///
    /// Defaults to [`Platform::current`].
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = Some(timeout);
        self
    }

    /// Default: `-2`.
    pub fn timeout_code(mut self, code: impl Into<CompletionCode>) -> Self {
        self.timeout_code = Some(code.into());
        self
    }

    /// Default: 100.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Default: `true`.
    pub fn publish_lifecycle_notifications(mut self, publish: bool) -> Self {
        self.publish_lifecycle_notifications = Some(publish);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<AdmConfig> {
        let defaults = AdmConfig::default();

        let config = AdmConfig {
            platform: self.platform.unwrap_or(defaults.platform),
            handler_timeout: self.handler_timeout,
            timeout_code: self.timeout_code.unwrap_or(defaults.timeout_code),
            event_buffer_size: self.event_buffer_size.unwrap_or(defaults.event_buffer_size),
            publish_lifecycle_notifications: self
                .publish_lifecycle_notifications
                .unwrap_or(defaults.publish_lifecycle_notifications),
        };

        config.validate()?;
        Ok(config)
    }
}
