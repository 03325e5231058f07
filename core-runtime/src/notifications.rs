//! # Notification Channel
//!
//! One-way fan-out of engine notifications to application listeners.
//!
//! ## Overview
//!
//! - **Listeners** are plain callbacks registered per [`EventName`]. Delivery
//!   is synchronous, in registration order, and never awaited, so the native
//!   emitter is not held up by application code.
//! - **Subscriptions** own a registration until [`Subscription::cancel`] is
//!   called. Dropping a subscription does not cancel it.
//! - **Streams** mirror every emitted event onto a `broadcast` channel for
//!   async consumers (see [`EventStream`]).
//!
//! Nothing is buffered for listeners: an event fired with no listener for its
//! name is dropped.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  emit_native   ┌─────────────────────┐  callback  ┌────────────┐
//! │ Native event ├───────────────>│                     ├───────────>│ Listener 1 │
//! │   emitter    │                │ NotificationChannel │            └────────────┘
//! └──────────────┘                │                     │  callback  ┌────────────┐
//!                                 │                     ├───────────>│ Listener 2 │
//! ┌──────────────┐  emit          │                     │            └────────────┘
//! │ Delegate     ├───────────────>│                     │  broadcast ┌────────────┐
//! │ bridge       │                │                     ├───────────>│ EventStream│
//! └──────────────┘                └─────────────────────┘            └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::notifications::AudioDeviceModuleEvents;
//! use bridge_traits::Platform;
//!
//! let events = AudioDeviceModuleEvents::new(Platform::Ios, 16);
//! events.setup_listeners();
//!
//! let subscription = events
//!     .add_devices_updated_listener(|| println!("devices changed"))
//!     .unwrap();
//!
//! // ... later
//! subscription.cancel();
//! ```

use crate::config::AdmConfig;
use crate::error::{Error, Result};
use crate::events::{AdmEvent, EventName};
use bridge_traits::{
    AudioProcessingState, EngineState, LifecycleEventKind, Platform,
    SpeechActivityPayload,
};
use core_async::sync::broadcast;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use tracing::{debug, trace, warn};

pub use core_async::sync::broadcast::error::RecvError;

/// Callback invoked for each matching event.
pub type Listener = Arc<dyn Fn(&AdmEvent) + Send + Sync>;

struct ListenerEntry {
    id: u64,
    name: EventName,
    listener: Listener,
}

struct ChannelInner {
    listeners: Mutex<Vec<ListenerEntry>>,
    next_id: AtomicU64,
    stream: broadcast::Sender<AdmEvent>,
}

impl ChannelInner {
    fn listeners(&self) -> MutexGuard<'_, Vec<ListenerEntry>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: u64) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|entry| entry.id != id);
        listeners.len() != before
    }
}

// ============================================================================
// Notification Channel
// ============================================================================

/// Listener registry and fan-out for engine notifications.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct NotificationChannel {
    inner: Arc<ChannelInner>,
}

impl NotificationChannel {
    /// Creates a channel whose stream side buffers `capacity` events per
    /// stream subscriber.
    pub fn new(capacity: usize) -> Self {
        let (stream, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(ChannelInner {
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                stream,
            }),
        }
    }

    /// Registers `listener` for events named `name`.
    ///
    /// Several listeners may share a name; they are called in registration
    /// order.
    pub fn subscribe<F>(&self, name: EventName, listener: F) -> Subscription
    where
        F: Fn(&AdmEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners().push(ListenerEntry {
            id,
            name,
            listener: Arc::new(listener),
        });
        trace!(event = %name, id, "listener registered");

        Subscription {
            id,
            name,
            channel: Arc::downgrade(&self.inner),
            active: AtomicBool::new(true),
        }
    }

    /// Delivers `event` to every listener registered for its name and to
    /// stream subscribers.
    ///
    /// Returns the number of listeners invoked. The registry lock is not held
    /// while listeners run, so a listener may subscribe or cancel. A panicking
    /// listener is skipped; later listeners still run.
    pub fn emit(&self, event: AdmEvent) -> usize {
        let name = event.name();
        let targets: Vec<Listener> = self
            .inner
            .listeners()
            .iter()
            .filter(|entry| entry.name == name)
            .map(|entry| Arc::clone(&entry.listener))
            .collect();

        for listener in &targets {
            if panic::catch_unwind(AssertUnwindSafe(|| listener(&event))).is_err() {
                warn!(event = %name, "notification listener panicked");
            }
        }

        // No stream subscribers means the event is simply dropped.
        let _ = self.inner.stream.send(event);

        trace!(event = %name, delivered = targets.len(), "notification emitted");
        targets.len()
    }

    /// Decodes a native `(name, body)` pair and emits it.
    pub fn emit_native(&self, name: &str, body: serde_json::Value) -> Result<usize> {
        let event = AdmEvent::from_native(name, body)?;
        Ok(self.emit(event))
    }

    pub fn listener_count(&self, name: EventName) -> usize {
        self.inner
            .listeners()
            .iter()
            .filter(|entry| entry.name == name)
            .count()
    }

    /// Opens an async stream of every event emitted from now on.
    pub fn stream(&self) -> EventStream {
        EventStream::new(self.inner.stream.subscribe())
    }

    /// Whether `self` and `other` share the same registry.
    pub fn same_channel(&self, other: &NotificationChannel) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("listeners", &self.inner.listeners().len())
            .field("stream_subscribers", &self.inner.stream.receiver_count())
            .finish()
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// Handle to a listener registration.
///
/// The registration lives until [`cancel`](Subscription::cancel) is called
/// or the channel itself is dropped; it is deliberately not tied to the
/// lifetime of this handle.
pub struct Subscription {
    id: u64,
    name: EventName,
    channel: Weak<ChannelInner>,
    active: AtomicBool,
}

impl Subscription {
    /// Stops delivery to this listener. Idempotent.
    pub fn cancel(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(channel) = self.channel.upgrade() {
            if channel.remove(self.id) {
                trace!(event = %self.name, id = self.id, "listener cancelled");
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire) && self.channel.strong_count() > 0
    }

    pub fn event_name(&self) -> EventName {
        self.name
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("event", &self.name)
            .field("active", &self.is_active())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&AdmEvent) -> bool + Send + Sync>;

/// Async view over the notification stream with optional filtering.
///
/// Slow consumers receive [`RecvError::Lagged`] and may continue.
pub struct EventStream {
    receiver: broadcast::Receiver<AdmEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: broadcast::Receiver<AdmEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&AdmEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter (if any).
    pub async fn recv(&mut self) -> std::result::Result<AdmEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<std::result::Result<AdmEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Audio Device Module Events
// ============================================================================

/// Application-facing entry point for engine notifications.
///
/// Holds at most one [`NotificationChannel`], created by the first successful
/// [`setup_listeners`](Self::setup_listeners) call. On platforms without the
/// native engine no channel is ever created and every `add_*` call fails.
pub struct AudioDeviceModuleEvents {
    platform: Platform,
    capacity: usize,
    channel: OnceLock<NotificationChannel>,
}

impl AudioDeviceModuleEvents {
    pub fn new(platform: Platform, capacity: usize) -> Self {
        Self {
            platform,
            capacity,
            channel: OnceLock::new(),
        }
    }

    pub fn from_config(config: &AdmConfig) -> Self {
        Self::new(config.platform, config.event_buffer_size)
    }

    /// Creates the dispatch channel if the platform has the native engine.
    ///
    /// Idempotent: later calls return the channel created by the first one.
    pub fn setup_listeners(&self) -> Option<NotificationChannel> {
        if !self.platform.supports_audio_device_module() {
            debug!(platform = %self.platform, "notification channel not available");
            return None;
        }

        let channel = self.channel.get_or_init(|| {
            debug!(capacity = self.capacity, "notification channel created");
            NotificationChannel::new(self.capacity)
        });
        Some(channel.clone())
    }

    /// The channel created by [`setup_listeners`](Self::setup_listeners).
    pub fn channel(&self) -> Result<NotificationChannel> {
        self.channel
            .get()
            .cloned()
            .ok_or_else(|| Error::CapabilityMissing {
                capability: "AudioDeviceModuleEvents".to_string(),
                message: format!(
                    "Engine notifications are only available on iOS/macOS \
                     (platform: {}); call setup_listeners() first",
                    self.platform
                ),
            })
    }

    pub fn subscribe<F>(&self, name: EventName, listener: F) -> Result<Subscription>
    where
        F: Fn(&AdmEvent) + Send + Sync + 'static,
    {
        Ok(self.channel()?.subscribe(name, listener))
    }

    /// Speech activity started/ended while the microphone is muted.
    pub fn add_speech_activity_listener<F>(&self, listener: F) -> Result<Subscription>
    where
        F: Fn(&SpeechActivityPayload) + Send + Sync + 'static,
    {
        self.subscribe(EventName::SpeechActivity, move |event| {
            if let AdmEvent::SpeechActivity(payload) = event {
                listener(payload);
            }
        })
    }

    /// Input/output devices changed.
    pub fn add_devices_updated_listener<F>(&self, listener: F) -> Result<Subscription>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(EventName::DevicesUpdated, move |_| listener())
    }

    pub fn add_audio_processing_state_updated_listener<F>(
        &self,
        listener: F,
    ) -> Result<Subscription>
    where
        F: Fn(&AudioProcessingState) + Send + Sync + 'static,
    {
        self.subscribe(EventName::AudioProcessingStateUpdated, move |event| {
            if let AdmEvent::AudioProcessingStateUpdated(state) = event {
                listener(state);
            }
        })
    }

    pub fn add_engine_created_listener<F>(&self, listener: F) -> Result<Subscription>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.add_stateless_lifecycle_listener(LifecycleEventKind::EngineCreated, listener)
    }

    pub fn add_engine_will_enable_listener<F>(&self, listener: F) -> Result<Subscription>
    where
        F: Fn(&EngineState) + Send + Sync + 'static,
    {
        self.add_stateful_lifecycle_listener(LifecycleEventKind::EngineWillEnable, listener)
    }

    pub fn add_engine_will_start_listener<F>(&self, listener: F) -> Result<Subscription>
    where
        F: Fn(&EngineState) + Send + Sync + 'static,
    {
        self.add_stateful_lifecycle_listener(LifecycleEventKind::EngineWillStart, listener)
    }

    pub fn add_engine_did_stop_listener<F>(&self, listener: F) -> Result<Subscription>
    where
        F: Fn(&EngineState) + Send + Sync + 'static,
    {
        self.add_stateful_lifecycle_listener(LifecycleEventKind::EngineDidStop, listener)
    }

    pub fn add_engine_did_disable_listener<F>(&self, listener: F) -> Result<Subscription>
    where
        F: Fn(&EngineState) + Send + Sync + 'static,
    {
        self.add_stateful_lifecycle_listener(LifecycleEventKind::EngineDidDisable, listener)
    }

    pub fn add_engine_will_release_listener<F>(&self, listener: F) -> Result<Subscription>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.add_stateless_lifecycle_listener(LifecycleEventKind::EngineWillRelease, listener)
    }

    fn add_stateless_lifecycle_listener<F>(
        &self,
        kind: LifecycleEventKind,
        listener: F,
    ) -> Result<Subscription>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(EventName::Lifecycle(kind), move |_| listener())
    }

    fn add_stateful_lifecycle_listener<F>(
        &self,
        kind: LifecycleEventKind,
        listener: F,
    ) -> Result<Subscription>
    where
        F: Fn(&EngineState) + Send + Sync + 'static,
    {
        self.subscribe(EventName::Lifecycle(kind), move |event| {
            if let Some(state) = lifecycle_state(event) {
                listener(&state);
            }
        })
    }
}

fn lifecycle_state(event: &AdmEvent) -> Option<EngineState> {
    match event {
        AdmEvent::Lifecycle(lifecycle) => lifecycle.payload(),
        _ => None,
    }
}

impl fmt::Debug for AudioDeviceModuleEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioDeviceModuleEvents")
            .field("platform", &self.platform)
            .field("initialized", &self.channel.get().is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
