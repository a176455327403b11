//! Firmware Update Service
//!
//! The update channel reports what happens on it as [`UpdateEvent`]s. The
//! service drains them synchronously between pipeline cycles, tracks the
//! update state and tells the application when to hand the device over to
//! the system DFU bootloader, which receives and flashes the new image.

use heapless::Deque;

/// Failure reported by the update channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateError {
    /// Password missing or wrong
    Auth,
}

#[cfg(feature = "embedded")]
impl defmt::Format for UpdateError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Auth => defmt::write!(f, "Auth Failed"),
        }
    }
}

/// Something that happened on the update channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateEvent {
    /// An update request was accepted
    Start,
    /// The device is ready to hand over to the bootloader
    End,
    /// The update failed
    Error(UpdateError),
}

/// Source of update events
pub trait UpdateListener {
    /// Next pending event, if any
    fn poll(&mut self) -> Option<UpdateEvent>;
}

/// Listener fed by the application (queue of pending events)
pub struct QueuedListener<const N: usize> {
    events: Deque<UpdateEvent, N>,
}

impl<const N: usize> QueuedListener<N> {
    /// Create an empty queue
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
        }
    }

    /// Queue an event; the oldest one is dropped when full
    pub fn push(&mut self, event: UpdateEvent) {
        if self.events.is_full() {
            let _ = self.events.pop_front();
        }
        let _ = self.events.push_back(event);
    }

    /// Number of pending events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if no events are pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<const N: usize> Default for QueuedListener<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> UpdateListener for QueuedListener<N> {
    fn poll(&mut self) -> Option<UpdateEvent> {
        self.events.pop_front()
    }
}

/// State of the update channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UpdateStatus {
    /// No update in progress
    #[default]
    Idle,
    /// Request accepted, handover being prepared
    InProgress,
    /// Bootloader handover pending
    Complete,
    /// Last update failed
    Failed(UpdateError),
}

impl UpdateStatus {
    /// Short code used on the console
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::InProgress => "BUSY",
            Self::Complete => "DONE",
            Self::Failed(_) => "FAIL",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for UpdateStatus {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "Idle"),
            Self::InProgress => defmt::write!(f, "InProgress"),
            Self::Complete => defmt::write!(f, "Complete"),
            Self::Failed(err) => defmt::write!(f, "Failed({})", err),
        }
    }
}

/// What the application must do after servicing the channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateAction {
    /// Keep running
    Continue,
    /// Reset into the system DFU bootloader to receive a new image
    EnterBootloader,
}

/// Optionally password-protected update service
pub struct UpdateService {
    password: Option<&'static str>,
    status: UpdateStatus,
}

impl UpdateService {
    /// Create a service guarded by `password`
    #[must_use]
    pub const fn new(password: Option<&'static str>) -> Self {
        Self {
            password,
            status: UpdateStatus::Idle,
        }
    }

    /// Current state
    #[must_use]
    pub const fn status(&self) -> UpdateStatus {
        self.status
    }

    /// Check a supplied password against the configured one
    ///
    /// Without a configured password every request is accepted.
    #[must_use]
    pub fn authorize(&self, supplied: &str) -> bool {
        self.password.map_or(true, |expected| expected == supplied)
    }

    /// Apply a single event
    pub fn handle(&mut self, event: UpdateEvent) -> UpdateAction {
        match event {
            UpdateEvent::Start => {
                self.status = UpdateStatus::InProgress;
                UpdateAction::Continue
            }
            UpdateEvent::End => {
                self.status = UpdateStatus::Complete;
                UpdateAction::EnterBootloader
            }
            UpdateEvent::Error(err) => {
                self.status = UpdateStatus::Failed(err);
                UpdateAction::Continue
            }
        }
    }

    /// Drain all pending events from `listener`
    ///
    /// Returns `EnterBootloader` as soon as a handover is due; later events
    /// stay queued.
    pub fn service<L: UpdateListener + ?Sized>(&mut self, listener: &mut L) -> UpdateAction {
        while let Some(event) = listener.poll() {
            if self.handle(event) == UpdateAction::EnterBootloader {
                return UpdateAction::EnterBootloader;
            }
        }
        UpdateAction::Continue
    }
}
