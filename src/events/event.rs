//! # Runtime events emitted by the supervisor and unit workers.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the
//! metadata (timestamp, unit name, reason). Each event gets a globally
//! unique, monotonically increasing sequence number so subscribers can
//! restore exact order even when delivery interleaves.
//!
//! ## Example
//! ```rust
//! use svctail::{Event, EventKind};
//!
//! let ev = Event::now(EventKind::SourceFailed)
//!     .with_service("nginx.service")
//!     .with_reason("journalctl exited");
//!
//! assert_eq!(ev.kind, EventKind::SourceFailed);
//! assert_eq!(ev.service.as_deref(), Some("nginx.service"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `service` (subscriber name), `reason` (panic info).
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `service` (subscriber name), `reason` ("full" / "closed").
    SubscriberOverflow,

    // === Shutdown events ===
    /// Shutdown requested (OS signal observed).
    ShutdownRequested,

    /// All workers stopped within the configured grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some workers did not stop in time.
    GraceExceeded,

    // === Unit lifecycle events ===
    /// A unit's worker started following its journal stream.
    ///
    /// Sets: `service`.
    ServiceStarting,

    /// A unit's worker finished flushing and stopped.
    ///
    /// Sets: `service`.
    ServiceStopped,

    /// A unit could not be started (source or sink construction failed).
    ///
    /// Sets: `service`, `reason`.
    ServiceSkipped,

    /// A unit's journal stream ended (follower exited cleanly).
    ///
    /// Sets: `service`.
    SourceEnded,

    /// Reading a unit's journal stream failed.
    ///
    /// Sets: `service`, `reason`.
    SourceFailed,

    /// Appending to a unit's rotating log file failed.
    ///
    /// Sets: `service`, `reason`.
    SinkFailed,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the unit (or subscriber), if applicable.
    pub service: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp
    /// and the next global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            service: None,
            reason: None,
        }
    }

    /// Attaches a unit (or subscriber) name.
    #[inline]
    pub fn with_service(mut self, service: impl Into<Arc<str>>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_service(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_service(subscriber)
            .with_reason(info)
    }

    /// True for events reporting subscriber trouble (overflow/panic).
    ///
    /// Used to break feedback: a subscriber event is never answered
    /// with another subscriber event.
    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::now(EventKind::ServiceStarting);
        let b = Event::now(EventKind::ServiceStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::now(EventKind::SinkFailed)
            .with_service("a.service")
            .with_reason("disk full");
        assert_eq!(ev.service.as_deref(), Some("a.service"));
        assert_eq!(ev.reason.as_deref(), Some("disk full"));
    }
}
