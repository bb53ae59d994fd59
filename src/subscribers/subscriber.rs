//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for reacting to the runtime's
//! lifecycle events — unit workers starting and stopping, journal
//! streams ending or failing, shutdown progress.
//!
//! Each subscriber gets:
//! - a **dedicated worker task** (runs independently),
//! - a **per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`]),
//! - **panic isolation** (panics are caught and published as
//!   `EventKind::SubscriberPanicked`).
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event for this subscriber only and
//!   publishes `EventKind::SubscriberOverflow`; others are unaffected.
//! - Events are processed sequentially (FIFO) per subscriber.

use async_trait::async_trait;

use crate::config::DEFAULT_BUS_CAPACITY;
use crate::events::Event;

/// Event subscriber for runtime observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not in the publisher
    /// context. Events are delivered in FIFO order per subscriber.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in overflow/panic events.
    ///
    /// Prefer short, descriptive names (e.g. "log", "alive", "metrics").
    fn name(&self) -> &'static str;

    /// Returns the preferred queue capacity for this subscriber.
    ///
    /// Defaults to the event bus capacity
    /// ([`DEFAULT_BUS_CAPACITY`](crate::DEFAULT_BUS_CAPACITY)), so by
    /// default a subscriber can buffer as much as the bus itself. The
    /// runtime clamps capacity to a minimum of 1.
    fn queue_capacity(&self) -> usize {
        DEFAULT_BUS_CAPACITY
    }
}
