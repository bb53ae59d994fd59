//! Runtime events published by the supervisor and unit workers.
//!
//! - [`Event`] / [`EventKind`]: lifecycle notifications with a global
//!   monotonic sequence number for ordering.
//! - [`Bus`]: broadcast channel the workers publish into and the
//!   supervisor's listener drains toward subscribers.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
