//! Event subscribers for the svctail runtime.
//!
//! Provides the [`Subscribe`] trait, the non-blocking [`SubscriberSet`]
//! fan-out, and two built-in subscribers:
//!
//! - [`LogWriter`] — renders runtime events through `tracing`.
//! - [`AliveTracker`] — tracks which unit workers are currently running
//!   (used for the stuck list when the shutdown grace is exceeded).

mod alive;
mod log;
mod set;
mod subscriber;

pub use alive::AliveTracker;
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
