//! Line-oriented input side of the pipeline.
//!
//! - [`LineSource`]: an open, unbounded stream of text lines for one
//!   unit, with prompt termination for shutdown.
//! - [`Follow`] / [`FollowRef`]: named factory that opens a fresh
//!   [`LineSource`] per worker.
//! - [`JournalFollower`]: the real thing — `journalctl -f -u <unit>`.
//! - [`FollowFn`]: function-backed follower for tests and demos.

mod follow_fn;
mod journal;
mod source;

pub use follow_fn::FollowFn;
pub use journal::{JournalFollower, JournalSource};
pub use source::{Follow, FollowRef, LineSource};
