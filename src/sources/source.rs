//! # Line source and follower capabilities.
//!
//! [`LineSource`] abstracts over whatever emits the unit's log lines —
//! a followed subprocess in production, an in-memory stream in tests —
//! so the dedup/rotation pipeline never touches process plumbing
//! directly.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SourceError;

/// An open, unbounded stream of text lines for one unit.
///
/// The blocking wait inside [`next_line`](LineSource::next_line) is the
/// pipeline's one designed suspension point. During shutdown the worker
/// both observes its cancellation token and calls
/// [`terminate`](LineSource::terminate), so a pending read resolves
/// promptly instead of hanging.
#[async_trait]
pub trait LineSource: Send {
    /// Waits for the next line. `Ok(None)` means end of stream.
    async fn next_line(&mut self) -> Result<Option<String>, SourceError>;

    /// Forces a pending or future [`next_line`](LineSource::next_line)
    /// to resolve promptly (e.g. by stopping the followed subprocess).
    /// Safe to call more than once.
    async fn terminate(&mut self);
}

/// Named factory that opens a fresh [`LineSource`] for its unit.
///
/// The supervisor holds one `Follow` per configured unit and calls
/// [`follow`](Follow::follow) when spawning the unit's worker.
#[async_trait]
pub trait Follow: Send + Sync + 'static {
    /// Returns the stable unit name this follower covers.
    fn unit(&self) -> &str;

    /// Opens the line stream for this unit.
    async fn follow(&self) -> Result<Box<dyn LineSource>, SourceError>;
}

/// Shared handle to a follower.
pub type FollowRef = Arc<dyn Follow>;
