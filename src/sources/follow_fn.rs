//! # Function-backed follower (`FollowFn`).
//!
//! [`FollowFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh
//! [`LineSource`] per call. This keeps the dedup/rotation pipeline
//! testable against in-memory sources without any subprocess plumbing.
//!
//! ## Example
//! ```rust
//! use svctail::{FollowFn, FollowRef, LineSource, SourceError};
//! use async_trait::async_trait;
//!
//! struct Ended;
//!
//! #[async_trait]
//! impl LineSource for Ended {
//!     async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
//!         Ok(None)
//!     }
//!     async fn terminate(&mut self) {}
//! }
//!
//! let f: FollowRef = FollowFn::arc("demo.service", || async {
//!     Ok::<_, SourceError>(Box::new(Ended) as Box<dyn LineSource>)
//! });
//! assert_eq!(f.unit(), "demo.service");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SourceError;

use super::source::{Follow, LineSource};

/// Function-backed follower implementation.
///
/// Wraps a closure that *opens* a new line source per call.
#[derive(Debug)]
pub struct FollowFn<F> {
    unit: Cow<'static, str>,
    f: F,
}

impl<F> FollowFn<F> {
    /// Creates a new function-backed follower.
    ///
    /// Prefer [`FollowFn::arc`] when you immediately need a
    /// [`FollowRef`](super::FollowRef).
    pub fn new(unit: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { unit: unit.into(), f }
    }

    /// Creates the follower and returns it as a shared handle.
    pub fn arc(unit: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(unit, f))
    }
}

#[async_trait]
impl<F, Fut> Follow for FollowFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Box<dyn LineSource>, SourceError>> + Send + 'static,
{
    fn unit(&self) -> &str {
        &self.unit
    }

    async fn follow(&self) -> Result<Box<dyn LineSource>, SourceError> {
        (self.f)().await
    }
}
