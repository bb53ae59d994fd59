//! Error types used by the svctail runtime and per-unit pipelines.
//!
//! Two layers:
//!
//! - [`SourceError`] / [`SinkError`] — failures of one unit's journal
//!   stream or rotating file sink. These are contained: they stop the
//!   affected unit's worker and never bring down the process.
//! - [`RuntimeError`] — failures of the runtime as a whole; the only
//!   errors [`Supervisor::run`](crate::Supervisor::run) returns.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors produced by the svctail runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Every configured unit failed at startup; there is nothing to supervise.
    #[error("all {failed} configured units failed at startup")]
    AllServicesFailed {
        /// Number of units that could not be started.
        failed: usize,
    },

    /// Shutdown grace period was exceeded; some workers were still running.
    #[error("shutdown grace {grace:?} exceeded; still running: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Units whose workers did not stop in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use svctail::RuntimeError;
    ///
    /// let err = RuntimeError::AllServicesFailed { failed: 2 };
    /// assert_eq!(err.as_label(), "runtime_all_services_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::AllServicesFailed { .. } => "runtime_all_services_failed",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}

/// Errors raised while following a unit's journal stream.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SourceError {
    /// The follower subprocess could not be spawned.
    #[error("failed to spawn journal follower for '{unit}': {source}")]
    Spawn {
        /// Unit whose follower failed to start.
        unit: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The follower subprocess exposed no stdout pipe.
    #[error("journal follower for '{unit}' has no stdout")]
    NoStdout {
        /// Unit whose follower is missing stdout.
        unit: String,
    },

    /// Reading the next line from the stream failed.
    #[error("failed to read journal stream: {source}")]
    Read {
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors raised by the rotating file sink.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SinkError {
    /// The log file (or its parent directory) could not be created.
    #[error("failed to create log file '{path}': {source}")]
    Create {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Appending a record to the active file failed.
    #[error("failed to append to log file '{path}': {source}")]
    Append {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Shifting backup generations during rotation failed.
    #[error("failed to rotate log file '{path}': {source}")]
    Rotate {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Per-unit pipeline error: either the source or the sink side failed.
///
/// Contained to the unit that produced it; other units keep running.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The journal stream failed or could not be opened.
    #[error("journal source: {0}")]
    Source(#[from] SourceError),

    /// The rotating file sink failed or could not be created.
    #[error("log sink: {0}")]
    Sink(#[from] SinkError),
}

impl ServiceError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use svctail::{ServiceError, SourceError};
    ///
    /// let err = ServiceError::from(SourceError::NoStdout {
    ///     unit: "nginx.service".into(),
    /// });
    /// assert_eq!(err.as_label(), "service_source_error");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::Source(_) => "service_source_error",
            ServiceError::Sink(_) => "service_sink_error",
        }
    }
}
