//! # Per-unit specification for supervised log forwarding.
//!
//! [`ServiceSpec`] bundles the follower for one unit with its rotation
//! parameters. Specs are handed to
//! [`Supervisor::run`](crate::Supervisor::run), which opens the source
//! and sink and spawns the unit's worker.

use crate::config::Config;
use crate::sources::FollowRef;

/// Specification for forwarding one unit's journal under supervision.
///
/// Can be created explicitly with [`ServiceSpec::new`] or derived from
/// a global [`Config`] via [`ServiceSpec::with_defaults`].
///
/// ## Example
/// ```rust
/// use svctail::{Config, JournalFollower, ServiceSpec};
///
/// let cfg = Config::default();
/// let spec = ServiceSpec::with_defaults(JournalFollower::arc("nginx.service"), &cfg);
/// assert_eq!(spec.unit(), "nginx.service");
/// assert_eq!(spec.keep_files(), cfg.keep_files);
/// ```
#[derive(Clone)]
pub struct ServiceSpec {
    follow: FollowRef,
    rotate_bytes: u64,
    keep_files: usize,
}

impl ServiceSpec {
    /// Creates a new spec with explicit rotation parameters.
    pub fn new(follow: FollowRef, rotate_bytes: u64, keep_files: usize) -> Self {
        Self {
            follow,
            rotate_bytes,
            keep_files,
        }
    }

    /// Creates a spec inheriting rotation parameters from global config.
    pub fn with_defaults(follow: FollowRef, cfg: &Config) -> Self {
        Self {
            follow,
            rotate_bytes: cfg.rotate_bytes,
            keep_files: cfg.keep_files,
        }
    }

    /// Returns a reference to the follower.
    pub fn follow(&self) -> &FollowRef {
        &self.follow
    }

    /// Convenience: returns the unit name.
    pub fn unit(&self) -> &str {
        self.follow.unit()
    }

    /// Size threshold for this unit's active log file.
    pub fn rotate_bytes(&self) -> u64 {
        self.rotate_bytes
    }

    /// Backup generations retained for this unit.
    pub fn keep_files(&self) -> usize {
        self.keep_files
    }

    /// Returns a new spec with an updated size threshold.
    pub fn with_rotate_bytes(mut self, rotate_bytes: u64) -> Self {
        self.rotate_bytes = rotate_bytes;
        self
    }

    /// Returns a new spec with an updated retention bound.
    pub fn with_keep_files(mut self, keep_files: usize) -> Self {
        self.keep_files = keep_files;
        self
    }
}
