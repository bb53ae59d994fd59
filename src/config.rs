//! # Global runtime configuration.
//!
//! [`Config`] defines the supervisor's behavior: where per-unit log
//! files live, rotation thresholds, event bus capacity, and the
//! shutdown grace period.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use svctail::Config;
//!
//! let mut cfg = Config::default();
//! cfg.grace = Duration::from_secs(5);
//! cfg.keep_files = 10;
//!
//! assert_eq!(cfg.keep_files, 10);
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Default size threshold for the active log file (10 MiB).
pub const DEFAULT_ROTATE_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of rotated backup files kept per unit.
pub const DEFAULT_KEEP_FILES: usize = 50;

/// Default capacity of the event bus and of per-subscriber queues.
pub const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Global configuration for the runtime and supervisor.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding one rotating log file per unit.
    pub log_dir: PathBuf,
    /// Size threshold for the active file; exceeding it triggers rotation.
    pub rotate_bytes: u64,
    /// Number of rotated backup generations retained per unit.
    pub keep_files: usize,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// Maximum time to wait for workers after a shutdown request.
    pub grace: Duration,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `log_dir = "logs"` (relative to the working directory)
    /// - `rotate_bytes = 10 MiB`
    /// - `keep_files = 50`
    /// - `bus_capacity = 1024`
    /// - `grace = 10s`
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            rotate_bytes: DEFAULT_ROTATE_BYTES,
            keep_files: DEFAULT_KEEP_FILES,
            bus_capacity: DEFAULT_BUS_CAPACITY,
            grace: Duration::from_secs(10),
        }
    }
}
