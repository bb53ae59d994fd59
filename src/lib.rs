//! # svctail
//!
//! **svctail** tails the systemd journal for a set of named units,
//! collapses consecutive duplicate lines into a single annotated entry,
//! and persists the result into size-rotated per-unit log files. It
//! runs until SIGINT/SIGTERM requests a clean shutdown.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ ServiceSpec  │   │ ServiceSpec  │   │ ServiceSpec  │
//!     │ (unit #1)    │   │ (unit #2)    │   │ (unit #3)    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  Supervisor                                               │
//! │  - Bus (broadcast events)                                 │
//! │  - SubscriberSet (fans out to subscribers)                │
//! │  - AliveTracker (running units, for the stuck list)       │
//! │  - one shared CancellationToken                           │
//! └──────┬──────────────────┬──────────────────┬──────────────┘
//!        ▼                  ▼                  ▼
//!   ┌───────────┐      ┌───────────┐      ┌───────────┐
//!   │  worker   │      │  worker   │      │  worker   │
//!   └─────┬─────┘      └─────┬─────┘      └─────┬─────┘
//!         │                  │                  │
//!   journalctl -f      journalctl -f      journalctl -f
//!         │                  │                  │
//!     DedupFilter        DedupFilter        DedupFilter
//!         │                  │                  │
//!    RotatingSink       RotatingSink       RotatingSink
//!    <unit1>.log        <unit2>.log        <unit3>.log
//! ```
//!
//! Per unit, data flows source → dedup → rotating file, strictly in
//! read order, with the worker as the single writer of all per-unit
//! state. The only shared primitive is the cancellation token.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use svctail::{
//!     AliveTracker, Config, JournalFollower, LogWriter, ServiceSpec, Subscribe, Supervisor,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!
//!     let alive = Arc::new(AliveTracker::new());
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![alive.clone(), Arc::new(LogWriter::new())];
//!     let sup = Supervisor::new(cfg.clone(), subs, alive);
//!
//!     let specs = vec![
//!         ServiceSpec::with_defaults(JournalFollower::arc("nginx.service"), &cfg),
//!         ServiceSpec::with_defaults(JournalFollower::arc("sshd.service"), &cfg),
//!     ];
//!
//!     sup.run(specs).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod dedup;
mod error;
mod events;
mod logger;
mod sink;
mod sources;
mod spec;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::Supervisor;
pub use config::{Config, DEFAULT_BUS_CAPACITY, DEFAULT_KEEP_FILES, DEFAULT_ROTATE_BYTES};
pub use dedup::{DedupFilter, Verdict};
pub use error::{RuntimeError, ServiceError, SinkError, SourceError};
pub use events::{Bus, Event, EventKind};
pub use logger::ServiceLogger;
pub use sink::{LogRecord, RotatingSink};
pub use sources::{Follow, FollowFn, FollowRef, JournalFollower, JournalSource, LineSource};
pub use spec::ServiceSpec;
pub use subscribers::{AliveTracker, LogWriter, Subscribe, SubscriberSet};
