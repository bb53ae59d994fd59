//! # Supervisor: fans out unit workers, fans in shutdown.
//!
//! The [`Supervisor`] owns the event bus, a [`SubscriberSet`], and the
//! global runtime configuration. It opens a journal source and a
//! rotating sink for every configured unit, spawns one worker per
//! unit, and propagates a single shared cancellation token on shutdown.
//!
//! ## High-level flow
//! ```text
//! Inputs to run():
//!   Vec<ServiceSpec>  ──►  Supervisor::run
//!
//! Startup (per spec):
//!   follow.follow()  → Box<dyn LineSource>     (journalctl -f -u <unit>)
//!   RotatingSink::create(log_dir/<unit>.log)
//!   ServiceWorker::new(...)  → set.spawn(worker.run(child_token))
//!   any failure  → ServiceSkipped event, unit dropped, others proceed
//!   all failed   → RuntimeError::AllServicesFailed
//!
//! Shutdown path:
//!   OS signal | Supervisor::shutdown()
//!     └─► publish ShutdownRequested
//!     └─► runtime_token.cancel()    → workers terminate their sources,
//!                                     flush summaries, write stop markers
//!     └─► wait_all_with_grace(cfg.grace):
//!            ├─ Ok       → publish AllStoppedWithin
//!            └─ Timeout  → publish GraceExceeded
//!                          (AliveTracker names the stuck units)
//! ```
//!
//! Per-unit errors after startup never reach `run`'s return value; the
//! exit status only reflects whole-runtime failures.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::config::Config;
use crate::core::{shutdown, worker::ServiceWorker};
use crate::error::{RuntimeError, ServiceError};
use crate::events::{Bus, Event, EventKind};
use crate::logger::ServiceLogger;
use crate::sink::RotatingSink;
use crate::spec::ServiceSpec;
use crate::subscribers::{AliveTracker, Subscribe, SubscriberSet};

/// Coordinates unit workers, event delivery, and graceful shutdown.
pub struct Supervisor {
    /// Global runtime configuration.
    pub cfg: Config,
    /// Event bus shared with all workers.
    pub bus: Bus,
    /// Fan-out set for subscribers.
    pub subs: Arc<SubscriberSet>,
    /// Handle to the alive-tracker used for the stuck-unit snapshot
    /// (same instance is in `subs`).
    pub alive: Arc<AliveTracker>,
    /// Programmatic shutdown request; cancelled at most once logically.
    stop: CancellationToken,
}

impl Supervisor {
    /// Creates a new supervisor with the given config and subscribers.
    ///
    /// `alive` **must** be the same instance as the one included in
    /// `subscribers` (it is added if absent).
    pub fn new(
        cfg: Config,
        mut subscribers: Vec<Arc<dyn Subscribe>>,
        alive: Arc<AliveTracker>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity);

        let has_alive = subscribers
            .iter()
            .any(|s| std::ptr::eq::<dyn Subscribe>(&**s as _, &*alive as &dyn Subscribe));
        if !has_alive {
            subscribers.push(alive.clone());
        }

        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        Self {
            cfg,
            bus,
            subs,
            alive,
            stop: CancellationToken::new(),
        }
    }

    /// Requests shutdown, exactly as an OS termination signal would.
    ///
    /// Idempotent: repeated calls have no additional effect.
    pub fn shutdown(&self) {
        self.stop.cancel();
    }

    /// Runs the provided unit specifications until either:
    /// - all workers exit on their own (sources ended), or
    /// - a termination signal or [`shutdown`](Self::shutdown) arrives →
    ///   graceful shutdown (may end with `GraceExceeded`).
    ///
    /// Returns `AllServicesFailed` when no unit could be started.
    pub async fn run(&self, services: Vec<ServiceSpec>) -> Result<(), RuntimeError> {
        let token = CancellationToken::new();
        self.subscriber_listener();

        let mut set = JoinSet::new();
        let total = services.len();
        let mut failed = 0usize;
        for spec in services {
            if let Err(e) = self.spawn_worker(&mut set, &token, &spec).await {
                failed += 1;
                self.bus.publish(
                    Event::now(EventKind::ServiceSkipped)
                        .with_service(spec.unit().to_owned())
                        .with_reason(e.to_string()),
                );
                error!(unit = spec.unit(), error = %e, label = e.as_label(), "unit failed at startup");
            }
        }
        if total > 0 && failed == total {
            return Err(RuntimeError::AllServicesFailed { failed });
        }

        self.drive_shutdown(&mut set, &token).await
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }

    /// Opens one unit's source and sink and spawns its worker.
    async fn spawn_worker(
        &self,
        set: &mut JoinSet<()>,
        runtime_token: &CancellationToken,
        spec: &ServiceSpec,
    ) -> Result<(), ServiceError> {
        let unit = spec.unit().to_owned();
        let source = spec.follow().follow().await?;
        let path = self.cfg.log_dir.join(format!("{unit}.log"));
        let sink = RotatingSink::create(path, spec.rotate_bytes(), spec.keep_files())?;
        let logger = ServiceLogger::new(unit, sink);

        let worker = ServiceWorker::new(logger, source, self.bus.clone());
        set.spawn(worker.run(runtime_token.child_token()));
        Ok(())
    }

    /// Waits until either all workers finish or shutdown is requested.
    async fn drive_shutdown(
        &self,
        set: &mut JoinSet<()>,
        runtime_token: &CancellationToken,
    ) -> Result<(), RuntimeError> {
        let requested = async {
            tokio::select! {
                _ = shutdown::wait_for_shutdown_signal() => {},
                _ = self.stop.cancelled() => {},
            }
        };

        tokio::select! {
            _ = requested => {
                self.bus.publish(Event::now(EventKind::ShutdownRequested));
                runtime_token.cancel();
                self.wait_all_with_grace(set).await
            }
            _ = async { while set.join_next().await.is_some() {} } => {
                Ok(())
            }
        }
    }

    /// Waits for all workers to finish within the configured grace.
    ///
    /// Publishes [`EventKind::AllStoppedWithin`] on success, or
    /// [`EventKind::GraceExceeded`] on timeout and returns
    /// [`RuntimeError::GraceExceeded`] naming the stuck units.
    async fn wait_all_with_grace(&self, set: &mut JoinSet<()>) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let done = async { while set.join_next().await.is_some() {} };
        match tokio::time::timeout(grace, done).await {
            Ok(_) => {
                self.bus.publish(Event::now(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                self.bus.publish(Event::now(EventKind::GraceExceeded));
                let stuck = self.alive.snapshot();
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }
}
