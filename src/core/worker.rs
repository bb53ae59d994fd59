//! # ServiceWorker: per-unit read/dedup/append loop.
//!
//! One worker per configured unit; the worker exclusively owns the
//! unit's [`LineSource`] and [`ServiceLogger`] (single-writer
//! discipline), so no locking is needed on the pipeline state.
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► token cancelled? → break
//!   ├─► select! { next_line | token.cancelled }
//!   │     ├─ Ok(Some(line)) → trim trailing whitespace → process()
//!   │     │                    └─ sink error → publish SinkFailed, break
//!   │     ├─ Ok(None)       → publish SourceEnded, break
//!   │     ├─ Err(e)         → publish SourceFailed, note into log, break
//!   │     └─ cancelled      → break
//! }
//! source.terminate()          (unblocks nothing left pending, kills follower)
//! logger.finish()             (summary flush + stop marker)
//! publish ServiceStopped
//! ```
//!
//! States: Running → Flushing → Stopped; `Stopped` is terminal.
//! Failures here are contained to this unit; the supervisor and the
//! other workers are unaffected.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::events::{Bus, Event, EventKind};
use crate::logger::ServiceLogger;
use crate::sources::LineSource;

/// Drives one unit's journal stream into its deduplicating logger.
pub(crate) struct ServiceWorker {
    unit: Arc<str>,
    logger: ServiceLogger,
    source: Box<dyn LineSource>,
    bus: Bus,
}

impl ServiceWorker {
    pub(crate) fn new(logger: ServiceLogger, source: Box<dyn LineSource>, bus: Bus) -> Self {
        let unit: Arc<str> = Arc::from(logger.unit());
        Self {
            unit,
            logger,
            source,
            bus,
        }
    }

    /// Runs until the source ends, an unrecoverable per-unit error
    /// occurs, or the token is cancelled; then flushes and stops.
    pub(crate) async fn run(mut self, token: CancellationToken) {
        self.publish(EventKind::ServiceStarting, None);

        loop {
            if token.is_cancelled() {
                break;
            }
            tokio::select! {
                res = self.source.next_line() => match res {
                    Ok(Some(line)) => {
                        // Trailing whitespace is trimmed exactly once,
                        // here; leading whitespace stays significant.
                        if let Err(e) = self.logger.process(line.trim_end()) {
                            self.publish(EventKind::SinkFailed, Some(e.to_string()));
                            warn!(unit = %self.unit, error = %e, "stopping unit after sink failure");
                            break;
                        }
                    }
                    Ok(None) => {
                        self.publish(EventKind::SourceEnded, None);
                        break;
                    }
                    Err(e) => {
                        self.publish(EventKind::SourceFailed, Some(e.to_string()));
                        // Best effort: leave a trace in the unit's own log.
                        let _ = self
                            .logger
                            .note(&format!("Error in journal stream for {}: {e}", self.unit));
                        break;
                    }
                },
                _ = token.cancelled() => break,
            }
        }

        self.source.terminate().await;
        if let Err(e) = self.logger.finish() {
            warn!(unit = %self.unit, error = %e, "failed to flush final records");
        }
        self.publish(EventKind::ServiceStopped, None);
    }

    fn publish(&self, kind: EventKind, reason: Option<String>) {
        let mut ev = Event::now(kind).with_service(Arc::clone(&self.unit));
        if let Some(reason) = reason {
            ev = ev.with_reason(reason);
        }
        self.bus.publish(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::io;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::SourceError;
    use crate::sink::RotatingSink;

    /// Replays a fixed script, then reports end-of-stream.
    struct ScriptedSource {
        lines: VecDeque<String>,
        dead: bool,
    }

    impl ScriptedSource {
        fn new<const N: usize>(lines: [&str; N]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                dead: false,
            }
        }
    }

    #[async_trait]
    impl LineSource for ScriptedSource {
        async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
            if self.dead {
                return Ok(None);
            }
            Ok(self.lines.pop_front())
        }

        async fn terminate(&mut self) {
            self.dead = true;
        }
    }

    /// Blocks forever until terminated, like a quiet journal follower.
    struct HangingSource {
        dead: bool,
    }

    #[async_trait]
    impl LineSource for HangingSource {
        async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
            if self.dead {
                return Ok(None);
            }
            futures::future::pending().await
        }

        async fn terminate(&mut self) {
            self.dead = true;
        }
    }

    /// Fails the first read, then reports end-of-stream.
    struct FailingSource {
        failed: bool,
    }

    #[async_trait]
    impl LineSource for FailingSource {
        async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
            if self.failed {
                return Ok(None);
            }
            self.failed = true;
            Err(SourceError::Read {
                source: io::Error::new(io::ErrorKind::BrokenPipe, "follower exited"),
            })
        }

        async fn terminate(&mut self) {}
    }

    fn worker_at(dir: &std::path::Path, source: Box<dyn LineSource>) -> ServiceWorker {
        let sink = RotatingSink::create(dir.join("demo.service.log"), 1024 * 1024, 3).unwrap();
        let logger = ServiceLogger::new("demo.service", sink);
        ServiceWorker::new(logger, source, Bus::new(16))
    }

    fn payloads(dir: &std::path::Path) -> Vec<String> {
        let contents = std::fs::read_to_string(dir.join("demo.service.log")).unwrap();
        contents
            .lines()
            .map(|l| l.splitn(2, " - ").nth(1).unwrap().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_worker_dedups_and_flushes_on_eof() {
        let dir = tempfile::tempdir().unwrap();
        let worker = worker_at(dir.path(), Box::new(ScriptedSource::new(["a", "a", "a", "b"])));

        worker.run(CancellationToken::new()).await;

        assert_eq!(
            payloads(dir.path()),
            vec![
                "a",
                "Suppressed 2 duplicate messages",
                "b",
                "Stopped logging for demo.service"
            ]
        );
    }

    #[tokio::test]
    async fn test_worker_trims_trailing_whitespace_only() {
        let dir = tempfile::tempdir().unwrap();
        let worker = worker_at(
            dir.path(),
            Box::new(ScriptedSource::new(["x  \t", "x", "  x"])),
        );

        worker.run(CancellationToken::new()).await;

        assert_eq!(
            payloads(dir.path()),
            vec![
                "x",
                "Suppressed 1 duplicate messages",
                "  x",
                "Stopped logging for demo.service"
            ]
        );
    }

    #[tokio::test]
    async fn test_worker_stops_promptly_on_cancellation() {
        let dir = tempfile::tempdir().unwrap();
        let worker = worker_at(dir.path(), Box::new(HangingSource { dead: false }));

        let token = CancellationToken::new();
        let handle = tokio::spawn(worker.run(token.child_token()));
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker must stop once cancelled")
            .unwrap();

        assert_eq!(
            payloads(dir.path()),
            vec!["Stopped logging for demo.service"]
        );
    }

    #[tokio::test]
    async fn test_worker_records_source_failure_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let worker = worker_at(dir.path(), Box::new(FailingSource { failed: false }));

        worker.run(CancellationToken::new()).await;

        let lines = payloads(dir.path());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Error in journal stream for demo.service"));
        assert_eq!(lines[1], "Stopped logging for demo.service");
    }

    #[tokio::test]
    async fn test_worker_publishes_lifecycle_events() {
        let dir = tempfile::tempdir().unwrap();
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        let sink = RotatingSink::create(dir.path().join("demo.service.log"), 1024, 3).unwrap();
        let logger = ServiceLogger::new("demo.service", sink);
        let worker = ServiceWorker::new(
            logger,
            Box::new(ScriptedSource::new(["only"])),
            bus.clone(),
        );
        worker.run(CancellationToken::new()).await;

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::ServiceStarting,
                EventKind::SourceEnded,
                EventKind::ServiceStopped
            ]
        );
    }
}
