//! # Diagnostic subscriber rendering runtime events through `tracing`.
//!
//! [`LogWriter`] turns the event stream into human-readable diagnostics
//! on the process's own log output (stderr by default). This is the
//! operator-facing channel; the per-unit log files only carry journal
//! content.
//!
//! ## Output format
//! ```text
//! INFO starting unit=nginx.service
//! WARN journal read failed unit=nginx.service reason="journalctl exited"
//! INFO stopped unit=nginx.service
//! INFO shutdown requested
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Built-in subscriber that logs every runtime event via `tracing`.
#[derive(Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    /// Creates a new log writer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let unit = e.service.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::ServiceStarting => info!(unit, "starting"),
            EventKind::ServiceStopped => info!(unit, "stopped"),
            EventKind::ServiceSkipped => error!(unit, reason, "unit skipped at startup"),
            EventKind::SourceEnded => info!(unit, "journal stream ended"),
            EventKind::SourceFailed => warn!(unit, reason, "journal read failed"),
            EventKind::SinkFailed => warn!(unit, reason, "log sink failed"),
            EventKind::ShutdownRequested => info!("shutdown requested"),
            EventKind::AllStoppedWithin => info!("all workers stopped within grace"),
            EventKind::GraceExceeded => warn!("shutdown grace exceeded"),
            EventKind::SubscriberOverflow => warn!(subscriber = unit, reason, "subscriber overflow"),
            EventKind::SubscriberPanicked => error!(subscriber = unit, reason, "subscriber panicked"),
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
