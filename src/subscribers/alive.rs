//! # AliveTracker: which unit workers are currently running.
//!
//! A stateful subscriber fed by lifecycle events. The supervisor uses
//! its [`snapshot`](AliveTracker::snapshot) to name stuck workers when
//! the shutdown grace period is exceeded.
//!
//! Events are applied in `seq` order per unit: a stale `ServiceStarting`
//! delivered after the matching `ServiceStopped` cannot resurrect an
//! entry.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Tracks running unit workers from the event stream.
#[derive(Debug, Default)]
pub struct AliveTracker {
    // unit name -> (running, seq of the last applied event)
    state: RwLock<HashMap<String, (bool, u64)>>,
}

impl AliveTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sorted names of units whose workers are still running.
    pub fn snapshot(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        let mut alive: Vec<String> = state
            .iter()
            .filter(|(_, (running, _))| *running)
            .map(|(name, _)| name.clone())
            .collect();
        alive.sort();
        alive
    }

    fn apply(&self, unit: &str, running: bool, seq: u64) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let entry = state.entry(unit.to_owned()).or_insert((running, seq));
        if seq >= entry.1 {
            *entry = (running, seq);
        }
    }
}

#[async_trait]
impl Subscribe for AliveTracker {
    async fn on_event(&self, event: &Event) {
        let Some(unit) = event.service.as_deref() else {
            return;
        };
        match event.kind {
            EventKind::ServiceStarting => self.apply(unit, true, event.seq),
            EventKind::ServiceStopped | EventKind::ServiceSkipped => {
                self.apply(unit, false, event.seq)
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "alive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracks_start_and_stop() {
        let tracker = AliveTracker::new();
        tracker
            .on_event(&Event::now(EventKind::ServiceStarting).with_service("a.service"))
            .await;
        tracker
            .on_event(&Event::now(EventKind::ServiceStarting).with_service("b.service"))
            .await;
        assert_eq!(tracker.snapshot(), vec!["a.service", "b.service"]);

        tracker
            .on_event(&Event::now(EventKind::ServiceStopped).with_service("a.service"))
            .await;
        assert_eq!(tracker.snapshot(), vec!["b.service"]);
    }

    #[tokio::test]
    async fn test_stale_start_does_not_resurrect() {
        let tracker = AliveTracker::new();
        let start = Event::now(EventKind::ServiceStarting).with_service("a.service");
        let stop = Event::now(EventKind::ServiceStopped).with_service("a.service");
        // deliver out of order
        tracker.on_event(&stop).await;
        tracker.on_event(&start).await;
        assert!(tracker.snapshot().is_empty());
    }
}
