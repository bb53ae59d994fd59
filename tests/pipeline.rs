//! End-to-end pipeline runs: supervisor + in-memory sources.

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use svctail::{
    AliveTracker, Config, FollowFn, LineSource, ServiceSpec, SourceError, Subscribe, Supervisor,
};

/// Replays a fixed script, then reports end-of-stream.
struct ScriptedSource {
    lines: VecDeque<String>,
    dead: bool,
}

impl ScriptedSource {
    fn boxed(lines: &[&str]) -> Box<dyn LineSource> {
        Box::new(Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            dead: false,
        })
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

/// Blocks until terminated, like a journal follower for a quiet unit.
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

fn supervisor_for(dir: &Path) -> (Supervisor, Config) {
    let cfg = Config {
        log_dir: dir.to_path_buf(),
        grace: Duration::from_secs(5),
        ..Config::default()
    };
    let alive = Arc::new(AliveTracker::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![alive.clone()];
    (Supervisor::new(cfg.clone(), subs, alive), cfg)
}

fn payloads(path: &Path) -> Vec<String> {
    let contents = std::fs::read_to_string(path).unwrap();
    contents
        .lines()
        .map(|l| l.splitn(2, " - ").nth(1).unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn run_drains_naturally_when_sources_end() {
    let dir = tempfile::tempdir().unwrap();
    let (sup, cfg) = supervisor_for(dir.path());

    let specs = vec![
        ServiceSpec::with_defaults(
            FollowFn::arc("alpha.service", || async {
                Ok::<_, SourceError>(ScriptedSource::boxed(&["a", "a", "a", "b"]))
            }),
            &cfg,
        ),
        ServiceSpec::with_defaults(
            FollowFn::arc("beta.service", || async {
                Ok::<_, SourceError>(ScriptedSource::boxed(&["x"]))
            }),
            &cfg,
        ),
    ];

    let res = tokio::time::timeout(Duration::from_secs(5), sup.run(specs))
        .await
        .expect("run must return once all sources end");
    assert!(res.is_ok());

    assert_eq!(
        payloads(&dir.path().join("alpha.service.log")),
        vec![
            "a",
            "Suppressed 2 duplicate messages",
            "b",
            "Stopped logging for alpha.service"
        ]
    );
    assert_eq!(
        payloads(&dir.path().join("beta.service.log")),
        vec!["x", "Stopped logging for beta.service"]
    );
}

#[tokio::test]
async fn shutdown_request_stops_hanging_workers() {
    let dir = tempfile::tempdir().unwrap();
    let (sup, cfg) = supervisor_for(dir.path());
    let sup = Arc::new(sup);

    let specs = vec![ServiceSpec::with_defaults(
        FollowFn::arc("quiet.service", || async {
            Ok::<_, SourceError>(Box::new(HangingSource { dead: false }) as Box<dyn LineSource>)
        }),
        &cfg,
    )];

    let trigger = Arc::clone(&sup);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.shutdown();
    });

    let res = tokio::time::timeout(Duration::from_secs(5), sup.run(specs))
        .await
        .expect("shutdown must unblock the hanging worker");
    assert!(res.is_ok());

    assert_eq!(
        payloads(&dir.path().join("quiet.service.log")),
        vec!["Stopped logging for quiet.service"]
    );
}

#[tokio::test]
async fn one_failed_unit_does_not_stop_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let (sup, cfg) = supervisor_for(dir.path());

    let specs = vec![
        ServiceSpec::with_defaults(
            FollowFn::arc("broken.service", || async {
                Err::<Box<dyn LineSource>, _>(SourceError::Read {
                    source: io::Error::new(io::ErrorKind::NotFound, "journalctl missing"),
                })
            }),
            &cfg,
        ),
        ServiceSpec::with_defaults(
            FollowFn::arc("healthy.service", || async {
                Ok::<_, SourceError>(ScriptedSource::boxed(&["fine"]))
            }),
            &cfg,
        ),
    ];

    let res = tokio::time::timeout(Duration::from_secs(5), sup.run(specs))
        .await
        .unwrap();
    assert!(res.is_ok(), "a single startup failure is contained");

    assert_eq!(
        payloads(&dir.path().join("healthy.service.log")),
        vec!["fine", "Stopped logging for healthy.service"]
    );
    assert!(!dir.path().join("broken.service.log").exists());
}

#[tokio::test]
async fn all_units_failing_at_startup_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (sup, cfg) = supervisor_for(dir.path());

    let specs = vec![ServiceSpec::with_defaults(
        FollowFn::arc("broken.service", || async {
            Err::<Box<dyn LineSource>, _>(SourceError::Read {
                source: io::Error::new(io::ErrorKind::NotFound, "journalctl missing"),
            })
        }),
        &cfg,
    )];

    let err = sup.run(specs).await.expect_err("no unit started");
    assert_eq!(err.as_label(), "runtime_all_services_failed");
}
