//! # journald follower.
//!
//! [`JournalFollower`] spawns `journalctl -f -u <unit>` and exposes its
//! stdout as a [`LineSource`]. Termination kills the subprocess, which
//! closes the pipe and lets a pending read return end-of-stream.

use std::borrow::Cow;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};

use crate::error::SourceError;

use super::source::{Follow, FollowRef, LineSource};

/// Follower that streams a unit's journal via `journalctl -f`.
#[derive(Debug)]
pub struct JournalFollower {
    unit: Cow<'static, str>,
}

impl JournalFollower {
    /// Creates a follower for the given unit.
    pub fn new(unit: impl Into<Cow<'static, str>>) -> Self {
        Self { unit: unit.into() }
    }

    /// Creates the follower and returns it as a shared handle.
    pub fn arc(unit: impl Into<Cow<'static, str>>) -> FollowRef {
        Arc::new(Self::new(unit))
    }
}

#[async_trait]
impl Follow for JournalFollower {
    fn unit(&self) -> &str {
        &self.unit
    }

    async fn follow(&self) -> Result<Box<dyn LineSource>, SourceError> {
        Ok(Box::new(JournalSource::spawn(&self.unit)?))
    }
}

/// Open journal stream backed by a `journalctl` subprocess.
pub struct JournalSource {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
}

impl JournalSource {
    /// Spawns `journalctl -f -u <unit>` with a piped stdout.
    pub fn spawn(unit: &str) -> Result<Self, SourceError> {
        let mut child = Command::new("journalctl")
            .args(["-f", "-u", unit])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SourceError::Spawn {
                unit: unit.to_owned(),
                source,
            })?;
        let stdout = child.stdout.take().ok_or_else(|| SourceError::NoStdout {
            unit: unit.to_owned(),
        })?;
        Ok(Self {
            child,
            lines: BufReader::new(stdout).lines(),
        })
    }
}

#[async_trait]
impl LineSource for JournalSource {
    async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        self.lines
            .next_line()
            .await
            .map_err(|source| SourceError::Read { source })
    }

    async fn terminate(&mut self) {
        // start_kill is idempotent enough for our purposes: a second
        // call on an exited child just reports InvalidInput.
        let _ = self.child.start_kill();
        let _ = self.child.wait().await;
    }
}
