//! # Per-unit deduplicating logger.
//!
//! [`ServiceLogger`] ties one unit's [`DedupFilter`] to its
//! [`RotatingSink`]: raw journal lines go in, distinct records plus
//! suppression summaries come out the file. Owned exclusively by the
//! unit's worker; dedup state is discarded on stop, never persisted.

use crate::dedup::{DedupFilter, Verdict};
use crate::error::SinkError;
use crate::sink::{LogRecord, RotatingSink};

/// Stateful filter between a journal stream and its rotating log file.
#[derive(Debug)]
pub struct ServiceLogger {
    unit: String,
    filter: DedupFilter,
    sink: RotatingSink,
    finished: bool,
}

impl ServiceLogger {
    /// Creates a logger for `unit` writing into `sink`.
    pub fn new(unit: impl Into<String>, sink: RotatingSink) -> Self {
        Self {
            unit: unit.into(),
            filter: DedupFilter::new(),
            sink,
            finished: false,
        }
    }

    /// Unit this logger belongs to.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Consumes one raw line.
    ///
    /// A repeat of the previous line writes nothing. A fresh line first
    /// closes any open duplicate run with a
    /// `Suppressed <n> duplicate messages` summary, then writes the
    /// line itself.
    pub fn process(&mut self, line: &str) -> Result<(), SinkError> {
        match self.filter.push(line) {
            Verdict::Repeat => Ok(()),
            Verdict::Fresh { suppressed } => {
                if let Some(n) = suppressed {
                    self.sink.append(&LogRecord::now(summary(n)))?;
                }
                self.sink.append(&LogRecord::now(line))
            }
        }
    }

    /// Writes a diagnostic record directly, bypassing deduplication.
    ///
    /// Used for best-effort error reporting into the unit's own log.
    pub fn note(&mut self, message: &str) -> Result<(), SinkError> {
        self.sink.append(&LogRecord::now(message))
    }

    /// Flushes the open duplicate run (if any) and writes the final
    /// `Stopped logging for <unit>` marker.
    ///
    /// Idempotent: a second call is a no-op.
    pub fn finish(&mut self) -> Result<(), SinkError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if let Some(n) = self.filter.take_suppressed() {
            self.sink.append(&LogRecord::now(summary(n)))?;
        }
        self.sink
            .append(&LogRecord::now(format!("Stopped logging for {}", self.unit)))
    }
}

fn summary(n: u64) -> String {
    format!("Suppressed {n} duplicate messages")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger_at(dir: &std::path::Path) -> ServiceLogger {
        let sink = RotatingSink::create(dir.join("demo.service.log"), 1024 * 1024, 3).unwrap();
        ServiceLogger::new("demo.service", sink)
    }

    fn payloads(dir: &std::path::Path) -> Vec<String> {
        let contents = std::fs::read_to_string(dir.join("demo.service.log")).unwrap();
        contents
            .lines()
            .map(|l| l.splitn(2, " - ").nth(1).unwrap().to_owned())
            .collect()
    }

    #[test]
    fn test_duplicate_run_collapses_to_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = logger_at(dir.path());

        for line in ["a", "a", "a", "b"] {
            logger.process(line).unwrap();
        }

        assert_eq!(
            payloads(dir.path()),
            vec!["a", "Suppressed 2 duplicate messages", "b"]
        );
    }

    #[test]
    fn test_distinct_lines_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = logger_at(dir.path());

        for line in ["a", "b", "c"] {
            logger.process(line).unwrap();
        }

        assert_eq!(payloads(dir.path()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_finish_flushes_run_and_marks_stop() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = logger_at(dir.path());

        logger.process("x").unwrap();
        logger.process("x").unwrap();
        logger.finish().unwrap();

        assert_eq!(
            payloads(dir.path()),
            vec![
                "x",
                "Suppressed 1 duplicate messages",
                "Stopped logging for demo.service"
            ]
        );
    }

    #[test]
    fn test_finish_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = logger_at(dir.path());

        logger.process("x").unwrap();
        logger.finish().unwrap();
        logger.finish().unwrap();

        assert_eq!(
            payloads(dir.path()),
            vec!["x", "Stopped logging for demo.service"]
        );
    }

    #[test]
    fn test_record_count_never_exceeds_input_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = logger_at(dir.path());

        let input = ["a", "a", "b", "b", "b", "c", "a"];
        for line in input {
            logger.process(line).unwrap();
        }

        assert!(payloads(dir.path()).len() <= input.len());
    }
}
