//! # Timestamped log record.

use chrono::{DateTime, Local};

/// One record destined for a unit's log file: capture time plus text
/// payload. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    at: DateTime<Local>,
    message: String,
}

impl LogRecord {
    /// Creates a record stamped with the current local time.
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            message: message.into(),
        }
    }

    /// Creates a record with an explicit timestamp.
    pub fn at(at: DateTime<Local>, message: impl Into<String>) -> Self {
        Self {
            at,
            message: message.into(),
        }
    }

    /// The record's text payload.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Serializes the record as a single log line, newline included.
    ///
    /// Timestamps render at second resolution: `YYYY-MM-DD HH:MM:SS`.
    pub fn to_line(&self) -> String {
        format!("{} - {}\n", self.at.format("%Y-%m-%d %H:%M:%S"), self.message)
    }
}
