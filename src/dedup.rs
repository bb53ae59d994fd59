//! # Run-length suppression of consecutive duplicate lines.
//!
//! [`DedupFilter`] owns the per-unit dedup state: the last line seen
//! and how many times it has repeated since. It is a pure state
//! machine; writing records is the caller's job.
//!
//! Comparison is exact byte equality on the line as handed in. Trailing
//! whitespace is trimmed once at read time by the worker, so lines that
//! differ only in leading whitespace count as distinct.

/// Outcome of pushing one line through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The line repeats the previous one; nothing should be written.
    Repeat,
    /// The line is new. If a run of duplicates just ended, `suppressed`
    /// carries its length so the caller can write a summary first.
    Fresh {
        /// Number of duplicates collapsed before this line, if any.
        suppressed: Option<u64>,
    },
}

/// Per-unit duplicate-run state. Single-writer: owned exclusively by
/// the unit's worker, never shared.
#[derive(Debug, Default)]
pub struct DedupFilter {
    last: Option<String>,
    repeats: u64,
}

impl DedupFilter {
    /// Creates an empty filter; the first line pushed is always fresh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the filter by one line.
    pub fn push(&mut self, line: &str) -> Verdict {
        if self.last.as_deref() == Some(line) {
            self.repeats += 1;
            return Verdict::Repeat;
        }
        let suppressed = self.take_suppressed();
        self.last = Some(line.to_owned());
        Verdict::Fresh { suppressed }
    }

    /// Drains the currently open duplicate run, if any.
    ///
    /// Idempotent: a second call with no intervening [`push`](Self::push)
    /// returns `None`.
    pub fn take_suppressed(&mut self) -> Option<u64> {
        match self.repeats {
            0 => None,
            n => {
                self.repeats = 0;
                Some(n)
            }
        }
    }
}
