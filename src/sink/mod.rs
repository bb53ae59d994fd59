//! Durable output side of the pipeline.
//!
//! - [`LogRecord`]: timestamped text payload, serialized as
//!   `YYYY-MM-DD HH:MM:SS - <payload>` plus newline.
//! - [`RotatingSink`]: append-only file that rolls over once a size
//!   threshold is passed, keeping a bounded number of numbered backups.

mod record;
mod rotating;

pub use record::LogRecord;
pub use rotating::RotatingSink;
