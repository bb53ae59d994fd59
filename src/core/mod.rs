//! Runtime core: orchestration and lifecycle.
//!
//! The only public API from this module is [`Supervisor`], which opens
//! each unit's source and sink, spawns one worker per unit, and handles
//! graceful shutdown.
//!
//! Internal modules:
//! - [`worker`]: per-unit read/dedup/append loop;
//! - [`supervisor`]: fan-out of workers, fan-in of shutdown;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod shutdown;
mod supervisor;
mod worker;

pub use supervisor::Supervisor;
