//! svctail binary: CLI parsing, logging init, supervisor launch.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use svctail::{
    AliveTracker, Config, JournalFollower, LogWriter, ServiceSpec, Subscribe, Supervisor,
    DEFAULT_KEEP_FILES, DEFAULT_ROTATE_BYTES,
};

/// Tail systemd unit journals into deduplicated, size-rotated log files.
#[derive(Parser, Debug)]
#[command(name = "svctail", version, about)]
struct Args {
    /// Units to follow (e.g. `nginx.service`).
    #[arg(value_name = "UNIT", required = true)]
    units: Vec<String>,

    /// Directory for the per-unit log files.
    /// Defaults to the platform data directory for svctail.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Size threshold of the active file before rotation, in bytes.
    #[arg(long, default_value_t = DEFAULT_ROTATE_BYTES)]
    rotate_bytes: u64,

    /// Number of rotated backup files kept per unit.
    #[arg(long, default_value_t = DEFAULT_KEEP_FILES)]
    keep: usize,

    /// Seconds to wait for workers after a shutdown request.
    #[arg(long, default_value_t = 10)]
    grace_secs: u64,

    /// Enable debug logging (same as RUST_LOG=debug).
    #[arg(long)]
    debug: bool,
}

/// Initialise diagnostics. Priority: RUST_LOG env var > --debug > "info".
fn init_logging(debug_flag: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "svctail")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("logs"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    let cfg = Config {
        log_dir: args.log_dir.unwrap_or_else(default_log_dir),
        rotate_bytes: args.rotate_bytes,
        keep_files: args.keep,
        grace: Duration::from_secs(args.grace_secs),
        ..Config::default()
    };
    tracing::info!(log_dir = %cfg.log_dir.display(), units = ?args.units, "starting");

    let alive = Arc::new(AliveTracker::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![alive.clone(), Arc::new(LogWriter::new())];
    let sup = Supervisor::new(cfg.clone(), subs, alive);

    let specs = args
        .units
        .iter()
        .map(|unit| ServiceSpec::with_defaults(JournalFollower::arc(unit.clone()), &cfg))
        .collect();

    match sup.run(specs).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, label = e.as_label(), "exiting with failure");
            ExitCode::FAILURE
        }
    }
}
