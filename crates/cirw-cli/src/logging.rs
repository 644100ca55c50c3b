//! Tracing setup: a global stderr subscriber plus an optional per-run file
//! scope (§9 "`--log`/`--logs` redirect this run's structured log output").

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn filter_for(verbose: u8) -> EnvFilter {
    let directive = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Install the process-wide stderr subscriber. Called once, at startup.
pub fn init(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose))
        .with_target(false)
        .init();
}

/// Run `f` with tracing events redirected to `path` instead of the global
/// stderr subscriber, for the duration of the call only (`--log`). Used
/// around a single [`cirw_engine::execute`] invocation so one run's log
/// doesn't interleave with a batch's shared stderr stream.
pub fn with_file_scope<T>(path: &Path, verbose: u8, f: impl FnOnce() -> T) -> Result<T> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating log directory {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose))
        .with_target(false)
        .with_ansi(false)
        .with_writer(file)
        .finish();

    Ok(tracing::subscriber::with_default(subscriber, f))
}
