//! Logging setup.
//!
//! The terminal belongs to the UI, so log output goes to a file. Nothing is
//! installed unless a log file is given or `FPICK_LOG` is set.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "FPICK_LOG";

const DEFAULT_FILTER: &str = "fpick=info";

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("fpick")
        .join("fpick.log")
}

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global tracing subscriber.
///
/// Returns the path being written to, or `None` when logging stays off.
pub fn init(log_file: Option<&Path>) -> io::Result<Option<PathBuf>> {
    let env_filter = std::env::var(LOG_ENV).ok();
    let path = match (log_file, &env_filter) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(_)) => default_log_path(),
        (None, None) => return Ok(None),
    };

    let filter = env_filter
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let file = open_log(&path)?;
    let installed = fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    // A subscriber may already be set (tests, embedding hosts); keep it
    Ok(installed.ok().map(|_| path))
}
