//! Diagnostic logging.
//!
//! The terminal UI owns the screen, so it only logs when a file is given.
//! One-shot commands log to stderr. `RUST_LOG` overrides the default filter.

use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Open `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Send diagnostics to `path` without terminal colour codes.
pub fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| -> Box<dyn Error> { err })?;
    Ok(())
}

/// Send diagnostics to stderr. A subscriber that is already installed wins.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .try_init();
}
