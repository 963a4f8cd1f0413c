//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is not set.
const DEFAULT_DIRECTIVE: &str = "qadoc=info";

/// Where log output goes.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Standard error, for one-shot commands
    Stderr,
    /// Appends to a file, for the terminal UI
    File(&'a Path),
    /// Logging disabled
    Off,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global subscriber.
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(target: LogTarget<'_>) -> Result<()> {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
        LogTarget::Off => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_target_reports_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("qadoc.log");

        let result = init(LogTarget::File(&missing));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to open log file"));
    }

    #[test]
    fn off_target_is_a_no_op() {
        assert!(init(LogTarget::Off).is_ok());
    }
}
