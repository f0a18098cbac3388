//! Tracing subscriber setup.
//!
//! The interactive display owns the terminal, so it only logs when a file
//! is given. Headless runs log to stderr, leaving stdout for the report.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Maps `-v` repetitions to a default filter directive.
pub const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink<'a> {
    /// Nowhere.
    Off,
    /// Standard error.
    Stderr,
    /// Appended to a file.
    File(&'a Path),
}

impl<'a> Sink<'a> {
    /// Picks the sink for the run mode.
    pub const fn choose(log_file: Option<&'a Path>, headless: bool) -> Self {
        match (log_file, headless) {
            (Some(path), _) => Sink::File(path),
            (None, true) => Sink::Stderr,
            (None, false) => Sink::Off,
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the verbosity.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init(verbosity: u8, sink: Sink<'_>) -> Result<(), LoggingError> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)))
    };

    let result = match sink {
        Sink::Off => return Ok(()),
        Sink::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init(),
        Sink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::Open {
                    path: path.to_path_buf(),
                    source,
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };
    result.map_err(|err| LoggingError::Install(err.to_string()))
}

/// Logging setup error.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log file could not be opened.
    #[error("failed to open log file {path}: {source}")]
    Open {
        /// File that failed.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber was already set.
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}
