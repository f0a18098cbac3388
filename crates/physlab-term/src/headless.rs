//! Running a simulation without a terminal.
//!
//! The active tab is started, ticked back to back (no wall-clock pacing)
//! until the tick budget runs out or the simulation halts, and summarized
//! as plain text. The last frame can be written out as SVG.

use std::fs;
use std::path::{Path, PathBuf};

use physlab::{SimKind, Viewport, svg};
use tracing::info;

use crate::app::App;

/// Final numbers from a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Simulation that ran.
    pub kind: SimKind,
    /// Ticks executed.
    pub ticks: u64,
    /// Simulated seconds.
    pub elapsed: f64,
    /// Whether it was still running at the end (false after a halt).
    pub running: bool,
    /// Readout lines, formatted.
    pub readouts: Vec<String>,
}

impl Report {
    /// Plain-text report, one `key: value` per line.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "simulation: {}\nticks: {}\nelapsed: {:.3} s\nrunning: {}\n",
            self.kind, self.ticks, self.elapsed, self.running
        );
        for line in &self.readouts {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Ticks the app's active simulation up to `ticks` times.
pub fn run(app: &mut App, ticks: u64) -> Report {
    let kind = app.active();
    let runner = app.active_runner_mut();
    runner.start();
    let mut done = 0;
    while done < ticks && runner.tick() {
        done += 1;
    }
    let report = Report {
        kind,
        ticks: runner.control().ticks(),
        elapsed: runner.control().elapsed(),
        running: runner.is_running(),
        readouts: runner.readouts().iter().map(ToString::to_string).collect(),
    };
    info!(%kind, ticks = report.ticks, elapsed = report.elapsed, "headless run finished");
    report
}

/// Writes the active simulation's current frame as an SVG file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_svg(app: &App, path: &Path, viewport: Viewport) -> Result<(), HeadlessError> {
    let scene = app.runner().scene(&app.toggles(), viewport);
    fs::write(path, svg::render(&scene, viewport)).map_err(|source| HeadlessError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "frame written");
    Ok(())
}

/// Headless output error.
#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    /// The SVG file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Target file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
