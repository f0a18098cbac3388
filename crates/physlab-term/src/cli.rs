//! Command-line interface for `physlab`.
//!
//! # Examples
//!
//! ```bash
//! # Open on the orbit tab, already running
//! physlab --tab orbit --autostart
//!
//! # Same, using the query form
//! physlab --query '?tab=orbit' --autostart
//!
//! # Override parameters (kind prefix optional for the selected tab)
//! physlab --tab pendulum --set length=2.5 --set spring.mass=4
//!
//! # Run 300 ticks without a terminal and print the readouts
//! physlab --headless --tab projectile --ticks 300 --svg frame.svg
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Interactive physics simulations in the terminal.
///
/// Six simulations (projectile, pendulum, spring, wave, fluid, orbit) each
/// advance with a fixed time step and redraw every frame.
#[derive(Parser, Debug, Clone)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "CLI flags are naturally bools"
)]
#[command(
    name = "physlab",
    author,
    version,
    about = "Interactive physics simulations in the terminal",
    long_about = "Projectile, pendulum, spring, wave, fluid and orbit simulations with \
                  adjustable parameters, drawn with half-block pixels."
)]
pub struct Cli {
    /// Simulation to open: projectile, pendulum, spring, wave, fluid, orbit
    #[arg(long, env = "PHYSLAB_TAB", conflicts_with = "query")]
    pub tab: Option<String>,

    /// Tab selection as a URL query string, e.g. `?tab=orbit`
    ///
    /// Unknown tab names fall back to the default tab
    #[arg(long)]
    pub query: Option<String>,

    /// Path to a JSON config file
    #[arg(long, short = 'c', env = "PHYSLAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Set a parameter: `[KIND.]NAME=VALUE` (repeatable)
    ///
    /// Without a kind prefix the selected tab is used. Choice parameters
    /// accept their names, e.g. `fluid.mode=turbulent`.
    #[arg(long = "set", short = 's', value_name = "[KIND.]NAME=VALUE")]
    pub set: Vec<String>,

    /// Frames per second of the interactive display
    #[arg(long)]
    pub fps: Option<u32>,

    /// Start the selected simulation immediately
    #[arg(long)]
    pub autostart: bool,

    /// Hide motion trails
    #[arg(long)]
    pub no_trail: bool,

    /// Show velocity and force arrows
    #[arg(long)]
    pub vectors: bool,

    /// Hide reference lines
    #[arg(long)]
    pub no_guides: bool,

    /// Run without a terminal and print a report
    #[arg(long)]
    pub headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 500, requires = "headless")]
    pub ticks: u64,

    /// Write the final headless frame as SVG
    #[arg(long, requires = "headless")]
    pub svg: Option<PathBuf>,

    /// SVG width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// SVG height in pixels
    #[arg(long, default_value_t = 400)]
    pub height: u32,

    /// Append logs to this file (interactive mode logs nowhere otherwise)
    #[arg(long, env = "PHYSLAB_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }
}
