//! Runtime configuration for `physlab`.
//!
//! [`Config`] is the single source of truth for startup options, however
//! they were given. Layers apply in order: built-in defaults, then the JSON
//! file named by `--config`, then command-line flags.
//!
//! # Examples
//!
//! A config file:
//!
//! ```json
//! {
//!   "tab": "pendulum",
//!   "fps": 30,
//!   "autostart": true,
//!   "toggles": { "trail": true, "vectors": true, "guides": false },
//!   "params": {
//!     "pendulum": { "length": 2.0, "damping": 0.0 },
//!     "fluid": { "mode": 1 }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use physlab::{ParamSpec, SimKind, Toggles};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Lowest accepted frame rate.
pub const MIN_FPS: u32 = 1;
/// Highest accepted frame rate.
pub const MAX_FPS: u32 = 120;

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tab shown first.
    pub tab: SimKind,

    /// Frames per second of the interactive display.
    pub fps: u32,

    /// Whether the first tab starts running immediately.
    pub autostart: bool,

    /// Overlay switches.
    pub toggles: Toggles,

    /// Parameter overrides by simulation name, then parameter name.
    pub params: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab: SimKind::default(),
            fps: 30,
            autostart: false,
            toggles: Toggles::default(),
            params: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config
    /// JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolves the full configuration from CLI arguments, reading the
    /// config file they name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file fails to load, a flag names an unknown
    /// simulation, or any override fails validation.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(tab) = &cli.tab {
            config.tab = tab.parse()?;
        } else if let Some(query) = &cli.query {
            config.tab = SimKind::from_query(query);
        }

        if let Some(fps) = cli.fps {
            config.fps = fps;
        }
        config.autostart |= cli.autostart;
        if cli.no_trail {
            config.toggles.trail = false;
        }
        if cli.vectors {
            config.toggles.vectors = true;
        }
        if cli.no_guides {
            config.toggles.guides = false;
        }

        for assignment in &cli.set {
            let (kind, name, value) = parse_assignment(assignment, config.tab)?;
            config
                .params
                .entry(kind.name().to_string())
                .or_default()
                .insert(name, value);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the frame rate and every parameter override against its
    /// declared range.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FPS..=MAX_FPS).contains(&self.fps) {
            return Err(ConfigError::Fps(self.fps));
        }
        for (kind, name, value) in self.overrides()? {
            let spec = find_spec(kind, &name)?;
            if !value.is_finite() || !spec.contains(value) {
                return Err(ConfigError::OutOfRange {
                    kind,
                    name,
                    value,
                    min: spec.min,
                    max: spec.max,
                });
            }
            if spec.whole && value.fract() != 0.0 {
                return Err(ConfigError::NotWhole { kind, name, value });
            }
        }
        Ok(())
    }

    /// Parameter overrides with parsed simulation kinds, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns an error if a simulation name is unknown.
    pub fn overrides(&self) -> Result<Vec<(SimKind, String, f64)>, ConfigError> {
        let mut out = Vec::new();
        for (kind, params) in &self.params {
            let kind: SimKind = kind.parse()?;
            for (name, value) in params {
                out.push((kind, name.clone(), *value));
            }
        }
        Ok(out)
    }

    /// Multi-line summary for `-v` startup logging.
    pub fn to_diagnostic_string(&self) -> String {
        let mut lines = vec![
            format!("tab: {} ({})", self.tab, self.tab.to_query()),
            format!("fps: {}", self.fps),
            format!("autostart: {}", self.autostart),
            format!(
                "toggles: trail={} vectors={} guides={}",
                self.toggles.trail, self.toggles.vectors, self.toggles.guides
            ),
        ];
        for (kind, params) in &self.params {
            for (name, value) in params {
                lines.push(format!("param: {kind}.{name} = {value}"));
            }
        }
        lines.join("\n")
    }
}

fn find_spec(kind: SimKind, name: &str) -> Result<&'static ParamSpec, ConfigError> {
    kind.param_specs()
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| ConfigError::UnknownParam {
            kind,
            name: name.to_string(),
        })
}

/// Parses `[KIND.]NAME=VALUE`. A bare `NAME` applies to `default_kind`.
/// Choice parameters accept their choice names as well as indices.
///
/// # Errors
///
/// Returns an error for malformed text, unknown kinds or parameters, and
/// values that are neither numbers nor known choice names.
pub fn parse_assignment(
    text: &str,
    default_kind: SimKind,
) -> Result<(SimKind, String, f64), ConfigError> {
    let bad = || ConfigError::Assignment(text.to_string());

    let (target, raw) = text.split_once('=').ok_or_else(bad)?;
    let (kind, name) = match target.trim().split_once('.') {
        Some((kind, name)) => (kind.parse::<SimKind>()?, name),
        None => (default_kind, target.trim()),
    };
    if name.is_empty() {
        return Err(bad());
    }

    let spec = find_spec(kind, name)?;
    let raw = raw.trim();
    let value = match raw.parse::<f64>() {
        Ok(value) => value,
        Err(_) => spec
            .choices
            .iter()
            .position(|choice| choice.eq_ignore_ascii_case(raw))
            .map(|index| index as f64)
            .ok_or_else(bad)?,
    };
    Ok((kind, name.to_string(), value))
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`Config`].
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A `--set` argument is not of the form `[KIND.]NAME=VALUE`.
    #[error("invalid assignment `{0}` (expected [KIND.]NAME=VALUE)")]
    Assignment(String),

    /// An unknown simulation name or a rejected parameter write.
    #[error(transparent)]
    Kind(#[from] physlab::Error),

    /// A parameter the simulation does not declare.
    #[error("{kind} has no parameter `{name}`")]
    UnknownParam {
        /// Simulation addressed.
        kind: SimKind,
        /// Parameter name given.
        name: String,
    },

    /// A value outside the declared range.
    #[error("{kind}.{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Simulation addressed.
        kind: SimKind,
        /// Parameter name.
        name: String,
        /// Rejected value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A fractional value for a counted or discrete parameter.
    #[error("{kind}.{name} must be a whole number, got {value}")]
    NotWhole {
        /// Simulation addressed.
        kind: SimKind,
        /// Parameter name.
        name: String,
        /// Rejected value.
        value: f64,
    },

    /// A frame rate outside the supported range.
    #[error("fps must be between 1 and 120, got {0}")]
    Fps(u32),
}
