#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]

//! # Physlab terminal host
//!
//! Runs the [`physlab`] simulations in a terminal: six tabs, a parameter
//! panel and a half-block rendering of the scene.
//!
//! ## Usage
//!
//! ```bash
//! physlab                            # interactive, projectile tab
//! physlab --tab orbit --autostart    # open another tab, already running
//! physlab --headless --ticks 300     # no terminal, print readouts
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: command-line flags
//! - [`config`]: layered JSON configuration
//! - [`app`]: tabs, selection and the runner per simulation
//! - [`key`]: key bindings
//! - [`present`]: terminal drawing
//! - [`program`]: terminal setup and the event loop
//! - [`headless`]: runs without a terminal
//! - [`logging`]: tracing subscriber setup

pub mod app;
pub mod cli;
pub mod config;
pub mod headless;
pub mod key;
pub mod logging;
pub mod present;
pub mod program;

pub use app::{App, Flow};
pub use cli::Cli;
pub use config::{Config, ConfigError};
pub use program::Program;
