#![forbid(unsafe_code)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::struct_field_names)]

//! # Physlab
//!
//! Six small fixed-step physics simulations that share one loop driver and
//! one declarative 2D scene format.
//!
//! Physlab provides:
//! - **Simulations**: projectile, pendulum, spring, wave, fluid and orbit,
//!   each a zero-sized [`Simulation`] with its own parameters and state
//! - **Driver**: [`Driver`] owns one simulation and ticks it at a fixed
//!   wall-clock cadence; [`Runner`] erases the kind for hosts
//! - **Scenes**: renderers return a [`Scene`], which [`Canvas`] rasterizes
//!   and [`svg::render`] serializes
//!
//! ## Example
//!
//! ```rust
//! use physlab::prelude::*;
//!
//! let mut runner = SimKind::Spring.runner();
//! runner.set_param("stiffness", 40.0).unwrap();
//! runner.start();
//! for _ in 0..50 {
//!     runner.tick();
//! }
//!
//! let mut canvas = Canvas::new(Viewport::new(80, 40));
//! canvas.paint(&runner.scene(&Toggles::default(), canvas.viewport()));
//! assert!(runner.readouts().iter().any(|r| r.label == "period"));
//! ```
//!
//! ## Parameters
//!
//! Every simulation declares its parameters as [`ParamSpec`]s with a range,
//! step and default. Writes go through [`ParamSet::set`], which rejects
//! unknown names, non-finite values and values outside the range, so the
//! steppers never see invalid input.

mod canvas;
mod driver;
mod error;
mod param;
mod scene;
mod simulation;
pub mod sims;
pub mod svg;
mod theme;
mod trail;
mod vector;

pub use canvas::{Canvas, TextMark};
pub use driver::{Driver, RunControl, Runner};
pub use error::{Error, Result};
pub use param::{ParamError, ParamSet, ParamSpec};
pub use scene::{Projection, Rgb, Scene, Shape, Toggles, Viewport};
pub use simulation::{Readout, SimKind, Simulation, Step, Timing};
pub use theme::{THEME, Theme};
pub use trail::Trail;
pub use vector::Vec2;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::driver::{Driver, Runner};
    pub use crate::param::{ParamSet, ParamSpec};
    pub use crate::scene::{Scene, Toggles, Viewport};
    pub use crate::simulation::{Readout, SimKind, Simulation};
    pub use crate::theme::THEME;
    pub use crate::vector::Vec2;
}
