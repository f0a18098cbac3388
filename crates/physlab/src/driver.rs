//! The loop driver shared by every simulation kind.
//!
//! [`Driver`] owns one simulation's parameters, state, trail and
//! [`RunControl`]. The host calls [`Driver::poll`] once per frame; a tick
//! fires whenever the fixed wall-clock interval has elapsed since the last
//! one. Each tick runs the stepper to completion before returning, so there
//! is never more than one tick in flight, and once [`Driver::stop`] returns
//! no further tick can fire.
//!
//! # Example
//!
//! ```rust
//! use physlab::{Driver, Runner, sims::Projectile};
//!
//! let mut driver = Driver::<Projectile>::default();
//! driver.start();
//! while driver.is_running() {
//!     driver.tick();
//! }
//! let landing = driver.state().landing.expect("projectile lands");
//! assert!((landing.distance - 40.816).abs() < 0.01);
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::error::Result;
use crate::param::{ParamSet, ParamSpec};
use crate::scene::{Scene, Toggles, Viewport};
use crate::simulation::{Readout, SimKind, Simulation, Step, Timing};
use crate::sims::{Fluid, Orbit, Pendulum, Projectile, Spring, Wave};
use crate::trail::Trail;
use crate::vector::Vec2;

/// Run flag, cadence and simulated clock.
#[derive(Debug, Clone, PartialEq)]
pub struct RunControl {
    running: bool,
    timing: Timing,
    elapsed: f64,
    ticks: u64,
}

impl RunControl {
    /// A stopped clock at time zero.
    pub const fn new(timing: Timing) -> Self {
        Self {
            running: false,
            timing,
            elapsed: 0.0,
            ticks: 0,
        }
    }

    /// Whether ticks currently advance the simulation.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Simulated seconds elapsed while running.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of ticks executed since the last reset.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Wall-clock cadence.
    pub const fn interval(&self) -> Duration {
        self.timing.interval
    }

    /// Step sizes.
    pub const fn timing(&self) -> Timing {
        self.timing
    }
}

/// Type-erased view of a [`Driver`], so a host can hold all six kinds
/// behind one pointer type.
pub trait Runner {
    /// Which simulation this is.
    fn kind(&self) -> SimKind;
    /// Begins ticking. The first [`poll`](Runner::poll) after this ticks
    /// immediately.
    fn start(&mut self);
    /// Stops ticking and cancels the pending tick.
    fn stop(&mut self);
    /// Starts when stopped, stops when running.
    fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }
    /// Whether the simulation is running.
    fn is_running(&self) -> bool;
    /// Stops, cancels the pending tick and recreates state and trail.
    fn reset(&mut self);
    /// Runs one tick if running. Returns whether the state advanced.
    fn tick(&mut self) -> bool;
    /// Runs a tick if one is due at `now`. Returns whether it ticked.
    fn poll(&mut self, now: Instant) -> bool;
    /// Time from `now` until the next tick is due, or `None` when stopped.
    fn due_in(&self, now: Instant) -> Option<Duration>;
    /// Run flag, cadence and clock.
    fn control(&self) -> &RunControl;
    /// Declared parameters in display order.
    fn param_specs(&self) -> &'static [ParamSpec];
    /// Current value of a parameter.
    fn param(&self, name: &str) -> Option<f64>;
    /// Writes a parameter through the store's validation.
    fn set_param(&mut self, name: &str, value: f64) -> Result<()>;
    /// Derived quantities for display.
    fn readouts(&self) -> Vec<Readout>;
    /// Draws the current frame.
    fn scene(&self, toggles: &Toggles, viewport: Viewport) -> Scene;
}

/// Owns and runs one simulation.
#[derive(Debug, Clone)]
pub struct Driver<S: Simulation> {
    params: S::Params,
    state: S::State,
    trail: Trail<Vec2>,
    control: RunControl,
    next_due: Option<Instant>,
}

impl<S: Simulation> Default for Driver<S> {
    fn default() -> Self {
        Self::new(S::Params::default())
    }
}

impl<S: Simulation> Driver<S> {
    /// Creates a stopped driver with a fresh state.
    pub fn new(params: S::Params) -> Self {
        let state = S::init(&params);
        let mut driver = Self {
            params,
            state,
            trail: Trail::new(S::TRAIL_CAP),
            control: RunControl::new(S::TIMING),
            next_due: None,
        };
        driver.sample_trail();
        driver
    }

    /// Current parameters.
    pub const fn params(&self) -> &S::Params {
        &self.params
    }

    /// Current state.
    pub const fn state(&self) -> &S::State {
        &self.state
    }

    /// Recent trail samples.
    pub const fn trail(&self) -> &Trail<Vec2> {
        &self.trail
    }

    fn sample_trail(&mut self) {
        if let Some(point) = S::trail_point(&self.state) {
            self.trail.push(point);
        }
    }

    /// Recreates state and trail from the current parameters without
    /// touching the run flag.
    fn reinit(&mut self) {
        self.state = S::init(&self.params);
        self.trail.clear();
        self.control.elapsed = 0.0;
        self.control.ticks = 0;
        self.sample_trail();
    }
}

impl<S: Simulation> Runner for Driver<S> {
    fn kind(&self) -> SimKind {
        S::KIND
    }

    fn start(&mut self) {
        if !self.control.running {
            debug!(kind = %S::KIND, "start");
        }
        self.control.running = true;
        self.next_due = None;
    }

    fn stop(&mut self) {
        if self.control.running {
            debug!(kind = %S::KIND, elapsed = self.control.elapsed, "stop");
        }
        self.control.running = false;
        self.next_due = None;
    }

    fn is_running(&self) -> bool {
        self.control.running
    }

    fn reset(&mut self) {
        self.stop();
        self.reinit();
        debug!(kind = %S::KIND, "reset");
    }

    fn tick(&mut self) -> bool {
        if !self.control.running {
            return false;
        }

        let timing = self.control.timing;
        let h = timing.substep();
        let mut halted = None;
        let mut done = 0.0;
        for _ in 0..timing.substeps.max(1) {
            match S::step(&mut self.state, &self.params, h) {
                Step::Continue => done += h,
                Step::Halt(used) => {
                    halted = Some(done + used.clamp(0.0, h));
                    break;
                }
            }
        }

        // A halt mid-tick only consumes the time simulated before it.
        self.control.elapsed += halted.unwrap_or(timing.dt);
        self.control.ticks += 1;
        self.sample_trail();
        trace!(kind = %S::KIND, tick = self.control.ticks, "tick");

        if halted.is_some() {
            info!(
                kind = %S::KIND,
                ticks = self.control.ticks,
                elapsed = self.control.elapsed,
                "simulation reached a terminal state"
            );
            self.control.running = false;
            self.next_due = None;
        }
        true
    }

    fn poll(&mut self, now: Instant) -> bool {
        if !self.control.running {
            return false;
        }
        if self.next_due.is_some_and(|due| now < due) {
            return false;
        }
        let ticked = self.tick();
        if self.control.running {
            self.next_due = Some(now + self.control.timing.interval);
        }
        ticked
    }

    fn due_in(&self, now: Instant) -> Option<Duration> {
        if !self.control.running {
            return None;
        }
        Some(
            self.next_due
                .map_or(Duration::ZERO, |due| due.saturating_duration_since(now)),
        )
    }

    fn control(&self) -> &RunControl {
        &self.control
    }

    fn param_specs(&self) -> &'static [ParamSpec] {
        S::Params::specs()
    }

    fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name)
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<()> {
        self.params.set(name, value)?;
        debug!(kind = %S::KIND, name, value, "parameter changed");
        if S::resets_on_change(name) {
            self.reinit();
        }
        Ok(())
    }

    fn readouts(&self) -> Vec<Readout> {
        S::readouts(&self.state, &self.params)
    }

    fn scene(&self, toggles: &Toggles, viewport: Viewport) -> Scene {
        S::draw(&self.state, &self.params, &self.trail, toggles, viewport)
    }
}

impl SimKind {
    /// Creates a stopped driver for this kind with default parameters.
    pub fn runner(self) -> Box<dyn Runner> {
        match self {
            SimKind::Projectile => Box::new(Driver::<Projectile>::default()),
            SimKind::Pendulum => Box::new(Driver::<Pendulum>::default()),
            SimKind::Spring => Box::new(Driver::<Spring>::default()),
            SimKind::Wave => Box::new(Driver::<Wave>::default()),
            SimKind::Fluid => Box::new(Driver::<Fluid>::default()),
            SimKind::Orbit => Box::new(Driver::<Orbit>::default()),
        }
    }

    /// Declared parameters of this kind, without building a driver.
    pub fn param_specs(self) -> &'static [ParamSpec] {
        match self {
            SimKind::Projectile => <Projectile as Simulation>::Params::specs(),
            SimKind::Pendulum => <Pendulum as Simulation>::Params::specs(),
            SimKind::Spring => <Spring as Simulation>::Params::specs(),
            SimKind::Wave => <Wave as Simulation>::Params::specs(),
            SimKind::Fluid => <Fluid as Simulation>::Params::specs(),
            SimKind::Orbit => <Orbit as Simulation>::Params::specs(),
        }
    }
}
