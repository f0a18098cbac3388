//! The strategy interface shared by every simulation kind.
//!
//! A simulation is a zero-sized type implementing [`Simulation`]: it names
//! its parameter and state types and supplies the initial state, the
//! stepper, the trail sampler and the scene renderer as associated
//! functions. The generic [`Driver`](crate::Driver) owns the data and runs
//! the loop, so none of the six kinds repeats any scheduling code.

use core::fmt;
use core::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::param::ParamSet;
use crate::scene::{Scene, Toggles, Viewport};
use crate::trail::Trail;
use crate::vector::Vec2;

/// Outcome of a single stepper call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Keep running. The whole step was simulated.
    Continue,
    /// A terminal condition was reached after this many simulated seconds
    /// of the step; the driver stops.
    Halt(f64),
}

impl Step {
    /// Whether the stepper reached a terminal condition.
    pub const fn is_halt(self) -> bool {
        matches!(self, Step::Halt(_))
    }
}

/// Fixed timing of a simulation kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Wall-clock cadence between ticks.
    pub interval: Duration,
    /// Simulated seconds advanced per tick.
    pub dt: f64,
    /// Stepper calls per tick, each advancing `dt / substeps`.
    pub substeps: u32,
}

impl Timing {
    /// Creates a timing description.
    pub const fn new(interval_ms: u64, dt: f64, substeps: u32) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            dt,
            substeps,
        }
    }

    /// Length of one stepper call.
    pub fn substep(&self) -> f64 {
        self.dt / f64::from(self.substeps.max(1))
    }
}

/// A derived quantity shown next to the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    /// Short label.
    pub label: &'static str,
    /// Current value.
    pub value: f64,
    /// Display unit (may be empty).
    pub unit: &'static str,
}

impl Readout {
    /// Creates a readout.
    pub const fn new(label: &'static str, value: f64, unit: &'static str) -> Self {
        Self { label, value, unit }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}: {:.3}", self.label, self.value)
        } else {
            write!(f, "{}: {:.3} {}", self.label, self.value, self.unit)
        }
    }
}

/// One simulation kind: physics plus drawing, with no owned data.
pub trait Simulation: 'static {
    /// User-adjustable inputs.
    type Params: ParamSet;
    /// Evolving physical quantities.
    type State: Clone + fmt::Debug + PartialEq;

    /// Which tab this simulation occupies.
    const KIND: SimKind;
    /// Cadence and step size.
    const TIMING: Timing;
    /// Maximum trail length; zero disables the trail.
    const TRAIL_CAP: usize;

    /// Builds the state for a fresh run.
    fn init(params: &Self::Params) -> Self::State;

    /// Advances `state` by `dt` simulated seconds.
    fn step(state: &mut Self::State, params: &Self::Params, dt: f64) -> Step;

    /// Whether writing parameter `name` discards the current run.
    fn resets_on_change(_name: &str) -> bool {
        false
    }

    /// The point appended to the trail after each tick, if any.
    fn trail_point(_state: &Self::State) -> Option<Vec2> {
        None
    }

    /// Derived quantities for display.
    fn readouts(state: &Self::State, params: &Self::Params) -> Vec<Readout>;

    /// Draws the current state. Must not (and cannot) mutate it.
    fn draw(
        state: &Self::State,
        params: &Self::Params,
        trail: &Trail<Vec2>,
        toggles: &Toggles,
        viewport: Viewport,
    ) -> Scene;
}

/// The six simulation kinds, in tab order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SimKind {
    /// Launched body under gravity with optional drag.
    #[default]
    Projectile,
    /// Damped simple pendulum.
    Pendulum,
    /// Damped spring-mass oscillator.
    Spring,
    /// Damped travelling wave.
    Wave,
    /// Particle flow around an obstacle.
    Fluid,
    /// Two-body gravity.
    Orbit,
}

impl SimKind {
    /// All kinds in tab order.
    pub const ALL: [SimKind; 6] = [
        SimKind::Projectile,
        SimKind::Pendulum,
        SimKind::Spring,
        SimKind::Wave,
        SimKind::Fluid,
        SimKind::Orbit,
    ];

    /// The machine name used in `?tab=` queries and config files.
    pub const fn name(self) -> &'static str {
        match self {
            SimKind::Projectile => "projectile",
            SimKind::Pendulum => "pendulum",
            SimKind::Spring => "spring",
            SimKind::Wave => "wave",
            SimKind::Fluid => "fluid",
            SimKind::Orbit => "orbit",
        }
    }

    /// Display title.
    pub const fn title(self) -> &'static str {
        match self {
            SimKind::Projectile => "Projectile",
            SimKind::Pendulum => "Pendulum",
            SimKind::Spring => "Spring",
            SimKind::Wave => "Wave",
            SimKind::Fluid => "Fluid",
            SimKind::Orbit => "Orbit",
        }
    }

    /// Position in [`SimKind::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    /// Reads the `tab` key from a URL query string such as `?tab=orbit`.
    ///
    /// Missing or unrecognised values fall back to the default tab, the
    /// same way a page load with a stale link would.
    pub fn from_query(query: &str) -> SimKind {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "tab")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or_default()
    }

    /// The query string selecting this tab.
    pub fn to_query(self) -> String {
        format!("?tab={}", self.name())
    }
}

impl fmt::Display for SimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SimKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for kind in SimKind::ALL {
            assert_eq!(kind.name().parse::<SimKind>().unwrap(), kind);
        }
        assert_eq!("Orbit".parse::<SimKind>().unwrap(), SimKind::Orbit);
        assert!(matches!(
            "gyroscope".parse::<SimKind>(),
            Err(Error::UnknownKind(_))
        ));
    }

    #[test]
    fn test_query_round_trip() {
        assert_eq!(SimKind::from_query("?tab=fluid"), SimKind::Fluid);
        assert_eq!(SimKind::from_query("lang=en&tab=wave"), SimKind::Wave);
        assert_eq!(SimKind::from_query("?tab=bogus"), SimKind::Projectile);
        assert_eq!(SimKind::from_query(""), SimKind::Projectile);
        assert_eq!(SimKind::Orbit.to_query(), "?tab=orbit");
    }

    #[test]
    fn test_index_matches_order() {
        for (i, kind) in SimKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_readout_display() {
        assert_eq!(Readout::new("range", 40.8163, "m").to_string(), "range: 40.816 m");
        assert_eq!(Readout::new("particles", 300.0, "").to_string(), "particles: 300.000");
    }
}
