//! Damped travelling wave, evaluated in closed form each frame.

use core::f64::consts::TAU;

use crate::param::{ParamSet, ParamSpec};
use crate::scene::{Projection, Scene, Toggles, Viewport};
use crate::simulation::{Readout, SimKind, Simulation, Step, Timing};
use crate::theme::THEME;
use crate::trail::Trail;
use crate::vector::Vec2;

const SPECS: [ParamSpec; 4] = [
    ParamSpec::new("amplitude", "Amplitude", "m", (0.1, 2.0), 0.1, 1.0),
    ParamSpec::new("wavenumber", "Wavenumber", "rad/m", (0.5, 5.0), 0.1, 2.0),
    ParamSpec::new("speed", "Angular speed", "rad/s", (0.5, 10.0), 0.5, 3.0),
    ParamSpec::new("damping", "Spatial damping", "1/m", (0.0, 0.5), 0.01, 0.05),
];

/// Length of the sampled domain (m).
pub const LENGTH: f64 = 10.0;
const SAMPLES: usize = 240;
/// Position of the tracked marker (m).
const MARKER_X: f64 = 2.0;

/// Wave shape settings.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveParams {
    /// Peak displacement A (m).
    pub amplitude: f64,
    /// Spatial angular frequency ω (rad/m).
    pub wavenumber: f64,
    /// Temporal angular frequency c (rad/s).
    pub speed: f64,
    /// Exponential decay along x (1/m).
    pub damping: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            wavenumber: 2.0,
            speed: 3.0,
            damping: 0.05,
        }
    }
}

impl ParamSet for WaveParams {
    fn specs() -> &'static [ParamSpec] {
        &SPECS
    }

    fn get(&self, name: &str) -> Option<f64> {
        match name {
            "amplitude" => Some(self.amplitude),
            "wavenumber" => Some(self.wavenumber),
            "speed" => Some(self.speed),
            "damping" => Some(self.damping),
            _ => None,
        }
    }

    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "amplitude" => Some(&mut self.amplitude),
            "wavenumber" => Some(&mut self.wavenumber),
            "speed" => Some(&mut self.speed),
            "damping" => Some(&mut self.damping),
            _ => None,
        }
    }
}

impl WaveParams {
    /// `y(x, t) = A·sin(ωx − ct)·e^(−damping·x)`.
    pub fn displacement(&self, x: f64, t: f64) -> f64 {
        self.envelope(x) * (self.wavenumber * x - self.speed * t).sin()
    }

    /// `A·e^(−damping·x)`, the bound on |y| at `x`.
    pub fn envelope(&self, x: f64) -> f64 {
        self.amplitude * (-self.damping * x).exp()
    }
}

/// The only evolving quantity is time.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveState {
    /// Simulated time (s).
    pub time: f64,
}

/// Travelling wave.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wave;

impl Simulation for Wave {
    type Params = WaveParams;
    type State = WaveState;

    const KIND: SimKind = SimKind::Wave;
    const TIMING: Timing = Timing::new(30, 0.03, 1);
    const TRAIL_CAP: usize = 0;

    fn init(_params: &WaveParams) -> WaveState {
        WaveState { time: 0.0 }
    }

    fn step(state: &mut WaveState, _params: &WaveParams, dt: f64) -> Step {
        state.time += dt;
        Step::Continue
    }

    fn readouts(state: &WaveState, params: &WaveParams) -> Vec<Readout> {
        vec![
            Readout::new("time", state.time, "s"),
            Readout::new("wavelength", TAU / params.wavenumber, "m"),
            Readout::new("period", TAU / params.speed, "s"),
            Readout::new("phase velocity", params.speed / params.wavenumber, "m/s"),
            Readout::new(
                "marker displacement",
                params.displacement(MARKER_X, state.time),
                "m",
            ),
        ]
    }

    fn draw(
        state: &WaveState,
        params: &WaveParams,
        _trail: &Trail<Vec2>,
        toggles: &Toggles,
        viewport: Viewport,
    ) -> Scene {
        let a = params.amplitude.max(0.1) * 1.2;
        let proj = Projection::fit(Vec2::new(0.0, -a), Vec2::new(LENGTH, a), viewport, 2.0);

        let mut scene = Scene::new(THEME.background);

        if toggles.guides {
            scene.line(
                proj.point(Vec2::ZERO),
                proj.point(Vec2::new(LENGTH, 0.0)),
                THEME.guide,
            );
            let upper = sample(|x| params.envelope(x));
            let lower = sample(|x| -params.envelope(x));
            scene.polyline(upper.into_iter().map(|p| proj.point(p)).collect(), THEME.guide);
            scene.polyline(lower.into_iter().map(|p| proj.point(p)).collect(), THEME.guide);
        }

        let curve = sample(|x| params.displacement(x, state.time));
        scene.polyline(curve.into_iter().map(|p| proj.point(p)).collect(), THEME.trail);

        let marker = Vec2::new(MARKER_X, params.displacement(MARKER_X, state.time));
        scene.disc(proj.point(marker), 2.5, THEME.body);

        if toggles.vectors {
            // ∂y/∂t at the marker.
            let vy = -params.speed
                * params.envelope(MARKER_X)
                * (params.wavenumber * MARKER_X - params.speed * state.time).cos();
            scene.arrow(
                proj.point(marker),
                proj.vector(Vec2::new(0.0, vy * 0.2)),
                THEME.velocity,
            );
        }

        scene
    }
}

fn sample(f: impl Fn(f64) -> f64) -> Vec<Vec2> {
    (0..=SAMPLES)
        .map(|i| {
            let x = LENGTH * i as f64 / SAMPLES as f64;
            Vec2::new(x, f(x))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_at_origin_and_start() {
        let params = WaveParams::default();
        assert_eq!(params.displacement(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_bounded_by_envelope() {
        let params = WaveParams {
            damping: 0.3,
            ..WaveParams::default()
        };
        for i in 0..200 {
            let x = i as f64 * 0.05;
            for j in 0..20 {
                let t = j as f64 * 0.17;
                assert!(params.displacement(x, t).abs() <= params.envelope(x) + 1e-12);
            }
        }
    }

    #[test]
    fn test_pattern_travels_at_phase_velocity() {
        let params = WaveParams {
            damping: 0.0,
            ..WaveParams::default()
        };
        let shift_t = 0.4;
        let shift_x = params.speed / params.wavenumber * shift_t;
        for i in 0..50 {
            let x = i as f64 * 0.1;
            let before = params.displacement(x, 1.0);
            let after = params.displacement(x + shift_x, 1.0 + shift_t);
            assert!((before - after).abs() < 1e-9);
        }
    }

    #[test]
    fn test_step_only_advances_time() {
        let params = WaveParams::default();
        let mut state = Wave::init(&params);
        Wave::step(&mut state, &params, 0.5);
        assert_eq!(state, WaveState { time: 0.5 });
    }
}
