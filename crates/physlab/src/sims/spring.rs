//! Horizontal spring-mass oscillator with viscous damping.

use core::f64::consts::PI;

use crate::param::{ParamSet, ParamSpec};
use crate::scene::{Projection, Scene, Toggles, Viewport};
use crate::simulation::{Readout, SimKind, Simulation, Step, Timing};
use crate::theme::THEME;
use crate::trail::Trail;
use crate::vector::Vec2;

const SPECS: [ParamSpec; 4] = [
    ParamSpec::new("mass", "Mass", "kg", (0.1, 10.0), 0.1, 1.0),
    ParamSpec::new("stiffness", "Spring constant", "N/m", (1.0, 100.0), 1.0, 10.0),
    ParamSpec::new("damping", "Damping", "kg/s", (0.0, 5.0), 0.1, 0.2),
    ParamSpec::new("displacement", "Initial displacement", "m", (-2.0, 2.0), 0.1, 1.0),
];

/// Seconds of displacement history shown in the strip chart.
const HISTORY_SECONDS: f64 = 8.0;
const COILS: usize = 10;

/// Oscillator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringParams {
    /// Mass (kg).
    pub mass: f64,
    /// Spring constant k (N/m).
    pub stiffness: f64,
    /// Damping coefficient b (kg/s).
    pub damping: f64,
    /// Displacement at release (m).
    pub displacement: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 10.0,
            damping: 0.2,
            displacement: 1.0,
        }
    }
}

impl ParamSet for SpringParams {
    fn specs() -> &'static [ParamSpec] {
        &SPECS
    }

    fn get(&self, name: &str) -> Option<f64> {
        match name {
            "mass" => Some(self.mass),
            "stiffness" => Some(self.stiffness),
            "damping" => Some(self.damping),
            "displacement" => Some(self.displacement),
            _ => None,
        }
    }

    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "mass" => Some(&mut self.mass),
            "stiffness" => Some(&mut self.stiffness),
            "damping" => Some(&mut self.damping),
            "displacement" => Some(&mut self.displacement),
            _ => None,
        }
    }
}

impl SpringParams {
    /// Undamped period `2π√(m/k)`.
    pub fn period(&self) -> f64 {
        2.0 * PI * (self.mass / self.stiffness).sqrt()
    }
}

/// Displacement from equilibrium and velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringState {
    /// Displacement (m).
    pub x: f64,
    /// Velocity (m/s).
    pub v: f64,
    /// Simulated time (s).
    pub time: f64,
}

/// Spring-mass system integrated with semi-implicit Euler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spring;

impl Simulation for Spring {
    type Params = SpringParams;
    type State = SpringState;

    const KIND: SimKind = SimKind::Spring;
    const TIMING: Timing = Timing::new(20, 0.02, 4);
    const TRAIL_CAP: usize = 400;

    fn init(params: &SpringParams) -> SpringState {
        SpringState {
            x: params.displacement,
            v: 0.0,
            time: 0.0,
        }
    }

    fn step(state: &mut SpringState, params: &SpringParams, dt: f64) -> Step {
        let force = -params.stiffness * state.x - params.damping * state.v;
        state.v += force / params.mass * dt;
        state.x += state.v * dt;
        state.time += dt;
        Step::Continue
    }

    fn resets_on_change(_name: &str) -> bool {
        true
    }

    fn trail_point(state: &SpringState) -> Option<Vec2> {
        Some(Vec2::new(state.time, state.x))
    }

    fn readouts(state: &SpringState, params: &SpringParams) -> Vec<Readout> {
        let potential = 0.5 * params.stiffness * state.x * state.x;
        let kinetic = 0.5 * params.mass * state.v * state.v;
        vec![
            Readout::new("time", state.time, "s"),
            Readout::new("displacement", state.x, "m"),
            Readout::new("velocity", state.v, "m/s"),
            Readout::new("potential energy", potential, "J"),
            Readout::new("kinetic energy", kinetic, "J"),
            Readout::new("total energy", potential + kinetic, "J"),
            Readout::new("period", params.period(), "s"),
        ]
    }

    fn draw(
        state: &SpringState,
        params: &SpringParams,
        trail: &Trail<Vec2>,
        toggles: &Toggles,
        viewport: Viewport,
    ) -> Scene {
        let amp = params.displacement.abs().max(0.5);
        let rest = amp * 1.6;
        // Upper band: the oscillator. Lower band: x(t) strip chart.
        let proj = Projection::fit(
            Vec2::new(-0.2, -amp * 2.6),
            Vec2::new(rest + amp * 1.4, amp * 0.6),
            viewport,
            2.0,
        );

        let mut scene = Scene::new(THEME.background);

        let wall_x = 0.0;
        scene.line(
            proj.point(Vec2::new(wall_x, -amp * 0.4)),
            proj.point(Vec2::new(wall_x, amp * 0.4)),
            THEME.anchor,
        );

        let mass_x = rest + state.x;
        let half = 0.15 * amp;
        let coil_amp = 0.12 * amp;
        let span = mass_x - half - wall_x;
        let coils = (0..=COILS * 2)
            .map(|i| {
                let along = wall_x + span * i as f64 / (COILS * 2) as f64;
                let offset = match i {
                    0 => 0.0,
                    n if n == COILS * 2 => 0.0,
                    n if n % 2 == 1 => coil_amp,
                    _ => -coil_amp,
                };
                proj.point(Vec2::new(along, offset))
            })
            .collect();
        scene.polyline(coils, THEME.anchor);

        scene.rect(
            proj.point(Vec2::new(mass_x - half, half)),
            proj.point(Vec2::new(mass_x + half, -half)),
            THEME.body,
            true,
        );

        if toggles.guides {
            scene.line(
                proj.point(Vec2::new(rest, amp * 0.5)),
                proj.point(Vec2::new(rest, -amp * 0.5)),
                THEME.guide,
            );
            let axis = -amp * 1.7;
            scene.line(
                proj.point(Vec2::new(0.0, axis)),
                proj.point(Vec2::new(rest + amp * 1.4, axis)),
                THEME.guide,
            );
        }

        if toggles.vectors {
            let center = proj.point(Vec2::new(mass_x, 0.0));
            scene.arrow(center, proj.vector(Vec2::new(state.v * 0.3, 0.0)), THEME.velocity);
            let force = -params.stiffness * state.x - params.damping * state.v;
            scene.arrow(
                center,
                proj.vector(Vec2::new(force / params.stiffness * 0.5, 0.0)),
                THEME.force,
            );
        }

        if toggles.trail {
            // Strip chart: time runs left to right over the last few seconds.
            let width = rest + amp * 1.4;
            let axis = -amp * 1.7;
            let now = trail.latest().map_or(0.0, |p| p.x);
            let chart = trail
                .iter()
                .filter(|p| now - p.x <= HISTORY_SECONDS)
                .map(|p| {
                    let age = (now - p.x) / HISTORY_SECONDS;
                    proj.point(Vec2::new(width * (1.0 - age), axis + p.y * 0.8))
                })
                .collect();
            scene.polyline(chart, THEME.trail);
        }

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Driver, Runner};

    /// Times of upward zero crossings, linearly interpolated.
    fn upward_crossings(driver: &mut Driver<Spring>, wanted: usize) -> Vec<f64> {
        let mut crossings = Vec::new();
        let mut prev = (driver.state().time, driver.state().x);
        while crossings.len() < wanted {
            driver.tick();
            let now = (driver.state().time, driver.state().x);
            if prev.1 < 0.0 && now.1 >= 0.0 {
                let frac = -prev.1 / (now.1 - prev.1);
                crossings.push(prev.0 + frac * (now.0 - prev.0));
            }
            prev = now;
        }
        crossings
    }

    #[test]
    fn test_period_matches_closed_form() {
        let params = SpringParams {
            damping: 0.0,
            ..SpringParams::default()
        };
        let expected = params.period();
        let mut driver = Driver::<Spring>::new(params);
        driver.start();

        let crossings = upward_crossings(&mut driver, 6);
        let measured = (crossings[5] - crossings[0]) / 5.0;
        assert!(
            (measured - expected).abs() / expected < 0.05,
            "measured {measured}, expected {expected}"
        );
    }

    #[test]
    fn test_heavier_mass_oscillates_slower() {
        let light = SpringParams {
            damping: 0.0,
            mass: 0.5,
            ..SpringParams::default()
        };
        let heavy = SpringParams {
            damping: 0.0,
            mass: 4.0,
            ..SpringParams::default()
        };
        assert!(heavy.period() > light.period());

        let mut a = Driver::<Spring>::new(light);
        let mut b = Driver::<Spring>::new(heavy);
        a.start();
        b.start();
        let ta = upward_crossings(&mut a, 3);
        let tb = upward_crossings(&mut b, 3);
        assert!(tb[2] - tb[0] > ta[2] - ta[0]);
    }

    #[test]
    fn test_damping_settles_at_equilibrium() {
        let params = SpringParams {
            damping: 2.0,
            ..SpringParams::default()
        };
        let mut state = Spring::init(&params);
        for _ in 0..20_000 {
            Spring::step(&mut state, &params, 0.005);
        }
        assert!(state.x.abs() < 1e-3);
        assert!(state.v.abs() < 1e-3);
    }
}
