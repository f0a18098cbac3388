//! Simple pendulum with linear damping.

use core::f64::consts::PI;

use crate::param::{ParamSet, ParamSpec};
use crate::scene::{Projection, Scene, Toggles, Viewport};
use crate::simulation::{Readout, SimKind, Simulation, Step, Timing};
use crate::theme::THEME;
use crate::trail::Trail;
use crate::vector::Vec2;

const SPECS: [ParamSpec; 5] = [
    ParamSpec::new("length", "Length", "m", (0.5, 3.0), 0.1, 1.0),
    ParamSpec::new("gravity", "Gravity", "m/s²", (1.0, 20.0), 0.1, 9.8),
    ParamSpec::new("damping", "Damping", "1/s", (0.0, 1.0), 0.01, 0.05),
    ParamSpec::new("angle", "Release angle", "deg", (5.0, 90.0), 1.0, 30.0),
    ParamSpec::new("mass", "Bob mass", "kg", (0.1, 5.0), 0.1, 1.0),
];

/// Pendulum settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PendulumParams {
    /// Rod length (m).
    pub length: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Angular damping coefficient (1/s).
    pub damping: f64,
    /// Release angle (degrees from vertical).
    pub angle: f64,
    /// Bob mass (kg).
    pub mass: f64,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            length: 1.0,
            gravity: 9.8,
            damping: 0.05,
            angle: 30.0,
            mass: 1.0,
        }
    }
}

impl ParamSet for PendulumParams {
    fn specs() -> &'static [ParamSpec] {
        &SPECS
    }

    fn get(&self, name: &str) -> Option<f64> {
        match name {
            "length" => Some(self.length),
            "gravity" => Some(self.gravity),
            "damping" => Some(self.damping),
            "angle" => Some(self.angle),
            "mass" => Some(self.mass),
            _ => None,
        }
    }

    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "length" => Some(&mut self.length),
            "gravity" => Some(&mut self.gravity),
            "damping" => Some(&mut self.damping),
            "angle" => Some(&mut self.angle),
            "mass" => Some(&mut self.mass),
            _ => None,
        }
    }
}

impl PendulumParams {
    /// Small-angle period `2π√(L/g)`.
    ///
    /// This is the harmonic approximation; at large release angles the true
    /// period is longer.
    pub fn small_angle_period(&self) -> f64 {
        2.0 * PI * (self.length / self.gravity).sqrt()
    }
}

/// Angular position and velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct PendulumState {
    /// Angle from vertical (rad), positive counter-clockwise.
    pub theta: f64,
    /// Angular velocity (rad/s).
    pub omega: f64,
    /// Simulated time (s).
    pub time: f64,
}

/// Mechanical energy breakdown (J).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Energy {
    /// Gravitational potential relative to the lowest point.
    pub potential: f64,
    /// Kinetic energy of the bob.
    pub kinetic: f64,
}

impl Energy {
    /// Potential plus kinetic.
    pub fn total(&self) -> f64 {
        self.potential + self.kinetic
    }
}

impl PendulumState {
    /// Energy of the bob for the given parameters.
    pub fn energy(&self, params: &PendulumParams) -> Energy {
        let PendulumParams {
            length: l,
            gravity: g,
            mass: m,
            ..
        } = *params;
        Energy {
            potential: m * g * l * (1.0 - self.theta.cos()),
            kinetic: 0.5 * m * l * l * self.omega * self.omega,
        }
    }

    /// Bob position relative to the pivot (m), y up.
    pub fn bob(&self, length: f64) -> Vec2 {
        Vec2::new(length * self.theta.sin(), -length * self.theta.cos())
    }
}

/// Damped pendulum integrated with semi-implicit Euler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pendulum;

impl Simulation for Pendulum {
    type Params = PendulumParams;
    type State = PendulumState;

    const KIND: SimKind = SimKind::Pendulum;
    const TIMING: Timing = Timing::new(20, 0.02, 8);
    const TRAIL_CAP: usize = 90;

    fn init(params: &PendulumParams) -> PendulumState {
        PendulumState {
            theta: params.angle.to_radians(),
            omega: 0.0,
            time: 0.0,
        }
    }

    fn step(state: &mut PendulumState, params: &PendulumParams, dt: f64) -> Step {
        let alpha =
            -(params.gravity / params.length) * state.theta.sin() - params.damping * state.omega;
        state.omega += alpha * dt;
        state.theta += state.omega * dt;
        state.time += dt;
        Step::Continue
    }

    fn resets_on_change(_name: &str) -> bool {
        true
    }

    fn trail_point(state: &PendulumState) -> Option<Vec2> {
        // Stored in unit-length coordinates; scaled by the rod when drawn.
        Some(state.bob(1.0))
    }

    fn readouts(state: &PendulumState, params: &PendulumParams) -> Vec<Readout> {
        let energy = state.energy(params);
        vec![
            Readout::new("time", state.time, "s"),
            Readout::new("angle", state.theta.to_degrees(), "deg"),
            Readout::new("angular velocity", state.omega, "rad/s"),
            Readout::new("potential energy", energy.potential, "J"),
            Readout::new("kinetic energy", energy.kinetic, "J"),
            Readout::new("total energy", energy.total(), "J"),
            Readout::new("period (small-angle)", params.small_angle_period(), "s"),
        ]
    }

    fn draw(
        state: &PendulumState,
        params: &PendulumParams,
        trail: &Trail<Vec2>,
        toggles: &Toggles,
        viewport: Viewport,
    ) -> Scene {
        let reach = params.length * 1.15;
        let proj = Projection::fit(
            Vec2::new(-reach, -reach),
            Vec2::new(reach, reach * 0.25),
            viewport,
            2.0,
        );
        let pivot = proj.point(Vec2::ZERO);
        let bob = proj.point(state.bob(params.length));
        let bob_radius = 2.0 + params.mass.sqrt() * 2.0;

        let mut scene = Scene::new(THEME.background);

        if toggles.guides {
            scene.line(
                proj.point(Vec2::new(-reach * 0.4, 0.0)),
                proj.point(Vec2::new(reach * 0.4, 0.0)),
                THEME.guide,
            );
            scene.line(pivot, proj.point(Vec2::new(0.0, -params.length)), THEME.guide);
        }

        if toggles.trail {
            scene.polyline(
                trail
                    .iter()
                    .map(|p| proj.point(p * params.length))
                    .collect(),
                THEME.trail,
            );
        }

        scene.line(pivot, bob, THEME.anchor);
        scene.disc(pivot, 1.5, THEME.anchor);
        scene.disc(bob, bob_radius, THEME.body);

        if toggles.vectors {
            let tangent = Vec2::new(state.theta.cos(), state.theta.sin());
            let velocity = tangent * (state.omega * params.length);
            scene.arrow(bob, proj.vector(velocity * 0.3), THEME.velocity);
            scene.arrow(
                bob,
                proj.vector(Vec2::new(0.0, -params.gravity) * 0.03),
                THEME.force,
            );
        }

        scene
    }
}
