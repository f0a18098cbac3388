//! Projectile launched from a given height, with optional quadratic drag.
//!
//! Vertical motion uses exact constant-acceleration kinematics per step,
//! horizontal motion an explicit drag update. The run ends when the body
//! would pass below ground; the landing point is found by solving the
//! vertical quadratic for the crossing time instead of keeping the last
//! discrete sample, so the projectile never overshoots the ground.

use core::f64::consts::PI;

use crate::param::{ParamSet, ParamSpec};
use crate::scene::{Projection, Scene, Toggles, Viewport};
use crate::simulation::{Readout, SimKind, Simulation, Step, Timing};
use crate::theme::THEME;
use crate::trail::Trail;
use crate::vector::Vec2;

const SPECS: [ParamSpec; 5] = [
    ParamSpec::new("velocity", "Launch speed", "m/s", (5.0, 50.0), 1.0, 20.0),
    ParamSpec::new("angle", "Launch angle", "deg", (0.0, 90.0), 1.0, 45.0),
    ParamSpec::new("gravity", "Gravity", "m/s²", (1.0, 20.0), 0.1, 9.8),
    ParamSpec::new("drag", "Drag", "1/m", (0.0, 0.05), 0.001, 0.0),
    ParamSpec::new("height", "Launch height", "m", (0.0, 50.0), 1.0, 0.0),
];

/// Launch and environment settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileParams {
    /// Launch speed (m/s).
    pub velocity: f64,
    /// Launch angle above horizontal (degrees).
    pub angle: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Quadratic drag coefficient per unit mass (1/m).
    pub drag: f64,
    /// Launch altitude (m).
    pub height: f64,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            velocity: 20.0,
            angle: 45.0,
            gravity: 9.8,
            drag: 0.0,
            height: 0.0,
        }
    }
}

impl ParamSet for ProjectileParams {
    fn specs() -> &'static [ParamSpec] {
        &SPECS
    }

    fn get(&self, name: &str) -> Option<f64> {
        match name {
            "velocity" => Some(self.velocity),
            "angle" => Some(self.angle),
            "gravity" => Some(self.gravity),
            "drag" => Some(self.drag),
            "height" => Some(self.height),
            _ => None,
        }
    }

    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "velocity" => Some(&mut self.velocity),
            "angle" => Some(&mut self.angle),
            "gravity" => Some(&mut self.gravity),
            "drag" => Some(&mut self.drag),
            "height" => Some(&mut self.height),
            _ => None,
        }
    }
}

impl ProjectileParams {
    /// Initial velocity vector.
    pub fn launch_velocity(&self) -> Vec2 {
        Vec2::from_polar(self.velocity, self.angle.to_radians())
    }

    /// Closed-form range ignoring drag, including the launch height.
    pub fn predicted_range(&self) -> f64 {
        let v = self.launch_velocity();
        let g = self.gravity;
        let flight = (v.y + (v.y * v.y + 2.0 * g * self.height).sqrt()) / g;
        v.x * flight
    }

    /// Closed-form apex height ignoring drag.
    pub fn predicted_apex(&self) -> f64 {
        let vy = self.launch_velocity().y.max(0.0);
        self.height + vy * vy / (2.0 * self.gravity)
    }
}

/// Where and when the projectile touched down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// Time of flight (s).
    pub time: f64,
    /// Horizontal distance from the launch point (m).
    pub distance: f64,
}

/// Position and velocity of the projectile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileState {
    /// Position (m), y up, ground at y = 0.
    pub pos: Vec2,
    /// Velocity (m/s).
    pub vel: Vec2,
    /// Time since launch (s).
    pub time: f64,
    /// Highest altitude reached so far (m).
    pub max_height: f64,
    /// Set once the projectile has landed.
    pub landing: Option<Landing>,
}

/// Projectile motion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Projectile;

impl Simulation for Projectile {
    type Params = ProjectileParams;
    type State = ProjectileState;

    const KIND: SimKind = SimKind::Projectile;
    const TIMING: Timing = Timing::new(20, 0.02, 1);
    const TRAIL_CAP: usize = 600;

    fn init(params: &ProjectileParams) -> ProjectileState {
        ProjectileState {
            pos: Vec2::new(0.0, params.height),
            vel: params.launch_velocity(),
            time: 0.0,
            max_height: params.height,
            landing: None,
        }
    }

    fn step(state: &mut ProjectileState, params: &ProjectileParams, dt: f64) -> Step {
        if state.landing.is_some() {
            return Step::Halt(0.0);
        }

        let g = params.gravity;
        let vx = state.vel.x - params.drag * state.vel.x * state.vel.x.abs() * dt;
        let vy = state.vel.y;
        let y = state.pos.y;

        // Apex inside this step.
        if vy > 0.0 && vy - g * dt <= 0.0 {
            state.max_height = state.max_height.max(y + vy * vy / (2.0 * g));
        }

        let next_y = y + vy * dt - 0.5 * g * dt * dt;
        if next_y < 0.0 {
            // Positive root of y + vy·τ − ½gτ² = 0.
            let discriminant = (vy * vy + 2.0 * g * y.max(0.0)).max(0.0);
            let tau = ((vy + discriminant.sqrt()) / g).clamp(0.0, dt);
            state.pos = Vec2::new(state.pos.x + vx * tau, 0.0);
            state.vel = Vec2::new(vx, vy - g * tau);
            state.time += tau;
            state.landing = Some(Landing {
                time: state.time,
                distance: state.pos.x,
            });
            return Step::Halt(tau);
        }

        state.vel = Vec2::new(vx, vy - g * dt);
        state.pos = Vec2::new(state.pos.x + vx * dt, next_y);
        state.time += dt;
        state.max_height = state.max_height.max(next_y);
        Step::Continue
    }

    fn trail_point(state: &ProjectileState) -> Option<Vec2> {
        Some(state.pos)
    }

    fn readouts(state: &ProjectileState, params: &ProjectileParams) -> Vec<Readout> {
        let mut out = vec![
            Readout::new("time", state.time, "s"),
            Readout::new("distance", state.pos.x, "m"),
            Readout::new("height", state.pos.y, "m"),
            Readout::new("speed", state.vel.length(), "m/s"),
            Readout::new("max height", state.max_height, "m"),
            Readout::new("predicted range", params.predicted_range(), "m"),
        ];
        if let Some(landing) = state.landing {
            out.push(Readout::new("range", landing.distance, "m"));
            out.push(Readout::new("flight time", landing.time, "s"));
        }
        out
    }

    fn draw(
        state: &ProjectileState,
        params: &ProjectileParams,
        trail: &Trail<Vec2>,
        toggles: &Toggles,
        viewport: Viewport,
    ) -> Scene {
        let reach = params
            .predicted_range()
            .max(state.pos.x)
            .max(trail.iter().map(|p| p.x).fold(0.0, f64::max))
            .max(5.0);
        let top = params.predicted_apex().max(state.max_height).max(2.0);
        let proj = Projection::fit(
            Vec2::new(-0.05 * reach, -0.05 * top),
            Vec2::new(reach * 1.08, top * 1.15),
            viewport,
            2.0,
        );

        let mut scene = Scene::new(THEME.background);

        if toggles.guides {
            let ground = proj.point(Vec2::new(-0.05 * reach, 0.0));
            let far = proj.point(Vec2::new(reach * 1.08, 0.0));
            scene.line(ground, far, THEME.guide);
            scene.label(proj.point(Vec2::ZERO) + Vec2::new(2.0, 12.0), "0 m", THEME.muted);
        }

        // Launcher.
        let base = proj.point(Vec2::new(0.0, params.height));
        if params.height > 0.0 {
            scene.line(proj.point(Vec2::ZERO), base, THEME.anchor);
        }
        let barrel = Vec2::from_polar(reach * 0.06, params.angle * PI / 180.0);
        scene.line(base, proj.point(Vec2::new(0.0, params.height) + barrel), THEME.anchor);

        if toggles.trail {
            scene.polyline(trail.iter().map(|p| proj.point(p)).collect(), THEME.trail);
        }

        let ball = proj.point(state.pos);
        scene.disc(ball, 2.5, THEME.body);

        if toggles.vectors && state.landing.is_none() {
            scene.arrow(ball, proj.vector(state.vel * 0.15), THEME.velocity);
            scene.arrow(
                ball,
                proj.vector(Vec2::new(0.0, -params.gravity) * 0.15),
                THEME.force,
            );
        }

        if let Some(landing) = state.landing {
            let mark = proj.point(Vec2::new(landing.distance, 0.0));
            scene.ring(mark, 4.0, THEME.accent);
            scene.label(
                mark + Vec2::new(-10.0, -8.0),
                format!("{:.1} m", landing.distance),
                THEME.text,
            );
        }

        scene
    }
}
