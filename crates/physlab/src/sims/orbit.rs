//! Newtonian gravity between a pinned star and a planet.
//!
//! Forces are accumulated pairwise over all bodies, so the stepper works
//! for any body count, but the first body is pinned: after every step it is
//! put back at the origin with zero velocity, whatever force it felt. That
//! keeps the picture steady at the cost of momentum conservation.

use core::f64::consts::TAU;

use crate::param::{ParamSet, ParamSpec};
use crate::scene::{Projection, Scene, Toggles, Viewport};
use crate::simulation::{Readout, SimKind, Simulation, Step, Timing};
use crate::theme::THEME;
use crate::trail::Trail;
use crate::vector::Vec2;

/// Gravitational constant in simulation units.
pub const G: f64 = 1.0;

const SPECS: [ParamSpec; 4] = [
    ParamSpec::new("star_mass", "Star mass", "", (100.0, 5000.0), 100.0, 1000.0),
    ParamSpec::new("planet_mass", "Planet mass", "", (0.1, 10.0), 0.1, 1.0),
    ParamSpec::new("distance", "Distance", "", (50.0, 200.0), 5.0, 100.0),
    ParamSpec::new("speed", "Speed × circular", "", (0.5, 1.5), 0.05, 1.0),
];

/// Initial configuration of the two bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitParams {
    /// Mass of the pinned primary.
    pub star_mass: f64,
    /// Mass of the orbiting body.
    pub planet_mass: f64,
    /// Starting separation.
    pub distance: f64,
    /// Launch speed as a multiple of the circular-orbit speed.
    pub speed: f64,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            star_mass: 1000.0,
            planet_mass: 1.0,
            distance: 100.0,
            speed: 1.0,
        }
    }
}

impl ParamSet for OrbitParams {
    fn specs() -> &'static [ParamSpec] {
        &SPECS
    }

    fn get(&self, name: &str) -> Option<f64> {
        match name {
            "star_mass" => Some(self.star_mass),
            "planet_mass" => Some(self.planet_mass),
            "distance" => Some(self.distance),
            "speed" => Some(self.speed),
            _ => None,
        }
    }

    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "star_mass" => Some(&mut self.star_mass),
            "planet_mass" => Some(&mut self.planet_mass),
            "distance" => Some(&mut self.distance),
            "speed" => Some(&mut self.speed),
            _ => None,
        }
    }
}

impl OrbitParams {
    /// `GM` of the primary.
    pub fn mu(&self) -> f64 {
        G * self.star_mass
    }

    /// Speed of a circular orbit at the starting distance, `√(GM/r)`.
    pub fn circular_speed(&self) -> f64 {
        (self.mu() / self.distance).sqrt()
    }
}

/// A point mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Position.
    pub pos: Vec2,
    /// Velocity.
    pub vel: Vec2,
    /// Mass.
    pub mass: f64,
    /// Held at the origin after every step.
    pub pinned: bool,
}

/// All bodies plus the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitState {
    /// Bodies; index 0 is the star, index 1 the planet.
    pub bodies: Vec<Body>,
    /// Simulated time.
    pub time: f64,
}

impl OrbitState {
    /// The orbiting body, if present.
    pub fn planet(&self) -> Option<&Body> {
        self.bodies.get(1)
    }
}

/// Osculating elements of the planet relative to the star.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Elements {
    distance: f64,
    speed: f64,
    energy: f64,
    eccentricity: f64,
    period: Option<f64>,
}

impl Elements {
    fn of(planet: &Body, mu: f64) -> Self {
        let r = planet.pos;
        let v = planet.vel;
        let distance = r.length();
        let speed = v.length();
        let energy = 0.5 * speed * speed - mu / distance;
        let e = (r * (speed * speed - mu / distance) - v * r.dot(v)) / mu;
        let period = (energy < 0.0).then(|| {
            let a = -mu / (2.0 * energy);
            TAU * (a * a * a / mu).sqrt()
        });
        Self {
            distance,
            speed,
            energy,
            eccentricity: e.length(),
            period,
        }
    }
}

/// Accelerations from every pair, skipping coincident bodies.
fn accelerations(bodies: &[Body]) -> Vec<Vec2> {
    let mut acc = vec![Vec2::ZERO; bodies.len()];
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let d = bodies[j].pos - bodies[i].pos;
            let r2 = d.length_squared();
            if r2 == 0.0 {
                continue;
            }
            let force = G * bodies[i].mass * bodies[j].mass / r2;
            let dir = d / r2.sqrt();
            acc[i] += dir * (force / bodies[i].mass);
            acc[j] -= dir * (force / bodies[j].mass);
        }
    }
    acc
}

/// Two-body gravity with a pinned primary.
#[derive(Debug, Clone, Copy, Default)]
pub struct Orbit;

impl Simulation for Orbit {
    type Params = OrbitParams;
    type State = OrbitState;

    const KIND: SimKind = SimKind::Orbit;
    const TIMING: Timing = Timing::new(20, 0.2, 20);
    const TRAIL_CAP: usize = 400;

    fn init(params: &OrbitParams) -> OrbitState {
        let star = Body {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            mass: params.star_mass,
            pinned: true,
        };
        let planet = Body {
            pos: Vec2::new(params.distance, 0.0),
            vel: Vec2::new(0.0, params.circular_speed() * params.speed),
            mass: params.planet_mass,
            pinned: false,
        };
        OrbitState {
            bodies: vec![star, planet],
            time: 0.0,
        }
    }

    fn step(state: &mut OrbitState, _params: &OrbitParams, dt: f64) -> Step {
        let acc = accelerations(&state.bodies);
        for (body, a) in state.bodies.iter_mut().zip(acc) {
            body.vel += a * dt;
            body.pos += body.vel * dt;
            if body.pinned {
                body.pos = Vec2::ZERO;
                body.vel = Vec2::ZERO;
            }
        }
        state.time += dt;
        Step::Continue
    }

    fn resets_on_change(_name: &str) -> bool {
        true
    }

    fn trail_point(state: &OrbitState) -> Option<Vec2> {
        state.planet().map(|p| p.pos)
    }

    fn readouts(state: &OrbitState, params: &OrbitParams) -> Vec<Readout> {
        let mut out = vec![Readout::new("time", state.time, "")];
        let Some(planet) = state.planet() else {
            return out;
        };
        let el = Elements::of(planet, params.mu());
        out.extend([
            Readout::new("distance", el.distance, ""),
            Readout::new("speed", el.speed, ""),
            Readout::new("specific energy", el.energy, ""),
            Readout::new("eccentricity", el.eccentricity, ""),
        ]);
        if let Some(period) = el.period {
            out.push(Readout::new("period", period, ""));
        }
        out
    }

    fn draw(
        state: &OrbitState,
        params: &OrbitParams,
        trail: &Trail<Vec2>,
        toggles: &Toggles,
        viewport: Viewport,
    ) -> Scene {
        let current = state.planet().map_or(0.0, |p| p.pos.length());
        let extent = (params.distance * 1.6)
            .max(current * 1.1)
            .min(params.distance * 6.0);
        let proj = Projection::fit(
            Vec2::new(-extent, -extent),
            Vec2::new(extent, extent),
            viewport,
            1.0,
        );

        let mut scene = Scene::new(THEME.background);

        if toggles.guides {
            scene.ring(
                proj.point(Vec2::ZERO),
                proj.length(params.distance),
                THEME.guide,
            );
        }

        if toggles.trail {
            scene.polyline(trail.iter().map(|p| proj.point(p)).collect(), THEME.trail);
        }

        let acc = accelerations(&state.bodies);
        for (body, a) in state.bodies.iter().zip(acc) {
            let at = proj.point(body.pos);
            if body.pinned {
                scene.disc(at, 2.0 + (body.mass / 1000.0).sqrt() * 2.0, THEME.body);
            } else {
                scene.disc(at, 1.5 + body.mass.sqrt() * 0.5, THEME.cold);
                if toggles.vectors {
                    scene.arrow(at, proj.vector(body.vel * 4.0), THEME.velocity);
                    scene.arrow(at, proj.vector(a * 40.0), THEME.force);
                }
            }
        }

        scene
    }
}
