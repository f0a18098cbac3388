//! Particle flow past a circular obstacle.
//!
//! This is a visual tracer model, not a fluid solver: each particle relaxes
//! toward an imposed inflow velocity (parabolic when laminar, uniform with
//! random kicks when turbulent) or random-walks (diffusion). Particles
//! bounce elastically off the obstacle and are recycled from a fixed pool
//! when they leave the domain or outlive their random lifetime.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::param::{ParamSet, ParamSpec};
use crate::scene::{Projection, Scene, Toggles, Viewport};
use crate::simulation::{Readout, SimKind, Simulation, Step, Timing};
use crate::theme::THEME;
use crate::trail::Trail;
use crate::vector::Vec2;

/// Width and height of the flow channel (m).
pub const DOMAIN: Vec2 = Vec2::new(2.0, 1.0);
/// Clearance added to the obstacle radius for collision tests (m).
pub const MARGIN: f64 = 0.01;
/// Gap left between a deflected particle and the enlarged obstacle.
const SEPARATION: f64 = 1e-6;
const OBSTACLE_CENTER: Vec2 = Vec2::new(0.6, 0.5);
const DIFFUSION_SOURCE: Vec2 = Vec2::new(1.4, 0.5);
const SEED: u64 = 0x0005_eed0_f1d0;

const MODES: [&str; 3] = ["laminar", "turbulent", "diffusion"];

const SPECS: [ParamSpec; 5] = [
    ParamSpec::choice("mode", "Mode", &MODES, 0),
    ParamSpec::new("flow", "Flow speed", "m/s", (0.1, 2.0), 0.1, 0.5),
    ParamSpec::new("viscosity", "Viscosity", "", (0.0, 1.0), 0.05, 0.2),
    ParamSpec::count("particles", "Particles", (50.0, 600.0), 10.0, 300.0),
    ParamSpec::new("obstacle", "Obstacle radius", "m", (0.05, 0.3), 0.01, 0.12),
];

/// How particles move between collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowMode {
    /// Smooth channel flow with a parabolic velocity profile.
    Laminar,
    /// Uniform flow plus random velocity kicks.
    Turbulent,
    /// No mean flow; particles random-walk from a point source.
    Diffusion,
}

impl FlowMode {
    /// Decodes the `mode` parameter.
    pub fn from_value(value: f64) -> Self {
        match value.round() as i64 {
            i64::MIN..=0 => FlowMode::Laminar,
            1 => FlowMode::Turbulent,
            _ => FlowMode::Diffusion,
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            FlowMode::Laminar => MODES[0],
            FlowMode::Turbulent => MODES[1],
            FlowMode::Diffusion => MODES[2],
        }
    }
}

/// Flow settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidParams {
    /// Encoded [`FlowMode`] (0, 1 or 2).
    pub mode: f64,
    /// Mean inflow speed (m/s).
    pub flow: f64,
    /// Damping of velocity fluctuations, 0 to 1.
    pub viscosity: f64,
    /// Pool size.
    pub particles: f64,
    /// Obstacle radius (m).
    pub obstacle: f64,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            mode: 0.0,
            flow: 0.5,
            viscosity: 0.2,
            particles: 300.0,
            obstacle: 0.12,
        }
    }
}

impl ParamSet for FluidParams {
    fn specs() -> &'static [ParamSpec] {
        &SPECS
    }

    fn get(&self, name: &str) -> Option<f64> {
        match name {
            "mode" => Some(self.mode),
            "flow" => Some(self.flow),
            "viscosity" => Some(self.viscosity),
            "particles" => Some(self.particles),
            "obstacle" => Some(self.obstacle),
            _ => None,
        }
    }

    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "mode" => Some(&mut self.mode),
            "flow" => Some(&mut self.flow),
            "viscosity" => Some(&mut self.viscosity),
            "particles" => Some(&mut self.particles),
            "obstacle" => Some(&mut self.obstacle),
            _ => None,
        }
    }
}

impl FluidParams {
    /// Decoded flow mode.
    pub fn flow_mode(&self) -> FlowMode {
        FlowMode::from_value(self.mode)
    }

    /// Pool size as a count.
    pub fn particle_count(&self) -> usize {
        self.particles.round().max(0.0) as usize
    }

    /// The obstacle for the current radius.
    pub fn obstacle(&self) -> Obstacle {
        Obstacle {
            center: OBSTACLE_CENTER,
            radius: self.obstacle,
        }
    }

    /// Imposed horizontal velocity at height `y`.
    fn inflow(&self, y: f64) -> f64 {
        match self.flow_mode() {
            FlowMode::Laminar => {
                let s = (y / DOMAIN.y).clamp(0.0, 1.0);
                self.flow * 6.0 * s * (1.0 - s)
            }
            FlowMode::Turbulent => self.flow,
            FlowMode::Diffusion => 0.0,
        }
    }
}

/// A fixed circular obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Centre (m).
    pub center: Vec2,
    /// Radius (m), without [`MARGIN`].
    pub radius: f64,
}

/// One tracer particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position (m).
    pub pos: Vec2,
    /// Velocity (m/s).
    pub vel: Vec2,
    /// Seconds since (re)spawn.
    pub age: f64,
    /// Lifetime after which the particle is recycled.
    pub max_age: f64,
}

/// The particle pool and its random source.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidState {
    /// Live particles.
    pub particles: Vec<Particle>,
    /// Simulated time (s).
    pub time: f64,
    rng: Pcg64,
}

/// Moves a particle that would cross the obstacle during this step.
///
/// The enlarged circle (radius plus [`MARGIN`]) is intersected with the
/// straight path `pos → pos + vel·dt`. On a hit the particle is placed just
/// outside the enlarged circle at the contact point and its velocity is
/// reflected about the outward normal, `v' = v − 2(v·n)n`. A particle that
/// already sits inside is pushed out along the normal. Returns true when the
/// particle was moved; the caller then skips the free-flight update.
pub fn deflect(particle: &mut Particle, obstacle: &Obstacle, dt: f64) -> bool {
    let reach = obstacle.radius + MARGIN;
    let offset = particle.pos - obstacle.center;
    let dist_sq = offset.length_squared();

    if dist_sq < reach * reach {
        // Coincident with the centre: no normal, leave it alone.
        let Some(normal) = offset.normalized() else {
            return false;
        };
        particle.pos = obstacle.center + normal * (reach + SEPARATION);
        if particle.vel.dot(normal) < 0.0 {
            particle.vel = particle.vel.reflect(normal);
        }
        return true;
    }

    let travel = particle.vel * dt;
    let a = travel.length_squared();
    if a <= 0.0 {
        return false;
    }
    let b = 2.0 * offset.dot(travel);
    let c = dist_sq - reach * reach;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return false;
    }
    let s = (-b - discriminant.sqrt()) / (2.0 * a);
    if !(0.0..=1.0).contains(&s) {
        return false;
    }

    let contact = particle.pos + travel * s;
    let Some(normal) = (contact - obstacle.center).normalized() else {
        return false;
    };
    particle.vel = particle.vel.reflect(normal);
    particle.pos = obstacle.center + normal * (reach + SEPARATION);
    true
}

fn jitter(rng: &mut Pcg64) -> Vec2 {
    Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
}

fn spawn(rng: &mut Pcg64, params: &FluidParams) -> Particle {
    match params.flow_mode() {
        FlowMode::Laminar | FlowMode::Turbulent => {
            let y = rng.random_range(0.02..0.98) * DOMAIN.y;
            Particle {
                pos: Vec2::new(0.0, y),
                vel: Vec2::new(params.inflow(y), 0.0),
                age: 0.0,
                max_age: rng.random_range(4.0..10.0),
            }
        }
        FlowMode::Diffusion => Particle {
            pos: DIFFUSION_SOURCE + jitter(rng) * 0.02,
            vel: jitter(rng) * 0.05,
            age: 0.0,
            max_age: rng.random_range(6.0..12.0),
        },
    }
}

/// Spreads a fresh particle over the channel so the first frame is not
/// empty.
fn scatter(rng: &mut Pcg64, params: &FluidParams) -> Particle {
    let mut particle = spawn(rng, params);
    if params.flow_mode() != FlowMode::Diffusion {
        let x = rng.random_range(0.0..DOMAIN.x);
        particle.pos.x = x;
        let obstacle = params.obstacle();
        if (particle.pos - obstacle.center).length() < obstacle.radius + MARGIN {
            particle.pos.x = 0.0;
        }
    }
    particle.age = rng.random_range(0.0..particle.max_age);
    particle
}

/// Applies the channel walls. Returns true when the particle left through
/// an open boundary and must be recycled.
fn bound(particle: &mut Particle, mode: FlowMode) -> bool {
    let Particle { pos, vel, .. } = particle;

    if pos.y < 0.0 {
        pos.y = -pos.y;
        vel.y = vel.y.abs();
    } else if pos.y > DOMAIN.y {
        pos.y = 2.0 * DOMAIN.y - pos.y;
        vel.y = -vel.y.abs();
    }
    pos.y = pos.y.clamp(0.0, DOMAIN.y);

    match mode {
        FlowMode::Laminar | FlowMode::Turbulent => pos.x < 0.0 || pos.x > DOMAIN.x,
        FlowMode::Diffusion => {
            if pos.x < 0.0 {
                pos.x = -pos.x;
                vel.x = vel.x.abs();
            } else if pos.x > DOMAIN.x {
                pos.x = 2.0 * DOMAIN.x - pos.x;
                vel.x = -vel.x.abs();
            }
            pos.x = pos.x.clamp(0.0, DOMAIN.x);
            false
        }
    }
}

/// Tracer particles in a channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fluid;

impl Simulation for Fluid {
    type Params = FluidParams;
    type State = FluidState;

    const KIND: SimKind = SimKind::Fluid;
    const TIMING: Timing = Timing::new(30, 0.03, 3);
    const TRAIL_CAP: usize = 0;

    fn init(params: &FluidParams) -> FluidState {
        let mut rng = Pcg64::seed_from_u64(SEED);
        let particles = (0..params.particle_count())
            .map(|_| scatter(&mut rng, params))
            .collect();
        FluidState {
            particles,
            time: 0.0,
            rng,
        }
    }

    fn step(state: &mut FluidState, params: &FluidParams, dt: f64) -> Step {
        let FluidState {
            particles,
            rng,
            time,
        } = state;

        let wanted = params.particle_count();
        particles.truncate(wanted);
        while particles.len() < wanted {
            particles.push(spawn(rng, params));
        }

        let mode = params.flow_mode();
        let obstacle = params.obstacle();
        let relax = ((1.5 + 6.0 * params.viscosity) * dt).min(1.0);
        let kick = dt.sqrt();

        for particle in particles.iter_mut() {
            match mode {
                FlowMode::Laminar => {
                    let target = Vec2::new(params.inflow(particle.pos.y), 0.0);
                    particle.vel += (target - particle.vel) * relax;
                }
                FlowMode::Turbulent => {
                    let target = Vec2::new(params.flow, 0.0);
                    particle.vel += (target - particle.vel) * relax;
                    let strength = params.flow * 1.5 * (1.0 - 0.8 * params.viscosity);
                    particle.vel += jitter(rng) * (strength * kick);
                }
                FlowMode::Diffusion => {
                    let strength = 0.4 * (1.0 - 0.7 * params.viscosity);
                    particle.vel += jitter(rng) * (strength * kick);
                    let decay = (1.0 - (2.0 + 4.0 * params.viscosity) * dt).max(0.0);
                    particle.vel = particle.vel * decay;
                }
            }

            if !deflect(particle, &obstacle, dt) {
                particle.pos += particle.vel * dt;
            }
            let escaped = bound(particle, mode);

            particle.age += dt;
            if escaped || particle.age > particle.max_age {
                *particle = spawn(rng, params);
            }
        }

        *time += dt;
        Step::Continue
    }

    fn resets_on_change(name: &str) -> bool {
        name == "mode"
    }

    fn readouts(state: &FluidState, params: &FluidParams) -> Vec<Readout> {
        let count = state.particles.len();
        let (sum, max) = state
            .particles
            .iter()
            .map(|p| p.vel.length())
            .fold((0.0, 0.0_f64), |(sum, max), speed| (sum + speed, max.max(speed)));
        let mean = if count == 0 { 0.0 } else { sum / count as f64 };
        vec![
            Readout::new("time", state.time, "s"),
            Readout::new("particles", count as f64, ""),
            Readout::new("mean speed", mean, "m/s"),
            Readout::new("max speed", max, "m/s"),
            Readout::new("obstacle radius", params.obstacle, "m"),
        ]
    }

    fn draw(
        state: &FluidState,
        params: &FluidParams,
        _trail: &Trail<Vec2>,
        toggles: &Toggles,
        viewport: Viewport,
    ) -> Scene {
        let proj = Projection::fit(Vec2::ZERO, DOMAIN, viewport, 1.0);
        let mut scene = Scene::new(THEME.background).with_persistence(0.35);

        if toggles.guides {
            scene.rect(
                proj.point(Vec2::new(0.0, DOMAIN.y)),
                proj.point(Vec2::new(DOMAIN.x, 0.0)),
                THEME.guide,
                false,
            );
        }

        let obstacle = params.obstacle();
        scene.disc(
            proj.point(obstacle.center),
            proj.length(obstacle.radius),
            THEME.anchor,
        );

        let reference = match params.flow_mode() {
            FlowMode::Diffusion => 0.3,
            _ => params.flow * 1.5,
        };
        for (i, particle) in state.particles.iter().enumerate() {
            let at = proj.point(particle.pos);
            let heat = particle.vel.length() / reference;
            scene.disc(at, 0.6, THEME.heat(heat));
            if toggles.vectors && i % 12 == 0 {
                scene.arrow(at, proj.vector(particle.vel * 0.1), THEME.velocity);
            }
        }

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle() -> Obstacle {
        FluidParams::default().obstacle()
    }

    fn outward_normal(pos: Vec2) -> Vec2 {
        (pos - obstacle().center).normalized().unwrap()
    }

    #[test]
    fn test_deflect_head_on() {
        let obs = obstacle();
        let reach = obs.radius + MARGIN;
        let mut p = Particle {
            pos: obs.center - Vec2::new(reach + 0.02, 0.0),
            vel: Vec2::new(5.0, 0.3),
            age: 0.0,
            max_age: 100.0,
        };
        assert!(deflect(&mut p, &obs, 0.01));
        assert!((p.pos - obs.center).length() > reach);
        let n = outward_normal(p.pos);
        assert!(p.vel.dot(n) > 0.0);
        assert!((p.vel.length() - Vec2::new(5.0, 0.3).length()).abs() < 1e-9);
    }

    #[test]
    fn test_deflect_ignores_miss() {
        let obs = obstacle();
        let mut p = Particle {
            pos: Vec2::new(0.1, 0.05),
            vel: Vec2::new(1.0, 0.0),
            age: 0.0,
            max_age: 100.0,
        };
        let before = p;
        assert!(!deflect(&mut p, &obs, 0.01));
        assert_eq!(p, before);
    }

    #[test]
    fn test_deflect_skips_centre() {
        let obs = obstacle();
        let mut p = Particle {
            pos: obs.center,
            vel: Vec2::new(1.0, 0.0),
            age: 0.0,
            max_age: 100.0,
        };
        assert!(!deflect(&mut p, &obs, 0.01));
        assert!(p.pos.is_finite() && p.vel.is_finite());
    }

    #[test]
    fn test_deflect_pushes_out_embedded_particle() {
        let obs = obstacle();
        let mut p = Particle {
            pos: obs.center + Vec2::new(0.0, obs.radius * 0.5),
            vel: Vec2::new(0.0, -1.0),
            age: 0.0,
            max_age: 100.0,
        };
        assert!(deflect(&mut p, &obs, 0.01));
        assert!((p.pos - obs.center).length() > obs.radius + MARGIN);
        assert!(p.vel.y > 0.0);
    }

    #[test]
    fn test_step_bounces_particle_off_obstacle() {
        let params = FluidParams::default();
        let obs = params.obstacle();
        let reach = obs.radius + MARGIN;
        let mut state = Fluid::init(&params);
        state.particles[0] = Particle {
            pos: obs.center - Vec2::new(reach + 0.005, 0.0),
            vel: Vec2::new(3.0, 0.0),
            age: 0.0,
            max_age: 100.0,
        };
        Fluid::step(&mut state, &params, 0.01);

        let p = state.particles[0];
        assert!((p.pos - obs.center).length() > reach);
        assert!(p.vel.dot(outward_normal(p.pos)) > 0.0);
    }

    #[test]
    fn test_pool_follows_particle_param() {
        let mut params = FluidParams::default();
        let mut state = Fluid::init(&params);
        assert_eq!(state.particles.len(), 300);

        params.particles = 120.0;
        Fluid::step(&mut state, &params, 0.01);
        assert_eq!(state.particles.len(), 120);

        params.particles = 400.0;
        Fluid::step(&mut state, &params, 0.01);
        assert_eq!(state.particles.len(), 400);
    }

    #[test]
    fn test_escaped_particle_recycles_to_inlet() {
        let params = FluidParams::default();
        let mut state = Fluid::init(&params);
        state.particles[0] = Particle {
            pos: Vec2::new(DOMAIN.x - 0.001, 0.2),
            vel: Vec2::new(1.0, 0.0),
            age: 0.0,
            max_age: 100.0,
        };
        Fluid::step(&mut state, &params, 0.01);
        let p = state.particles[0];
        assert_eq!(p.pos.x, 0.0);
        assert_eq!(p.age, 0.0);
    }

    #[test]
    fn test_diffusion_bounces_off_side_walls() {
        let mut left = Particle {
            pos: Vec2::new(-0.01, 0.5),
            vel: Vec2::new(-0.2, 0.1),
            age: 1.0,
            max_age: 100.0,
        };
        assert!(!bound(&mut left, FlowMode::Diffusion));
        assert!((left.pos.x - 0.01).abs() < 1e-12);
        assert!(left.vel.x > 0.0);
        assert_eq!(left.vel.y, 0.1);

        let mut right = Particle {
            pos: Vec2::new(DOMAIN.x + 0.02, 0.3),
            vel: Vec2::new(0.2, 0.0),
            age: 1.0,
            max_age: 100.0,
        };
        assert!(!bound(&mut right, FlowMode::Diffusion));
        assert!((right.pos.x - (DOMAIN.x - 0.02)).abs() < 1e-12);
        assert!(right.vel.x < 0.0);
    }

    #[test]
    fn test_flow_modes_bounce_off_top_and_bottom() {
        for mode in [FlowMode::Laminar, FlowMode::Turbulent] {
            let mut low = Particle {
                pos: Vec2::new(1.0, -0.02),
                vel: Vec2::new(0.5, -0.3),
                age: 0.0,
                max_age: 100.0,
            };
            assert!(!bound(&mut low, mode));
            assert!((low.pos.y - 0.02).abs() < 1e-12);
            assert!(low.vel.y > 0.0);
            assert_eq!(low.vel.x, 0.5);

            let mut high = Particle {
                pos: Vec2::new(1.0, DOMAIN.y + 0.03),
                vel: Vec2::new(0.5, 0.4),
                age: 0.0,
                max_age: 100.0,
            };
            assert!(!bound(&mut high, mode));
            assert!((high.pos.y - (DOMAIN.y - 0.03)).abs() < 1e-12);
            assert!(high.vel.y < 0.0);
        }
    }

    #[test]
    fn test_flow_modes_recycle_at_either_end() {
        let mut upstream = Particle {
            pos: Vec2::new(-0.01, 0.5),
            vel: Vec2::new(-0.1, 0.0),
            age: 0.0,
            max_age: 100.0,
        };
        assert!(bound(&mut upstream, FlowMode::Turbulent));
        let mut downstream = Particle {
            pos: Vec2::new(DOMAIN.x + 0.01, 0.5),
            vel: Vec2::new(0.1, 0.0),
            age: 0.0,
            max_age: 100.0,
        };
        assert!(bound(&mut downstream, FlowMode::Laminar));
    }

    #[test]
    fn test_diffusion_step_keeps_wall_hitter() {
        let params = FluidParams {
            mode: 2.0,
            ..FluidParams::default()
        };
        let mut state = Fluid::init(&params);
        state.particles[0] = Particle {
            pos: Vec2::new(DOMAIN.x - 0.001, 0.2),
            vel: Vec2::new(1.0, 0.0),
            age: 0.5,
            max_age: 100.0,
        };
        Fluid::step(&mut state, &params, 0.01);
        let p = state.particles[0];
        assert!((p.age - 0.51).abs() < 1e-12, "recycled: {p:?}");
        assert!(p.pos.x > DOMAIN.x - 0.05 && p.pos.x <= DOMAIN.x, "{p:?}");
        assert!(p.vel.x < 0.0, "{p:?}");
    }

    #[test]
    fn test_old_particle_recycles_to_inlet() {
        let params = FluidParams::default();
        let mut state = Fluid::init(&params);
        state.particles[0] = Particle {
            pos: Vec2::new(0.3, 0.2),
            vel: Vec2::new(0.1, 0.0),
            age: 5.0,
            max_age: 5.0,
        };
        Fluid::step(&mut state, &params, 0.01);
        let p = state.particles[0];
        assert_eq!(p.age, 0.0);
        assert_eq!(p.pos.x, 0.0);
        assert!(p.max_age >= 4.0 && p.max_age < 10.0);
    }

    #[test]
    fn test_young_particle_keeps_flowing() {
        let params = FluidParams::default();
        let mut state = Fluid::init(&params);
        state.particles[0] = Particle {
            pos: Vec2::new(0.3, 0.2),
            vel: Vec2::new(0.1, 0.0),
            age: 4.0,
            max_age: 5.0,
        };
        Fluid::step(&mut state, &params, 0.01);
        let p = state.particles[0];
        assert!((p.age - 4.01).abs() < 1e-12);
        assert!(p.pos.x > 0.3);
    }

    #[test]
    fn test_particles_stay_in_domain() {
        for mode in 0..3 {
            let params = FluidParams {
                mode: f64::from(mode),
                flow: 2.0,
                viscosity: 0.0,
                ..FluidParams::default()
            };
            let mut state = Fluid::init(&params);
            for _ in 0..500 {
                Fluid::step(&mut state, &params, 0.01);
            }
            let obs = params.obstacle();
            for p in &state.particles {
                assert!(p.pos.x >= 0.0 && p.pos.x <= DOMAIN.x, "{p:?}");
                assert!(p.pos.y >= 0.0 && p.pos.y <= DOMAIN.y, "{p:?}");
                assert!(p.pos.is_finite() && p.vel.is_finite());
                assert!((p.pos - obs.center).length() >= obs.radius, "{p:?}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let params = FluidParams {
            mode: 1.0,
            ..FluidParams::default()
        };
        let mut a = Fluid::init(&params);
        let mut b = Fluid::init(&params);
        for _ in 0..50 {
            Fluid::step(&mut a, &params, 0.01);
            Fluid::step(&mut b, &params, 0.01);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(FlowMode::from_value(0.0), FlowMode::Laminar);
        assert_eq!(FlowMode::from_value(1.0), FlowMode::Turbulent);
        assert_eq!(FlowMode::from_value(2.0), FlowMode::Diffusion);
        assert_eq!(FlowMode::Turbulent.name(), "turbulent");
    }
}
