//! The six simulation kinds.

mod fluid;
mod orbit;
mod pendulum;
mod projectile;
mod spring;
mod wave;

pub use fluid::{
    deflect, FlowMode, Fluid, FluidParams, FluidState, Obstacle, Particle, DOMAIN, MARGIN,
};
pub use orbit::{Body, Orbit, OrbitParams, OrbitState, G};
pub use pendulum::{Energy, Pendulum, PendulumParams, PendulumState};
pub use projectile::{Landing, Projectile, ProjectileParams, ProjectileState};
pub use spring::{Spring, SpringParams, SpringState};
pub use wave::{Wave, WaveParams, WaveState};
