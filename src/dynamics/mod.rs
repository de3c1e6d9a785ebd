//! Classical dynamics: ODE integration, the driven double well and orbits.

mod traits;
mod integrator;
mod double_well;
mod kepler;
mod orbit;
mod projectile;

pub use traits::{HamiltonianSystem, OdeSystem};
pub use integrator::{integrate, rk4_step};
pub use double_well::{energy_contour, simulate as simulate_double_well, DoubleWellParams, DrivenDoubleWell, Trajectory};
pub use kepler::{
    orbit_radius, polar_to_cartesian, sample_orbit, solar_system, solve_kepler, true_anomaly, Body, KeplerParams,
};
pub use orbit::{acceleration, simulate as simulate_orbit, OrbitBody, OrbitParams, OrbitSpec, GM_SUN};
pub use projectile::{energies_from_samples, Energies, ProjectileParams};
