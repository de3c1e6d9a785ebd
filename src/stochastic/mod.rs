//! Monte Carlo experiments: Ising lattice, diffusion, ideal gas and tolerances.

mod traits;
mod estimators;
mod ising;
mod diffusion;
mod ideal_gas;
mod tolerance;

pub use traits::Walker;
pub use estimators::{autocorrelation_time, blocking_error, estimate, ChainEstimate};
pub use ising::{
    critical_temperature, metropolis_step, onsager_magnetization, sweep, temperature_scan, IsingParams,
    IsingResults, IsingSimulation, Lattice,
};
pub use diffusion::{
    ensemble_statistics, simulate as simulate_diffusion, snapshot_histogram, theory_density,
    theory_density_absorbing, DiffusionParams, DiffusionWalker, Ensemble, SnapshotStats,
};
pub use ideal_gas::{pressure, reflections, sample_pressures, IdealGasParams, PressureStats};
pub use tolerance::{approx_normal, fit_failure_rate, ToleranceParams};
