//! Brownian particles with drift in front of an absorbing wall.
//!
//! Each walker follows the Langevin update `x += v dt + √(2D dt) ξ`. Once it
//! reaches `x_abs` it is absorbed and parked at `x_abs + 1`.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};
use tracing::{debug, info};

use super::traits::Walker;
use crate::error::{CpError, Result};
use crate::stats::Histogram;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusionWalker {
    x: f64,
    drift_step: f64,
    noise: f64,
    x_abs: Option<f64>,
    absorbed: bool,
}

impl DiffusionWalker {
    pub fn new(x0: f64, drift: f64, diffusion: f64, dt: f64, x_abs: Option<f64>) -> Self {
        Self { x: x0, drift_step: drift * dt, noise: (2.0 * diffusion * dt).sqrt(), x_abs, absorbed: false }
    }
}

impl Walker for DiffusionWalker {
    fn move_walker<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.absorbed {
            return;
        }
        let xi: f64 = rng.sample(StandardNormal);
        self.x += self.drift_step + self.noise * xi;
        if let Some(x_abs) = self.x_abs {
            if self.x >= x_abs {
                self.mark_for_deletion();
            }
        }
    }

    fn position(&self) -> f64 {
        self.x
    }

    fn should_be_deleted(&self) -> bool {
        self.absorbed
    }

    fn mark_for_deletion(&mut self) {
        self.absorbed = true;
        if let Some(x_abs) = self.x_abs {
            self.x = x_abs + 1.0;
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffusionParams {
    pub t_max: f64,
    pub dt: f64,
    /// Record the ensemble every this many steps.
    pub record_every: usize,
    pub x0: f64,
    pub drift: f64,
    pub diffusion: f64,
    pub absorbing: bool,
    pub x_abs: f64,
    pub walkers: usize,
    pub bins: usize,
}

impl Default for DiffusionParams {
    fn default() -> Self {
        Self {
            t_max: 40.0,
            dt: 0.01,
            record_every: 100,
            x0: 0.0,
            drift: 0.15,
            diffusion: 1.5,
            absorbing: true,
            x_abs: 15.0,
            walkers: 10_000,
            bins: 20,
        }
    }
}

impl DiffusionParams {
    fn wall(&self) -> Option<f64> {
        self.absorbing.then_some(self.x_abs)
    }
}

/// Walker positions at the recorded times.
#[derive(Clone, Debug)]
pub struct Ensemble {
    pub times: Vec<f64>,
    pub positions: Vec<Vec<f64>>,
}

pub fn simulate<R: Rng + ?Sized>(params: &DiffusionParams, rng: &mut R) -> Result<Ensemble> {
    if params.dt <= 0.0 || params.walkers == 0 || params.record_every == 0 {
        return Err(CpError::invalid("time step, walker count and record interval must be positive"));
    }
    if params.diffusion < 0.0 {
        return Err(CpError::invalid("diffusion constant must not be negative"));
    }
    let steps = (params.t_max / params.dt).round() as usize;
    info!(walkers = params.walkers, steps, "simulating drift diffusion");

    let mut walkers: Vec<DiffusionWalker> = (0..params.walkers)
        .map(|_| DiffusionWalker::new(params.x0, params.drift, params.diffusion, params.dt, params.wall()))
        .collect();
    let snapshot = |walkers: &[DiffusionWalker]| walkers.iter().map(|w| w.position()).collect::<Vec<f64>>();

    let mut times = vec![0.0];
    let mut positions = vec![snapshot(&walkers)];
    for step in 1..=steps {
        for walker in walkers.iter_mut() {
            walker.move_walker(rng);
        }
        if step % params.record_every == 0 {
            times.push(step as f64 * params.dt);
            positions.push(snapshot(&walkers));
            let alive = walkers.iter().filter(|w| !w.should_be_deleted()).count();
            debug!(t = step as f64 * params.dt, alive, "snapshot");
        }
    }
    Ok(Ensemble { times, positions })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapshotStats {
    pub time: f64,
    pub mean: f64,
    pub variance: f64,
    /// Fraction of walkers not yet absorbed.
    pub surviving: f64,
}

/// Mean and sample variance of the walkers left of `x_abs` at each recorded time.
pub fn ensemble_statistics(ensemble: &Ensemble, x_abs: f64) -> Vec<SnapshotStats> {
    ensemble
        .times
        .iter()
        .zip(&ensemble.positions)
        .map(|(&time, positions)| {
            let alive: Vec<f64> = positions.iter().copied().filter(|&x| x < x_abs).collect();
            let n = alive.len();
            let mean = if n > 0 { alive.iter().sum::<f64>() / n as f64 } else { f64::NAN };
            let variance = if n > 1 {
                alive.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
            } else {
                0.0
            };
            SnapshotStats { time, mean, variance, surviving: n as f64 / positions.len().max(1) as f64 }
        })
        .collect()
}

/// Histogram of the surviving walkers, its density scaled by the surviving fraction.
pub fn snapshot_histogram(positions: &[f64], x_abs: f64, bins: usize) -> Result<(Histogram, Vec<(f64, f64)>)> {
    let alive: Vec<f64> = positions.iter().copied().filter(|&x| x < x_abs).collect();
    let fraction = alive.len() as f64 / positions.len().max(1) as f64;
    let histogram = Histogram::new(&alive, bins)?;
    let scaled = histogram.centers().into_iter().zip(histogram.density()).map(|(c, d)| (c, d * fraction)).collect();
    Ok((histogram, scaled))
}

fn normal_pdf(x: f64, mean: f64, sigma: f64) -> Result<f64> {
    let dist = Normal::new(mean, sigma).map_err(|e| CpError::invalid(e.to_string()))?;
    Ok(dist.pdf(x))
}

/// Free drift-diffusion density `N(x; x0 + vt, √(2Dt))`.
pub fn theory_density(x: f64, t: f64, x0: f64, drift: f64, diffusion: f64) -> Result<f64> {
    normal_pdf(x, x0 + drift * t, (2.0 * diffusion * t).sqrt())
}

/// Density in front of an absorbing wall, built from a mirror source at
/// `2 x_abs - x0` weighted so the density vanishes at the wall.
pub fn theory_density_absorbing(x: f64, t: f64, x0: f64, drift: f64, diffusion: f64, x_abs: f64) -> Result<f64> {
    let sigma = (2.0 * diffusion * t).sqrt();
    let direct = x0 + drift * t;
    let mirror = 2.0 * x_abs - x0 + drift * t;
    let weight = normal_pdf(x_abs, direct, sigma)? / normal_pdf(x_abs, mirror, sigma)?;
    Ok(normal_pdf(x, direct, sigma)? - weight * normal_pdf(x, mirror, sigma)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_free_moments() {
        let mut rng = StdRng::seed_from_u64(2024);
        let params = DiffusionParams { t_max: 10.0, absorbing: false, walkers: 4000, ..Default::default() };
        let ensemble = simulate(&params, &mut rng).unwrap();
        assert_eq!(ensemble.times.len(), 11);
        let stats = ensemble_statistics(&ensemble, f64::INFINITY);
        let last = stats.last().unwrap();
        assert_relative_eq!(last.time, 10.0, epsilon = 1e-9);
        assert_relative_eq!(last.mean, 1.5, epsilon = 0.35);
        assert_relative_eq!(last.variance, 30.0, max_relative = 0.1);
        assert_relative_eq!(last.surviving, 1.0);
    }

    #[test]
    fn test_absorbed_walkers_stay_parked() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut walker = DiffusionWalker::new(0.0, 0.0, 1.0, 0.01, Some(0.05));
        while !walker.should_be_deleted() {
            walker.move_walker(&mut rng);
        }
        assert_relative_eq!(walker.position(), 1.05);
        walker.move_walker(&mut rng);
        assert_relative_eq!(walker.position(), 1.05);
    }

    #[test]
    fn test_surviving_fraction_decreases() {
        let mut rng = StdRng::seed_from_u64(99);
        let params = DiffusionParams { t_max: 20.0, x_abs: 5.0, walkers: 2000, ..Default::default() };
        let ensemble = simulate(&params, &mut rng).unwrap();
        let stats = ensemble_statistics(&ensemble, params.x_abs);
        assert!(stats.windows(2).all(|w| w[1].surviving <= w[0].surviving));
        assert!(stats.last().unwrap().surviving < 0.9);
        assert_relative_eq!(stats[0].surviving, 1.0);
    }

    #[test]
    fn test_absorbing_density_vanishes_at_wall() {
        let d = theory_density_absorbing(15.0, 10.0, 0.0, 0.15, 1.5, 15.0).unwrap();
        assert_relative_eq!(d, 0.0, epsilon = 1e-15);
        let free = theory_density(1.5, 10.0, 0.0, 0.15, 1.5).unwrap();
        let near = theory_density_absorbing(1.5, 10.0, 0.0, 0.15, 1.5, 15.0).unwrap();
        assert!(near < free && near > 0.9 * free);
    }

    #[test]
    fn test_theory_needs_positive_time() {
        assert!(theory_density(0.0, 0.0, 0.0, 0.1, 1.0).is_err());
    }

    #[test]
    fn test_snapshot_histogram_scaling() {
        let positions = [0.0, 1.0, 2.0, 3.0, 16.0, 16.0, 16.0, 16.0];
        let (hist, scaled) = snapshot_histogram(&positions, 15.0, 3).unwrap();
        assert_eq!(hist.counts.iter().sum::<usize>(), 4);
        let area: f64 = scaled.iter().map(|(_, d)| d * hist.bin_width()).sum();
        assert_relative_eq!(area, 0.5, epsilon = 1e-12);
    }
}
