//! Two-dimensional Ising model with single-spin Metropolis dynamics.
//!
//! Spins live on an `n × n` square lattice with periodic boundaries and unit
//! coupling. Temperatures are dimensionless, `τ = k_B T / J`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::estimators::{estimate, ChainEstimate};
use crate::error::{CpError, Result};

/// Critical temperature `2 / asinh(1)` of the infinite lattice.
pub fn critical_temperature() -> f64 {
    2.0 / 1.0f64.asinh()
}

/// Onsager's spontaneous magnetisation of the infinite lattice.
pub fn onsager_magnetization(tau: f64) -> f64 {
    if tau <= 0.0 {
        return 1.0;
    }
    if tau >= critical_temperature() {
        return 0.0;
    }
    (1.0 - (2.0 / tau).sinh().powi(-4)).max(0.0).powf(0.125)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lattice {
    size: usize,
    spins: Vec<i8>,
}

impl Lattice {
    /// Every spin set to `spin` (±1).
    pub fn uniform(size: usize, spin: i8) -> Result<Self> {
        if size == 0 || spin.abs() != 1 {
            return Err(CpError::invalid("lattice needs a positive size and spins ±1"));
        }
        Ok(Self { size, spins: vec![spin; size * size] })
    }

    /// Independent spins, up with probability `(m + 1)/2`.
    pub fn random<R: Rng + ?Sized>(size: usize, m: f64, rng: &mut R) -> Result<Self> {
        if size == 0 {
            return Err(CpError::invalid("lattice size must be positive"));
        }
        if !(-1.0..=1.0).contains(&m) {
            return Err(CpError::invalid(format!("magnetisation {} outside [-1, 1]", m)));
        }
        let p_up = (m + 1.0) / 2.0;
        let spins = (0..size * size).map(|_| if rng.gen::<f64>() < p_up { 1 } else { -1 }).collect();
        Ok(Self { size, spins })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    pub fn get(&self, i: usize, j: usize) -> i8 {
        self.spins[i * self.size + j]
    }

    fn flip(&mut self, i: usize, j: usize) {
        let k = i * self.size + j;
        self.spins[k] = -self.spins[k];
    }

    /// Sum of the four nearest neighbours, periodic.
    pub fn neighbor_sum(&self, i: usize, j: usize) -> i32 {
        let n = self.size;
        let up = self.get((i + n - 1) % n, j);
        let down = self.get((i + 1) % n, j);
        let left = self.get(i, (j + n - 1) % n);
        let right = self.get(i, (j + 1) % n);
        (up + down + left + right) as i32
    }

    pub fn magnetization(&self) -> f64 {
        self.spins.iter().map(|&s| s as i64).sum::<i64>() as f64 / self.spins.len() as f64
    }

    /// `-Σ s_i s_j` over nearest-neighbour bonds, each bond counted once.
    pub fn energy(&self) -> f64 {
        let n = self.size;
        let mut e = 0i64;
        for i in 0..n {
            for j in 0..n {
                let s = self.get(i, j) as i64;
                e -= s * (self.get((i + 1) % n, j) as i64 + self.get(i, (j + 1) % n) as i64);
            }
        }
        e as f64
    }
}

/// Propose flipping one random spin; returns whether it was flipped.
pub fn metropolis_step<R: Rng + ?Sized>(lattice: &mut Lattice, tau: f64, rng: &mut R) -> bool {
    let n = lattice.size;
    let i = rng.gen_range(0..n);
    let j = rng.gen_range(0..n);
    let delta = 2 * lattice.get(i, j) as i32 * lattice.neighbor_sum(i, j);
    if delta <= 0 || rng.gen::<f64>() < (-(delta as f64) / tau).exp() {
        lattice.flip(i, j);
        true
    } else {
        false
    }
}

/// `n²` Metropolis steps; returns the number of accepted flips.
pub fn sweep<R: Rng + ?Sized>(lattice: &mut Lattice, tau: f64, rng: &mut R) -> usize {
    let steps = lattice.size * lattice.size;
    (0..steps).filter(|_| metropolis_step(lattice, tau, rng)).count()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IsingParams {
    pub size: usize,
    pub tau: f64,
    pub initial_m: f64,
    pub thermalization: usize,
    pub sweeps: usize,
    /// Temperatures for the magnetisation curve.
    pub scan_taus: Vec<f64>,
}

impl Default for IsingParams {
    fn default() -> Self {
        Self {
            size: 50,
            tau: 1.5,
            initial_m: 0.8,
            thermalization: 100,
            sweeps: 400,
            scan_taus: (1..=16).map(|i| 0.25 * i as f64).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct IsingResults {
    pub magnetizations: Vec<f64>,
    pub magnetization: ChainEstimate,
    pub acceptance_rate: f64,
    pub final_lattice: Lattice,
}

fn check_run(params: &IsingParams) -> Result<()> {
    if params.tau <= 0.0 {
        return Err(CpError::invalid("temperature must be positive"));
    }
    if params.sweeps == 0 {
        return Err(CpError::invalid("need at least one measured sweep"));
    }
    Ok(())
}

pub struct IsingSimulation<'a, R: Rng + ?Sized> {
    pub lattice: Lattice,
    params: IsingParams,
    rng: &'a mut R,
    accepted: usize,
    proposed: usize,
}

impl<'a, R: Rng + ?Sized> IsingSimulation<'a, R> {
    pub fn new(params: IsingParams, rng: &'a mut R) -> Result<Self> {
        check_run(&params)?;
        let lattice = Lattice::random(params.size, params.initial_m, &mut *rng)?;
        Ok(Self { lattice, params, rng, accepted: 0, proposed: 0 })
    }

    pub fn with_lattice(lattice: Lattice, params: IsingParams, rng: &'a mut R) -> Result<Self> {
        check_run(&params)?;
        Ok(Self { lattice, params, rng, accepted: 0, proposed: 0 })
    }

    pub fn sweep(&mut self) {
        self.accepted += sweep(&mut self.lattice, self.params.tau, &mut *self.rng);
        self.proposed += self.lattice.size * self.lattice.size;
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }

    /// Thermalise, then record the magnetisation after every sweep.
    pub fn run(mut self) -> Result<IsingResults> {
        info!(size = self.params.size, tau = self.params.tau, sweeps = self.params.sweeps, "running Ising model");
        for _ in 0..self.params.thermalization {
            self.sweep();
        }
        self.accepted = 0;
        self.proposed = 0;

        let mut magnetizations = Vec::with_capacity(self.params.sweeps);
        for step in 0..self.params.sweeps {
            self.sweep();
            let m = self.lattice.magnetization();
            magnetizations.push(m);
            if step % (self.params.sweeps / 10).max(1) == 0 {
                debug!(step, m, acceptance = self.acceptance_rate(), "sweep");
            }
        }

        Ok(IsingResults {
            magnetization: estimate(&magnetizations)?,
            acceptance_rate: self.acceptance_rate(),
            magnetizations,
            final_lattice: self.lattice,
        })
    }
}

/// Mean `|m|` after thermalisation for each temperature, each run from a fresh lattice.
pub fn temperature_scan<R: Rng + ?Sized>(params: &IsingParams, rng: &mut R) -> Result<Vec<(f64, f64)>> {
    params
        .scan_taus
        .iter()
        .map(|&tau| {
            let run_params = IsingParams { tau, ..params.clone() };
            let results = IsingSimulation::new(run_params, &mut *rng)?.run()?;
            let mean_abs = results.magnetizations.iter().map(|m| m.abs()).sum::<f64>()
                / results.magnetizations.len().max(1) as f64;
            Ok((tau, mean_abs))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_critical_temperature() {
        assert_relative_eq!(critical_temperature(), 2.269185314213022, epsilon = 1e-12);
    }

    #[test]
    fn test_onsager_limits() {
        assert_relative_eq!(onsager_magnetization(0.5), 1.0, epsilon = 1e-6);
        assert!(onsager_magnetization(1.5) > 0.98);
        assert!(onsager_magnetization(critical_temperature() * 0.99999) < 0.4);
        assert_eq!(onsager_magnetization(3.0), 0.0);
    }

    #[test]
    fn test_uniform_lattice_observables() {
        let lattice = Lattice::uniform(8, 1).unwrap();
        assert_relative_eq!(lattice.magnetization(), 1.0);
        assert_relative_eq!(lattice.energy(), -128.0);
        assert_eq!(lattice.neighbor_sum(0, 0), 4);
        assert!(Lattice::uniform(8, 2).is_err());
    }

    #[test]
    fn test_random_lattice_magnetization() {
        let mut rng = StdRng::seed_from_u64(42);
        let lattice = Lattice::random(100, 0.8, &mut rng).unwrap();
        assert_relative_eq!(lattice.magnetization(), 0.8, epsilon = 0.03);
        assert!(Lattice::random(10, 1.5, &mut rng).is_err());
    }

    #[test]
    fn test_infinite_temperature_accepts_everything() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut lattice = Lattice::uniform(10, 1).unwrap();
        assert_eq!(sweep(&mut lattice, f64::INFINITY, &mut rng), 100);
    }

    #[test]
    fn test_cold_lattice_stays_ordered() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = IsingParams { size: 20, tau: 1.0, thermalization: 10, sweeps: 50, ..Default::default() };
        let lattice = Lattice::uniform(20, 1).unwrap();
        let results = IsingSimulation::with_lattice(lattice, params, &mut rng).unwrap().run().unwrap();
        assert!(results.magnetization.mean > 0.95);
        assert!(results.acceptance_rate < 0.05);
    }

    #[test]
    fn test_hot_lattice_disorders() {
        let mut rng = StdRng::seed_from_u64(5);
        let params = IsingParams { size: 30, tau: 5.0, thermalization: 50, sweeps: 100, ..Default::default() };
        let results = IsingSimulation::new(params, &mut rng).unwrap().run().unwrap();
        assert!(results.magnetization.mean.abs() < 0.1);
        assert!(results.acceptance_rate > 0.3);
    }

    #[test]
    fn test_zero_sweeps_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let params = IsingParams { size: 4, sweeps: 0, thermalization: 0, ..Default::default() };
        assert!(matches!(IsingSimulation::new(params.clone(), &mut rng), Err(CpError::InvalidParameter(_))));
        let lattice = Lattice::uniform(4, 1).unwrap();
        assert!(IsingSimulation::with_lattice(lattice, params.clone(), &mut rng).is_err());
        let scan = IsingParams { scan_taus: vec![1.0], ..params };
        assert!(temperature_scan(&scan, &mut rng).is_err());
    }

    #[test]
    fn test_scan_shape() {
        let mut rng = StdRng::seed_from_u64(9);
        let params = IsingParams {
            size: 16,
            thermalization: 100,
            sweeps: 100,
            scan_taus: vec![1.0, 4.0],
            ..Default::default()
        };
        let curve = temperature_scan(&params, &mut rng).unwrap();
        assert_eq!(curve.len(), 2);
        assert!(curve[0].1 > curve[1].1);
    }
}
