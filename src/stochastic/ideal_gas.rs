//! Wall pressure of a one-dimensional ideal gas in the unit box.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CpError, Result};
use crate::stats::{summarize, Summary};

/// Wall hits within `dt`, counted on the unfolded free trajectory.
pub fn reflections(x0: f64, v: f64, dt: f64) -> u64 {
    (((x0 + v * dt).abs() + 1.0) / 2.0).floor() as u64
}

/// Time-averaged momentum transfer `2/(N dt) Σ |v_i| n_i` per unit time.
pub fn pressure(x0s: &[f64], vs: &[f64], dt: f64) -> Result<f64> {
    if x0s.len() != vs.len() {
        return Err(CpError::Shape(format!("{} positions for {} velocities", x0s.len(), vs.len())));
    }
    if x0s.is_empty() || dt <= 0.0 {
        return Err(CpError::invalid("need particles and a positive time interval"));
    }
    let transfer: f64 = x0s.iter().zip(vs).map(|(&x0, &v)| v.abs() * reflections(x0, v, dt) as f64).sum();
    Ok(2.0 * transfer / (x0s.len() as f64 * dt))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IdealGasParams {
    pub particles: usize,
    pub realizations: usize,
    pub dt: f64,
    pub bins: usize,
}

impl Default for IdealGasParams {
    fn default() -> Self {
        Self { particles: 6, realizations: 10_000, dt: 5.0, bins: 20 }
    }
}

#[derive(Clone, Debug)]
pub struct PressureStats {
    pub summary: Summary,
    pub samples: Vec<f64>,
}

/// Pressure of many independent gases with `x0 ~ U(0, 1)` and `v ~ N(0, 1)`.
pub fn sample_pressures<R: Rng + ?Sized>(params: &IdealGasParams, rng: &mut R) -> Result<PressureStats> {
    info!(particles = params.particles, realizations = params.realizations, "sampling ideal gas pressure");
    let mut samples = Vec::with_capacity(params.realizations);
    let mut x0s = vec![0.0; params.particles];
    let mut vs = vec![0.0; params.particles];
    for _ in 0..params.realizations {
        for (x0, v) in x0s.iter_mut().zip(vs.iter_mut()) {
            *x0 = rng.gen::<f64>();
            *v = rng.sample(StandardNormal);
        }
        samples.push(pressure(&x0s, &vs, params.dt)?);
    }
    let summary = summarize(&samples)?;
    Ok(PressureStats { summary, samples })
}
