//! Finite-difference derivatives and their error as a function of step size.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::Differentiable;
use crate::error::{CpError, Result};

pub fn forward_difference<F: Differentiable + ?Sized>(f: &F, x: f64, h: f64) -> f64 {
    (f.value(x + h) - f.value(x)) / h
}

pub fn central_difference<F: Differentiable + ?Sized>(f: &F, x: f64, h: f64) -> f64 {
    (f.value(x + h / 2.0) - f.value(x - h / 2.0)) / h
}

/// Richardson combination of two central differences, error `O(h⁴)`.
pub fn extrapolated_difference<F: Differentiable + ?Sized>(f: &F, x: f64, h: f64) -> f64 {
    let quarter = f.value(x + h / 4.0) - f.value(x - h / 4.0);
    let half = f.value(x + h / 2.0) - f.value(x - h / 2.0);
    (8.0 * quarter - half) / (3.0 * h)
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n).map(|i| start + (stop - start) * i as f64 / (n - 1) as f64).collect(),
    }
}

/// `n` values `10^e` with exponents evenly spaced over `[start_exp, stop_exp]`.
pub fn logspace(start_exp: f64, stop_exp: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![10f64.powf(start_exp)],
        _ => {
            linspace(start_exp, stop_exp, n).into_iter().map(|e| 10f64.powf(e)).collect()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivativeParams {
    pub x: f64,
    pub min_exp: f64,
    pub max_exp: f64,
    pub samples: usize,
}

impl Default for DerivativeParams {
    fn default() -> Self {
        Self { x: 1.0 / 3.0, min_exp: -10.0, max_exp: 0.0, samples: 1001 }
    }
}

/// Relative errors of the three difference quotients over a range of steps.
#[derive(Clone, Debug)]
pub struct DifferenceScan {
    pub steps: Vec<f64>,
    pub forward: Vec<f64>,
    pub central: Vec<f64>,
    pub extrapolated: Vec<f64>,
    /// `(h, error)` with the smallest error, per method.
    pub best_forward: (f64, f64),
    pub best_central: (f64, f64),
    pub best_extrapolated: (f64, f64),
}

fn minimum(steps: &[f64], errors: &[f64]) -> (f64, f64) {
    steps
        .iter()
        .zip(errors)
        .filter(|(_, e)| e.is_finite())
        .fold((f64::NAN, f64::INFINITY), |best, (&h, &e)| if e < best.1 { (h, e) } else { best })
}

pub fn scan_errors<F: Differentiable + ?Sized>(f: &F, x: f64, exact: f64, steps: &[f64]) -> Result<DifferenceScan> {
    if exact == 0.0 {
        return Err(CpError::invalid("relative error needs a non-zero exact derivative"));
    }
    if steps.is_empty() {
        return Err(CpError::invalid("no step sizes given"));
    }
    let rel = |d: f64| ((d - exact) / exact).abs();
    let forward: Vec<f64> = steps.iter().map(|&h| rel(forward_difference(f, x, h))).collect();
    let central: Vec<f64> = steps.iter().map(|&h| rel(central_difference(f, x, h))).collect();
    let extrapolated: Vec<f64> = steps.iter().map(|&h| rel(extrapolated_difference(f, x, h))).collect();

    let best_forward = minimum(steps, &forward);
    let best_central = minimum(steps, &central);
    let best_extrapolated = minimum(steps, &extrapolated);
    debug!(?best_forward, ?best_central, ?best_extrapolated, "difference scan");

    Ok(DifferenceScan {
        steps: steps.to_vec(),
        forward,
        central,
        extrapolated,
        best_forward,
        best_central,
        best_extrapolated,
    })
}

/// Derivative of sampled data `y(t)`.
///
/// Interior points use the central quotient over the two neighbours, the end
/// points a one-sided quotient. The grid need not be uniform.
pub fn gradient(y: &[f64], t: &[f64]) -> Result<Vec<f64>> {
    if y.len() != t.len() {
        return Err(CpError::Shape(format!("{} values but {} sample times", y.len(), t.len())));
    }
    let n = y.len();
    if n < 2 {
        return Err(CpError::invalid("gradient needs at least two samples"));
    }
    let mut dy = Vec::with_capacity(n);
    dy.push((y[1] - y[0]) / (t[1] - t[0]));
    for i in 1..n - 1 {
        dy.push((y[i + 1] - y[i - 1]) / (t[i + 1] - t[i - 1]));
    }
    dy.push((y[n - 1] - y[n - 2]) / (t[n - 1] - t[n - 2]));
    Ok(dy)
}
