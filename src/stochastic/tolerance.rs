//! Fit test of mass-produced shafts and bores with Gaussian tolerances.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CpError, Result};

/// Approximately standard normal: the sum of twelve uniforms minus six.
pub fn approx_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (0..12).map(|_| rng.gen::<f64>()).sum::<f64>() - 6.0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceParams {
    pub pairs: usize,
    pub bore: f64,
    pub shaft: f64,
    pub spread: f64,
}

impl Default for ToleranceParams {
    fn default() -> Self {
        Self { pairs: 1000, bore: 1.0, shaft: 0.99, spread: 0.01 }
    }
}

/// Percentage of randomly paired parts where the shaft does not fit the bore.
pub fn fit_failure_rate<R: Rng + ?Sized>(params: &ToleranceParams, rng: &mut R) -> Result<f64> {
    if params.pairs == 0 {
        return Err(CpError::invalid("need at least one pair"));
    }
    let mut bores: Vec<f64> = (0..params.pairs).map(|_| params.bore + params.spread * approx_normal(rng)).collect();
    let mut shafts: Vec<f64> = (0..params.pairs).map(|_| params.shaft + params.spread * approx_normal(rng)).collect();
    bores.shuffle(rng);
    shafts.shuffle(rng);
    let failures = bores.iter().zip(&shafts).filter(|(bore, shaft)| bore < shaft).count();
    debug!(failures, pairs = params.pairs, "fit test");
    Ok(100.0 * failures as f64 / params.pairs as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_approx_normal_moments() {
        let mut rng = StdRng::seed_from_u64(4);
        let xs: Vec<f64> = (0..20000).map(|_| approx_normal(&mut rng)).collect();
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
        assert_relative_eq!(mean, 0.0, epsilon = 0.03);
        assert_relative_eq!(var, 1.0, epsilon = 0.05);
        assert!(xs.iter().all(|x| x.abs() <= 6.0));
    }

    #[test]
    fn test_failure_rate_near_gaussian_prediction() {
        // difference of two N(·, 0.01²) with mean gap 0.01 fails with P(Z > 1/√2) ≈ 24 %
        let mut rng = StdRng::seed_from_u64(6);
        let params = ToleranceParams { pairs: 20000, ..Default::default() };
        let rate = fit_failure_rate(&params, &mut rng).unwrap();
        assert_relative_eq!(rate, 24.0, epsilon = 1.5);
    }

    #[test]
    fn test_huge_clearance_never_fails() {
        let mut rng = StdRng::seed_from_u64(6);
        let params = ToleranceParams { shaft: 0.5, ..Default::default() };
        assert_eq!(fit_failure_rate(&params, &mut rng).unwrap(), 0.0);
    }
}
