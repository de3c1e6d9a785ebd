//! Composite Newton-Cotes rules and their convergence with the number of strips.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::differentiation::logspace;
use crate::error::{CpError, Result};

/// Integral estimate together with the strip width used.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrature {
    pub value: f64,
    pub dx: f64,
}

fn strip_width(a: f64, b: f64, n: usize) -> Result<f64> {
    if n == 0 {
        return Err(CpError::invalid("number of sub-intervals must be positive"));
    }
    Ok((b - a) / n as f64)
}

pub fn midpoint<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> Result<Quadrature> {
    let dx = strip_width(a, b, n)?;
    let sum: f64 = (0..n).map(|i| f(a + (i as f64 + 0.5) * dx)).sum();
    Ok(Quadrature { value: sum * dx, dx })
}

pub fn trapezoid<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> Result<Quadrature> {
    let dx = strip_width(a, b, n)?;
    let interior: f64 = (1..n).map(|i| f(a + i as f64 * dx)).sum();
    Ok(Quadrature { value: dx * (0.5 * (f(a) + f(b)) + interior), dx })
}

/// Simpson's rule applied strip by strip, so any `n ≥ 1` works.
pub fn simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> Result<Quadrature> {
    let dx = strip_width(a, b, n)?;
    let sum: f64 = (0..n)
        .map(|i| {
            let left = a + i as f64 * dx;
            f(left) + 4.0 * f(left + 0.5 * dx) + f(left + dx)
        })
        .sum();
    Ok(Quadrature { value: sum * dx / 6.0, dx })
}

/// Distinct integers `⌊10^e⌋` for `samples` exponents spread over `[0, max_exp]`.
pub fn subinterval_counts(max_exp: f64, samples: usize) -> Vec<usize> {
    let mut counts: Vec<usize> = logspace(0.0, max_exp, samples).into_iter().map(|v| v as usize).collect();
    counts.dedup();
    counts
}

/// Reference value of [`Integrand::Damped`] on `[0, 10]`, from 30-digit adaptive quadrature.
const DAMPED_INTEGRAL: f64 = 94.219_309_602_851_2;

/// One of the bundled test integrands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrand {
    /// `sin 2x`
    Sine,
    /// `exp(-100 x²)`
    Gaussian,
    /// `½(1 + sign x)`
    Step,
    /// `(ln(x² + 5) cos 0.8x + 3.5x) e^{-x/10}` on `[0, 10]`
    Damped,
}

impl Integrand {
    pub const ALL: [Integrand; 4] = [Integrand::Sine, Integrand::Gaussian, Integrand::Step, Integrand::Damped];

    pub fn value(&self, x: f64) -> f64 {
        match self {
            Integrand::Sine => (2.0 * x).sin(),
            Integrand::Gaussian => (-100.0 * x * x).exp(),
            Integrand::Step => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    0.0
                } else {
                    0.5
                }
            }
            Integrand::Damped => ((x * x + 5.0).ln() * (0.8 * x).cos() + 3.5 * x) / (x / 10.0).exp(),
        }
    }

    pub fn interval(&self) -> (f64, f64) {
        match self {
            Integrand::Damped => (0.0, 10.0),
            _ => (-PI / 2.0, PI / 3.0),
        }
    }

    /// Exact integral over [`Integrand::interval`].
    ///
    /// For the Gaussian the tails beyond the interval are below 1e-40.
    pub fn exact(&self) -> f64 {
        match self {
            Integrand::Sine => -0.25,
            Integrand::Gaussian => PI.sqrt() / 10.0,
            Integrand::Step => PI / 3.0,
            Integrand::Damped => DAMPED_INTEGRAL,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Integrand::Sine => "sin(2x)",
            Integrand::Gaussian => "exp(-100x^2)",
            Integrand::Step => "heaviside(x)",
            Integrand::Damped => "damped",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureParams {
    pub max_exp: f64,
    pub samples: usize,
    pub integrands: Vec<Integrand>,
    /// Support-point counts for the side-by-side table of the three rules.
    pub support_points: Vec<usize>,
}

impl Default for QuadratureParams {
    fn default() -> Self {
        Self { max_exp: 5.0, samples: 1000, integrands: Integrand::ALL.to_vec(), support_points: vec![10, 100, 1000] }
    }
}

/// The three rules evaluated on the same support points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleComparison {
    pub points: usize,
    pub midpoint: f64,
    pub trapezoid: f64,
    pub simpson: f64,
}

/// Apply each rule with `points` equally spaced support points, i.e. `points - 1` strips.
pub fn compare_rules<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, points: &[usize]) -> Result<Vec<RuleComparison>> {
    points
        .iter()
        .map(|&p| -> Result<RuleComparison> {
            let n = p.saturating_sub(1);
            Ok(RuleComparison {
                points: p,
                midpoint: midpoint(&f, a, b, n)?.value,
                trapezoid: trapezoid(&f, a, b, n)?.value,
                simpson: simpson(&f, a, b, n)?.value,
            })
        })
        .collect()
}

/// Relative errors of the three rules against an exact value.
#[derive(Clone, Debug)]
pub struct QuadratureScan {
    pub widths: Vec<f64>,
    pub midpoint: Vec<f64>,
    pub trapezoid: Vec<f64>,
    pub simpson: Vec<f64>,
}

pub fn scan_errors<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, exact: f64, counts: &[usize]) -> Result<QuadratureScan> {
    if exact == 0.0 {
        return Err(CpError::invalid("relative error needs a non-zero exact integral"));
    }
    let rel = |q: Quadrature| ((q.value - exact) / exact).abs();
    let mut scan = QuadratureScan {
        widths: Vec::with_capacity(counts.len()),
        midpoint: Vec::with_capacity(counts.len()),
        trapezoid: Vec::with_capacity(counts.len()),
        simpson: Vec::with_capacity(counts.len()),
    };
    for &n in counts {
        let m = midpoint(&f, a, b, n)?;
        scan.widths.push(m.dx);
        scan.midpoint.push(rel(m));
        scan.trapezoid.push(rel(trapezoid(&f, a, b, n)?));
        scan.simpson.push(rel(simpson(&f, a, b, n)?));
    }
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_for_polynomials() {
        let line = |x: f64| 3.0 * x + 1.0;
        assert_relative_eq!(midpoint(line, 0.0, 2.0, 1).unwrap().value, 8.0, epsilon = 1e-12);
        assert_relative_eq!(trapezoid(line, 0.0, 2.0, 1).unwrap().value, 8.0, epsilon = 1e-12);
        let cubic = |x: f64| x.powi(3) - x;
        assert_relative_eq!(simpson(cubic, 0.0, 2.0, 1).unwrap().value, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_strips_rejected() {
        assert!(simpson(|x| x, 0.0, 1.0, 0).is_err());
    }

    #[test]
    fn test_simpson_sine() {
        let (a, b) = Integrand::Sine.interval();
        let q = simpson(|x| Integrand::Sine.value(x), a, b, 10).unwrap();
        assert_relative_eq!(q.value, -0.25, epsilon = 1e-5);
        assert_relative_eq!(q.dx, (b - a) / 10.0, epsilon = 1e-15);
    }

    #[test]
    fn test_convergence_orders() {
        let f = |x: f64| Integrand::Sine.value(x);
        let (a, b) = Integrand::Sine.interval();
        let scan = scan_errors(f, a, b, -0.25, &[10, 100]).unwrap();
        let mid = scan.midpoint[0] / scan.midpoint[1];
        let trap = scan.trapezoid[0] / scan.trapezoid[1];
        let simp = scan.simpson[0] / scan.simpson[1];
        assert!(mid > 80.0 && mid < 120.0, "midpoint ratio {}", mid);
        assert!(trap > 80.0 && trap < 120.0, "trapezoid ratio {}", trap);
        assert!(simp > 8e3 && simp < 1.2e4, "simpson ratio {}", simp);
    }

    #[test]
    fn test_gaussian_and_step() {
        for integrand in [Integrand::Gaussian, Integrand::Step] {
            let (a, b) = integrand.interval();
            let q = simpson(|x| integrand.value(x), a, b, 20000).unwrap();
            assert_relative_eq!(q.value, integrand.exact(), max_relative = 1e-4);
        }
    }

    #[test]
    fn test_damped_integrand_table() {
        let damped = Integrand::Damped;
        let (a, b) = damped.interval();
        assert_eq!((a, b), (0.0, 10.0));
        let table = compare_rules(|x| damped.value(x), a, b, &[10, 100, 1000]).unwrap();
        assert_eq!(table.iter().map(|r| r.points).collect::<Vec<_>>(), vec![10, 100, 1000]);
        assert_relative_eq!(table[2].simpson, damped.exact(), epsilon = 1e-9);
        // nine strips: simpson beats midpoint, which beats the trapezoid
        let err = |v: f64| (v - damped.exact()).abs();
        assert!(err(table[0].simpson) < 1e-3);
        assert!(err(table[0].simpson) < err(table[0].midpoint));
        assert!(err(table[0].midpoint) < err(table[0].trapezoid));
        assert!(err(table[1].trapezoid) < err(table[0].trapezoid) / 50.0);
    }

    #[test]
    fn test_single_support_point_rejected() {
        assert!(compare_rules(|x| x, 0.0, 1.0, &[10, 1]).is_err());
    }

    #[test]
    fn test_counts_are_distinct() {
        let counts = subinterval_counts(5.0, 1000);
        assert_eq!(counts[0], 1);
        assert!(*counts.last().unwrap() >= 99_990);
        assert!(counts.windows(2).all(|w| w[0] < w[1]));
    }
}
