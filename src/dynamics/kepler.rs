//! Keplerian orbits from the eccentric anomaly.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use crate::error::{CpError, Result};

const YEAR_DAYS: f64 = 365.0;

/// Solve `E - ε sin E = M` by Newton iteration starting at `E = 3`.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64, tol: f64, max_iter: usize) -> Result<f64> {
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(CpError::invalid(format!("eccentricity {} outside [0, 1)", eccentricity)));
    }
    let mut e: f64 = 3.0;
    for _ in 0..max_iter {
        let f = e - eccentricity * e.sin() - mean_anomaly;
        let df = 1.0 - eccentricity * e.cos();
        let step = f / df;
        e -= step;
        if step.abs() < tol {
            return Ok(e);
        }
    }
    Err(CpError::NoConvergence { iterations: max_iter })
}

/// True anomaly `θ ∈ [0, 2π)` belonging to the eccentric anomaly `E`.
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let cos_e = eccentric_anomaly.cos();
    let cos_theta = ((cos_e - eccentricity) / (1.0 - eccentricity * cos_e)).clamp(-1.0, 1.0);
    let theta = cos_theta.acos();
    if eccentric_anomaly.rem_euclid(2.0 * PI) <= PI {
        theta
    } else {
        2.0 * PI - theta
    }
}

pub fn orbit_radius(semi_major_axis: f64, eccentricity: f64, theta: f64) -> f64 {
    semi_major_axis * (1.0 - eccentricity * eccentricity) / (1.0 + eccentricity * theta.cos())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    pub period_days: f64,
    pub eccentricity: f64,
    /// In astronomical units.
    pub semi_major_axis: f64,
}

impl Body {
    pub fn new(name: &str, period_years: f64, eccentricity: f64, semi_major_axis: f64) -> Self {
        Self { name: name.to_string(), period_days: period_years * YEAR_DAYS, eccentricity, semi_major_axis }
    }
}

/// Planets, Pluto and Halley's comet.
pub fn solar_system() -> Vec<Body> {
    vec![
        Body::new("Earth", 1.0, 0.0167, 1.0),
        Body::new("Pluto", 248.0, 0.25, 39.44),
        Body::new("Halley", 76.0, 0.97, 17.94),
        Body::new("Mercury", 0.24, 0.2056, 0.39),
        Body::new("Venus", 0.62, 0.0068, 0.72),
        Body::new("Mars", 1.88, 0.0934, 1.52),
        Body::new("Jupiter", 11.86, 0.0483, 5.20),
        Body::new("Saturn", 29.46, 0.056, 9.54),
        Body::new("Uranus", 84.01, 0.0461, 19.18),
        Body::new("Neptune", 164.8, 0.0097, 30.06),
    ]
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct KeplerParams {
    pub samples: usize,
    pub log_radius: bool,
    pub bodies: Vec<Body>,
}

impl Default for KeplerParams {
    fn default() -> Self {
        Self { samples: 1000, log_radius: false, bodies: solar_system() }
    }
}

/// Polar samples `(θ, r)` over one period, evenly spaced in time.
///
/// With `log_radius` the radius is replaced by `ln(r + 1)`.
pub fn sample_orbit(body: &Body, samples: usize, log_radius: bool) -> Result<Vec<(f64, f64)>> {
    let step = if samples > 1 { body.period_days / (samples - 1) as f64 } else { 0.0 };
    (0..samples)
        .map(|i| {
            let t = i as f64 * step;
            let mean_anomaly = 2.0 * PI * t / body.period_days;
            let e = solve_kepler(mean_anomaly, body.eccentricity, 1e-12, 100)?;
            let theta = true_anomaly(e, body.eccentricity);
            let r = orbit_radius(body.semi_major_axis, body.eccentricity, theta);
            Ok((theta, if log_radius { (r + 1.0).ln() } else { r }))
        })
        .collect::<Result<Vec<_>>>()
        .map(|points| {
            debug!(body = %body.name, points = points.len(), "sampled orbit");
            points
        })
}

pub fn polar_to_cartesian(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    points.iter().map(|&(theta, r)| (r * theta.cos(), r * theta.sin())).collect()
}
