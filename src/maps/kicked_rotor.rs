//! The standard map of a periodically kicked rotor.
//!
//! The phase space is the torus `θ ∈ [0, 2π)`, `p ∈ [-π, π)`. Each kick first
//! advances the angle by the momentum and then kicks the momentum with the
//! sine of the *new* angle.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

const TWO_PI: f64 = 2.0 * PI;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RotorParams {
    pub kick_strength: f64,
    pub kicks: usize,
    /// Start points `(θ, p)`, one orbit each.
    pub starts: Vec<(f64, f64)>,
}

impl Default for RotorParams {
    fn default() -> Self {
        Self {
            kick_strength: 2.6,
            kicks: 1000,
            starts: vec![(1.0, 0.5), (3.0, 1.9), (0.5, -2.0)],
        }
    }
}

pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TWO_PI);
    // rem_euclid rounds tiny negative inputs up to exactly 2π
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

pub fn wrap_momentum(p: f64) -> f64 {
    wrap_angle(p + PI) - PI
}

/// Iterate the map `kicks` times from `(theta0, p0)`.
///
/// The start point itself is not part of the returned orbit.
pub fn orbit(theta0: f64, p0: f64, kick_strength: f64, kicks: usize) -> Vec<(f64, f64)> {
    let mut theta = theta0;
    let mut p = p0;
    let mut points = Vec::with_capacity(kicks);
    for _ in 0..kicks {
        theta = wrap_angle(theta + p);
        p = wrap_momentum(p + kick_strength * theta.sin());
        points.push((theta, p));
    }
    points
}

/// One orbit per start point.
pub fn phase_portrait(params: &RotorParams) -> Vec<Vec<(f64, f64)>> {
    params
        .starts
        .iter()
        .map(|&(theta0, p0)| {
            debug!(theta0, p0, "kicked rotor orbit");
            orbit(theta0, p0, params.kick_strength, params.kicks)
        })
        .collect()
}
