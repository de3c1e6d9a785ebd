//! Sun-centred two-body motion in astronomical units and years.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::info;

use crate::error::{CpError, Result};

/// `GM` of the sun in AU³/yr².
pub const GM_SUN: f64 = 4.0 * PI * PI;

pub fn acceleration(position: &Vector2<f64>) -> Vector2<f64> {
    -GM_SUN * position / position.norm().powi(3)
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitBody {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
}

impl OrbitBody {
    /// Start at aphelion `(1 + ε) a` with the vis-viva speed.
    pub fn from_aphelion(semi_major_axis: f64, eccentricity: f64) -> Self {
        let r = (1.0 + eccentricity) * semi_major_axis;
        let speed = (GM_SUN * (2.0 / r - 1.0 / semi_major_axis)).sqrt();
        Self { position: Vector2::new(r, 0.0), velocity: Vector2::new(0.0, speed) }
    }

    /// Energy per unit mass.
    pub fn specific_energy(&self) -> f64 {
        0.5 * self.velocity.norm_squared() - GM_SUN / self.position.norm()
    }

    /// Semi-implicit Euler: the velocity is updated first.
    pub fn step(&mut self, dt: f64) {
        self.velocity += acceleration(&self.position) * dt;
        self.position += self.velocity * dt;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrbitSpec {
    pub name: String,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitParams {
    pub dt: f64,
    pub years: f64,
    pub bodies: Vec<OrbitSpec>,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            dt: 0.001,
            years: 76.0,
            bodies: vec![
                OrbitSpec { name: "Earth".into(), semi_major_axis: 1.0, eccentricity: 0.017 },
                OrbitSpec { name: "Halley".into(), semi_major_axis: 17.94, eccentricity: 0.97 },
            ],
        }
    }
}

/// Positions after each of `steps` time steps.
pub fn simulate(mut body: OrbitBody, dt: f64, steps: usize) -> Result<Vec<(f64, f64)>> {
    if dt <= 0.0 {
        return Err(CpError::invalid("time step must be positive"));
    }
    if body.position.norm() == 0.0 {
        return Err(CpError::invalid("body starts inside the sun"));
    }
    info!(steps, dt, "integrating orbit");
    let mut points = Vec::with_capacity(steps);
    for _ in 0..steps {
        body.step(dt);
        points.push((body.position.x, body.position.y));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vis_viva_energy() {
        let body = OrbitBody::from_aphelion(17.94, 0.97);
        assert_relative_eq!(body.specific_energy(), -GM_SUN / (2.0 * 17.94), epsilon = 1e-10);
    }

    #[test]
    fn test_earth_orbit_closes_after_a_year() {
        let points = simulate(OrbitBody::from_aphelion(1.0, 0.017), 0.001, 1000).unwrap();
        let (x, y) = *points.last().unwrap();
        assert_relative_eq!(x, 1.017, epsilon = 1e-2);
        assert_relative_eq!(y, 0.0, epsilon = 1e-2);
        let perihelion = points.iter().map(|(x, y)| x.hypot(*y)).fold(f64::INFINITY, f64::min);
        assert_relative_eq!(perihelion, 0.983, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_start() {
        let body = OrbitBody { position: Vector2::zeros(), velocity: Vector2::zeros() };
        assert!(simulate(body, 0.001, 10).is_err());
    }
}
