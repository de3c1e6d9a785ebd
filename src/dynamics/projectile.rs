//! Shot put: the range-maximising launch and energies from measured tracks.

use serde::{Deserialize, Serialize};

use crate::calculus::gradient;
use crate::error::{CpError, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileParams {
    pub speed: f64,
    pub height: f64,
    pub gravity: f64,
    pub mass: f64,
    pub samples: usize,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self { speed: 14.0, height: 2.45, gravity: 9.81, mass: 7.257, samples: 1000 }
    }
}

impl ProjectileParams {
    /// Launch angle that maximises the range from height `z0`.
    pub fn optimal_angle(&self) -> f64 {
        let v0 = self.speed;
        (v0 / (v0 * v0 + 2.0 * self.gravity * self.height).sqrt()).atan()
    }

    /// Height of the trajectory above the ground at horizontal distance `x`.
    pub fn height_at(&self, angle: f64, x: f64) -> f64 {
        let tan = angle.tan();
        -0.5 * self.gravity * x * x / (self.speed * self.speed) * (1.0 + tan * tan) + x * tan + self.height
    }

    /// Horizontal distance where the trajectory reaches the ground.
    pub fn range(&self, angle: f64) -> f64 {
        let (s, c) = angle.sin_cos();
        let v0 = self.speed;
        let g = self.gravity;
        v0 * c / g * (v0 * s + ((v0 * s).powi(2) + 2.0 * g * self.height).sqrt())
    }

    /// Highest point `(x, z)`.
    pub fn apex(&self, angle: f64) -> (f64, f64) {
        let (s, c) = angle.sin_cos();
        let v0 = self.speed;
        (v0 * v0 * s * c / self.gravity, self.height + (v0 * s).powi(2) / (2.0 * self.gravity))
    }

    pub fn trajectory(&self, angle: f64) -> Vec<(f64, f64)> {
        let end = self.range(angle);
        let n = self.samples.max(2);
        (0..n)
            .map(|i| {
                let x = end * i as f64 / (n - 1) as f64;
                (x, self.height_at(angle, x))
            })
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct Energies {
    pub kinetic: Vec<f64>,
    pub potential: Vec<f64>,
    pub total: Vec<f64>,
}

/// Energies along a measured track `(t, x, z)`, velocities from finite differences.
pub fn energies_from_samples(t: &[f64], x: &[f64], z: &[f64], mass: f64, gravity: f64) -> Result<Energies> {
    if z.len() != t.len() {
        return Err(CpError::Shape(format!("{} heights for {} times", z.len(), t.len())));
    }
    let vx = gradient(x, t)?;
    let vz = gradient(z, t)?;
    let kinetic: Vec<f64> = vx.iter().zip(&vz).map(|(a, b)| 0.5 * mass * (a * a + b * b)).collect();
    let potential: Vec<f64> = z.iter().map(|h| mass * gravity * h).collect();
    let total = kinetic.iter().zip(&potential).map(|(k, u)| k + u).collect();
    Ok(Energies { kinetic, potential, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_optimal_angle_maximises_range() {
        let p = ProjectileParams::default();
        let best = p.optimal_angle();
        let r = p.range(best);
        assert!(r > p.range(best - 0.02));
        assert!(r > p.range(best + 0.02));
        assert_relative_eq!(p.height_at(best, r), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ground_launch_is_45_degrees() {
        let p = ProjectileParams { height: 0.0, ..Default::default() };
        assert_relative_eq!(p.optimal_angle(), std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(p.range(p.optimal_angle()), 14.0 * 14.0 / 9.81, epsilon = 1e-9);
    }

    #[test]
    fn test_apex_is_highest_point() {
        let p = ProjectileParams::default();
        let angle = p.optimal_angle();
        let (xa, za) = p.apex(angle);
        assert_relative_eq!(p.height_at(angle, xa), za, epsilon = 1e-9);
        assert!(p.trajectory(angle).iter().all(|&(_, z)| z <= za + 1e-9));
    }

    #[test]
    fn test_free_fall_energy_conserved() {
        let (m, g) = (2.0, 9.81);
        let t: Vec<f64> = (0..101).map(|i| i as f64 * 0.01).collect();
        let x: Vec<f64> = t.iter().map(|t| 3.0 * t).collect();
        let z: Vec<f64> = t.iter().map(|t| 10.0 + 4.0 * t - 0.5 * g * t * t).collect();
        let e = energies_from_samples(&t, &x, &z, m, g).unwrap();
        let expected = 0.5 * m * (9.0 + 16.0) + m * g * 10.0;
        // interior points use exact central quotients for a parabola
        for total in &e.total[1..100] {
            assert_relative_eq!(*total, expected, epsilon = 1e-8);
        }
    }
}
