//! Periodically driven particle in a quartic double well.
//!
//! `H = p²/2 + x⁴ - x² + x (A + B sin ωt)`

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info};

use super::integrator::integrate;
use super::traits::{HamiltonianSystem, OdeSystem};
use crate::error::{CpError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrivenDoubleWell {
    pub a: f64,
    pub b: f64,
    pub omega: f64,
}

impl Default for DrivenDoubleWell {
    fn default() -> Self {
        Self { a: 0.1, b: 0.1, omega: 1.0 }
    }
}

impl DrivenDoubleWell {
    pub fn period(&self) -> f64 {
        2.0 * PI / self.omega
    }

    fn drive(&self, t: f64) -> f64 {
        self.a + self.b * (self.omega * t).sin()
    }

    /// The undriven well with the same static tilt.
    pub fn static_part(&self) -> Self {
        Self { b: 0.0, ..*self }
    }
}

impl OdeSystem<2> for DrivenDoubleWell {
    fn rhs(&self, t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
        let (x, p) = (y[0], y[1]);
        dydt[0] = p;
        dydt[1] = -4.0 * x.powi(3) + 2.0 * x - self.drive(t);
    }
}

/// Static potential `x⁴ - x² + A x`; the drive enters through [`OdeSystem::rhs`].
impl HamiltonianSystem for DrivenDoubleWell {
    fn potential(&self, x: f64) -> f64 {
        x.powi(4) - x * x + self.a * x
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleWellParams {
    pub system: DrivenDoubleWell,
    pub periods: usize,
    pub steps_per_period: usize,
    pub substeps: usize,
    pub contour_levels: Vec<f64>,
    pub starts: Vec<(f64, f64)>,
}

impl Default for DoubleWellParams {
    fn default() -> Self {
        Self {
            system: DrivenDoubleWell::default(),
            periods: 200,
            steps_per_period: 40,
            substeps: 10,
            contour_levels: vec![-0.3, -0.1, -0.05, 0.0, 0.2, 0.55, 0.75, 1.5],
            starts: vec![(-0.7, 0.0), (0.5, 0.3)],
        }
    }
}

#[derive(Clone, Debug)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub states: Vec<[f64; 2]>,
}

impl Trajectory {
    /// Every `every`-th state starting with the first, i.e. one point per
    /// driving period when `every` is the number of steps per period.
    pub fn stroboscopic(&self, every: usize) -> Vec<(f64, f64)> {
        self.states.iter().step_by(every.max(1)).map(|s| (s[0], s[1])).collect()
    }

    pub fn phase_points(&self) -> Vec<(f64, f64)> {
        self.states.iter().map(|s| (s[0], s[1])).collect()
    }
}

pub fn simulate(params: &DoubleWellParams, start: (f64, f64)) -> Result<Trajectory> {
    if params.steps_per_period == 0 || params.periods == 0 {
        return Err(CpError::invalid("periods and steps per period must be positive"));
    }
    let system = &params.system;
    let n = params.periods * params.steps_per_period;
    let dt = system.period() / params.steps_per_period as f64;
    let times: Vec<f64> = (0..=n).map(|i| i as f64 * dt).collect();
    info!(x0 = start.0, p0 = start.1, steps = n, "integrating driven double well");
    let states = integrate(system, [start.0, start.1], &times, params.substeps)?;
    Ok(Trajectory { times, states })
}

/// Level set `H(x, p) = level` of the static Hamiltonian.
///
/// Each returned curve is one closed loop: the upper branch left to right
/// followed by the lower branch right to left.
pub fn energy_contour<H: HamiltonianSystem>(
    system: &H,
    level: f64,
    x_range: (f64, f64),
    samples: usize,
) -> Vec<Vec<(f64, f64)>> {
    let step = (x_range.1 - x_range.0) / (samples.max(2) - 1) as f64;
    let mut curves = Vec::new();
    let mut upper: Vec<(f64, f64)> = Vec::new();

    let mut close = |upper: &mut Vec<(f64, f64)>| {
        if upper.len() > 1 {
            let lower: Vec<(f64, f64)> = upper.iter().rev().map(|&(x, p)| (x, -p)).collect();
            let mut curve = std::mem::take(upper);
            curve.extend(lower);
            curves.push(curve);
        } else {
            upper.clear();
        }
    };

    for i in 0..samples.max(2) {
        let x = x_range.0 + i as f64 * step;
        match system.momentum_at(x, level) {
            Some(p) => upper.push((x, p)),
            None => close(&mut upper),
        }
    }
    close(&mut upper);
    debug!(level, curves = curves.len(), "energy contour");
    curves
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_static_energy_conserved() {
        let params = DoubleWellParams {
            system: DrivenDoubleWell { a: 0.1, b: 0.0, omega: 1.0 },
            periods: 10,
            substeps: 20,
            ..Default::default()
        };
        let traj = simulate(&params, (-0.7, 0.2)).unwrap();
        let e0 = params.system.energy(-0.7, 0.2);
        for s in &traj.states {
            assert_relative_eq!(params.system.energy(s[0], s[1]), e0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_trajectory_length_and_sections() {
        let params = DoubleWellParams { periods: 5, ..Default::default() };
        let traj = simulate(&params, (0.5, 0.0)).unwrap();
        assert_eq!(traj.states.len(), 5 * 40 + 1);
        assert_relative_eq!(traj.times[40], params.system.period(), epsilon = 1e-12);
        let section = traj.stroboscopic(params.steps_per_period);
        assert_eq!(section.len(), 6);
        assert_eq!(section[1], (traj.states[40][0], traj.states[40][1]));
    }

    #[test]
    fn test_resting_at_minimum_without_drive() {
        // x⁴ - x² has minima at ±1/√2
        let params = DoubleWellParams {
            system: DrivenDoubleWell { a: 0.0, b: 0.0, omega: 1.0 },
            periods: 3,
            ..Default::default()
        };
        let x_min = 0.5f64.sqrt();
        let traj = simulate(&params, (x_min, 0.0)).unwrap();
        let last = traj.states.last().unwrap();
        assert_relative_eq!(last[0], x_min, epsilon = 1e-10);
        assert_relative_eq!(last[1], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_contour_below_barrier_has_two_loops() {
        let well = DrivenDoubleWell { a: 0.0, b: 0.0, omega: 1.0 };
        let curves = energy_contour(&well, -0.1, (-1.5, 1.5), 601);
        assert_eq!(curves.len(), 2);
        for curve in &curves {
            for &(x, p) in curve {
                assert_relative_eq!(well.energy(x, p), -0.1, epsilon = 1e-12);
            }
        }
        let above = energy_contour(&well, 0.2, (-1.5, 1.5), 601);
        assert_eq!(above.len(), 1);
    }

    #[test]
    fn test_forbidden_level_is_empty() {
        let well = DrivenDoubleWell::default();
        assert!(energy_contour(&well, -5.0, (-1.5, 1.5), 100).is_empty());
    }
}
