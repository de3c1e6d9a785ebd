//! Finite-difference Hamiltonian on a box with hard walls.
//!
//! The kinetic term `-ħ²/2 ψ''` is discretised with the three-point stencil,
//! giving a real symmetric tridiagonal matrix with `ħ²/dx² + V` on the
//! diagonal and `-ħ²/(2dx²)` next to it.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::potentials::PotentialKind;
use crate::error::{CpError, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EigenParams {
    pub potential: PotentialKind,
    pub xmin: f64,
    pub xmax: f64,
    pub points: usize,
    pub hbar: f64,
    pub e_max: f64,
    /// Vertical scale of the drawn |ψ|² curves.
    pub scale: f64,
}

impl Default for EigenParams {
    fn default() -> Self {
        Self {
            potential: PotentialKind::DoubleWell { a: 0.05 },
            xmin: -1.5,
            xmax: 1.5,
            points: 100,
            hbar: 0.07,
            e_max: 0.15,
            scale: 0.01,
        }
    }
}

impl EigenParams {
    pub fn solve(&self) -> Result<(Grid, Vec<f64>, Spectrum)> {
        let grid = discretize(self.xmin, self.xmax, self.points)?;
        let v = self.potential.sample(&grid.x);
        let spectrum = diagonalize(self.hbar, &grid, &v)?.below(self.e_max);
        Ok((grid, v, spectrum))
    }
}

/// Sample points of a one-dimensional grid with uniform spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    pub x: Vec<f64>,
    pub dx: f64,
}

impl Grid {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// `n` interior points of `[xmin, xmax]`; the walls themselves are excluded.
pub fn discretize(xmin: f64, xmax: f64, n: usize) -> Result<Grid> {
    if n == 0 || xmax <= xmin {
        return Err(CpError::invalid(format!("cannot place {} points in [{}, {}]", n, xmin, xmax)));
    }
    let dx = (xmax - xmin) / (n + 1) as f64;
    let x = (1..=n).map(|i| xmin + i as f64 * dx).collect();
    Ok(Grid { x, dx })
}

/// `n` points of one period `[xmin, xmax)`, the right end excluded.
pub fn periodic_grid(xmin: f64, xmax: f64, n: usize) -> Result<Grid> {
    if n < 2 || xmax <= xmin {
        return Err(CpError::invalid(format!("cannot place {} points in [{}, {})", n, xmin, xmax)));
    }
    let dx = (xmax - xmin) / n as f64;
    let x = (0..n).map(|i| xmin + i as f64 * dx).collect();
    Ok(Grid { x, dx })
}

/// Eigenvalues in ascending order with the matching eigenfunctions as columns.
///
/// The eigenfunctions are normalised so that `Σ|ψ|² dx = 1`.
#[derive(Clone, Debug)]
pub struct Spectrum {
    pub energies: Vec<f64>,
    pub states: DMatrix<f64>,
    pub dx: f64,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    pub fn state(&self, n: usize) -> DVector<f64> {
        self.states.column(n).into_owned()
    }

    /// Keep only the states with energy `≤ e_max`.
    pub fn below(&self, e_max: f64) -> Spectrum {
        let count = self.energies.iter().take_while(|&&e| e <= e_max).count();
        Spectrum {
            energies: self.energies[..count].to_vec(),
            states: self.states.columns(0, count).into_owned(),
            dx: self.dx,
        }
    }
}

pub(crate) fn sorted_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

pub fn hamiltonian(hbar: f64, grid: &Grid, v: &[f64]) -> Result<DMatrix<f64>> {
    let n = grid.len();
    if v.len() != n {
        return Err(CpError::Shape(format!("{} potential values for {} grid points", v.len(), n)));
    }
    let z = hbar * hbar / (2.0 * grid.dx * grid.dx);
    let mut h = DMatrix::zeros(n, n);
    for i in 0..n {
        h[(i, i)] = v[i] + 2.0 * z;
        if i + 1 < n {
            h[(i, i + 1)] = -z;
            h[(i + 1, i)] = -z;
        }
    }
    Ok(h)
}

pub fn diagonalize(hbar: f64, grid: &Grid, v: &[f64]) -> Result<Spectrum> {
    let h = hamiltonian(hbar, grid, v)?;
    debug!(n = grid.len(), hbar, "diagonalising hamiltonian");
    let eigen = SymmetricEigen::new(h);
    let raw: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    let order = sorted_order(&raw);

    let energies = order.iter().map(|&i| raw[i]).collect();
    let states = eigen.eigenvectors.select_columns(order.iter()) / grid.dx.sqrt();
    Ok(Spectrum { energies, states, dx: grid.dx })
}
