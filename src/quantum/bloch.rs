//! Band structure of a periodic potential.
//!
//! One unit cell is discretised periodically. The Bloch condition
//! `ψ(x + 1) = e^{ik} ψ(x)` enters as phases on the two corner elements of
//! the otherwise tridiagonal Hamiltonian, which makes it complex Hermitian.

use nalgebra::{DMatrix, SymmetricEigen};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info};

use super::hamiltonian::{sorted_order, Grid};
use crate::calculus::linspace;
use crate::error::{CpError, Result};

pub fn bloch_hamiltonian(hbar: f64, grid: &Grid, v: &[f64], k: f64) -> Result<DMatrix<Complex64>> {
    let n = grid.len();
    if v.len() != n {
        return Err(CpError::Shape(format!("{} potential values for {} grid points", v.len(), n)));
    }
    if n < 3 {
        return Err(CpError::invalid("a periodic cell needs at least three points"));
    }
    let z = hbar * hbar / (2.0 * grid.dx * grid.dx);
    let mut h = DMatrix::from_element(n, n, Complex64::new(0.0, 0.0));
    for i in 0..n {
        h[(i, i)] = Complex64::new(v[i] + 2.0 * z, 0.0);
        if i + 1 < n {
            h[(i, i + 1)] = Complex64::new(-z, 0.0);
            h[(i + 1, i)] = Complex64::new(-z, 0.0);
        }
    }
    h[(0, n - 1)] = -z * Complex64::from_polar(1.0, -k);
    h[(n - 1, 0)] = -z * Complex64::from_polar(1.0, k);
    Ok(h)
}

#[derive(Clone, Debug)]
pub struct BlochSpectrum {
    pub k: f64,
    pub energies: Vec<f64>,
    /// Cell-periodic eigenfunctions as columns, `Σ|ψ|² dx = 1`.
    pub states: DMatrix<Complex64>,
}

impl BlochSpectrum {
    pub fn density(&self, n: usize) -> Vec<f64> {
        self.states.column(n).iter().map(|c| c.norm_sqr()).collect()
    }
}

pub fn diagonalize_bloch(hbar: f64, grid: &Grid, v: &[f64], k: f64) -> Result<BlochSpectrum> {
    let h = bloch_hamiltonian(hbar, grid, v, k)?;
    let eigen = SymmetricEigen::new(h);
    let raw: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    let order = sorted_order(&raw);
    let scale = Complex64::new(1.0 / grid.dx.sqrt(), 0.0);
    Ok(BlochSpectrum {
        k,
        energies: order.iter().map(|&i| raw[i]).collect(),
        states: eigen.eigenvectors.select_columns(order.iter()) * scale,
    })
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BandParams {
    pub hbar: f64,
    pub points: usize,
    pub amplitude: f64,
    pub k_samples: usize,
    pub e_max: f64,
    pub periods: usize,
    /// Bloch phases whose eigenfunctions are shown.
    pub selected_k: Vec<f64>,
}

impl Default for BandParams {
    fn default() -> Self {
        Self { hbar: 0.2, points: 100, amplitude: 1.0, k_samples: 100, e_max: 6.0, periods: 4, selected_k: vec![0.0] }
    }
}

impl BandParams {
    pub fn phases(&self) -> Vec<f64> {
        linspace(-PI, PI, self.k_samples)
    }
}

/// `bands[b][i]` is the energy of band `b` at `ks[i]`.
#[derive(Clone, Debug)]
pub struct BandStructure {
    pub ks: Vec<f64>,
    pub bands: Vec<Vec<f64>>,
}

/// Energies for every phase in `ks`, keeping bands whose minimum is `≤ e_max`.
pub fn band_structure(hbar: f64, grid: &Grid, v: &[f64], ks: &[f64], e_max: f64) -> Result<BandStructure> {
    info!(phases = ks.len(), points = grid.len(), "computing band structure");
    let mut bands: Vec<Vec<f64>> = vec![Vec::with_capacity(ks.len()); grid.len()];
    for &k in ks {
        let spectrum = diagonalize_bloch(hbar, grid, v, k)?;
        for (band, e) in bands.iter_mut().zip(spectrum.energies) {
            band.push(e);
        }
    }
    bands.retain(|band| band.iter().copied().fold(f64::INFINITY, f64::min) <= e_max);
    debug!(bands = bands.len(), e_max, "bands below cutoff");
    Ok(BandStructure { ks: ks.to_vec(), bands })
}

/// Repeat a cell-periodic function over `periods` unit cells.
pub fn tile_periods(grid: &Grid, values: &[f64], periods: usize) -> Vec<(f64, f64)> {
    let length = grid.dx * grid.len() as f64;
    (0..periods)
        .flat_map(|m| {
            grid.x.iter().zip(values).map(move |(&x, &y)| (x + m as f64 * length, y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantum::hamiltonian::periodic_grid;
    use crate::quantum::potentials::{Cosine, Potential};
    use approx::assert_relative_eq;

    #[test]
    fn test_hamiltonian_is_hermitian() {
        let grid = periodic_grid(0.0, 1.0, 20).unwrap();
        let v = Cosine::default().sample(&grid.x);
        let h = bloch_hamiltonian(0.2, &grid, &v, 0.7).unwrap();
        assert_relative_eq!((h.clone() - h.adjoint()).norm(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_free_particle_band() {
        let grid = periodic_grid(0.0, 1.0, 100).unwrap();
        let v = vec![0.0; 100];
        let hbar = 0.2;
        for &k in &[0.0, 0.5, 1.5] {
            let s = diagonalize_bloch(hbar, &grid, &v, k).unwrap();
            assert_relative_eq!(s.energies[0], hbar * hbar * k * k / 2.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_bands_symmetric_in_k() {
        let grid = periodic_grid(0.0, 1.0, 60).unwrap();
        let v = Cosine::default().sample(&grid.x);
        let bands = band_structure(0.2, &grid, &v, &[-1.1, 1.1], 6.0).unwrap();
        assert!(!bands.bands.is_empty());
        for band in &bands.bands {
            assert_relative_eq!(band[0], band[1], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cutoff_and_density() {
        let grid = periodic_grid(0.0, 1.0, 50).unwrap();
        let v = Cosine::default().sample(&grid.x);
        let bands = band_structure(0.2, &grid, &v, &linspace(-PI, PI, 9), 6.0).unwrap();
        assert!(bands.bands.len() < 50);
        assert!(bands.bands.iter().all(|b| b.len() == 9));

        let s = diagonalize_bloch(0.2, &grid, &v, 0.3).unwrap();
        let norm: f64 = s.density(0).iter().sum::<f64>() * grid.dx;
        assert_relative_eq!(norm, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_tiling() {
        let grid = periodic_grid(0.0, 1.0, 4).unwrap();
        let tiled = tile_periods(&grid, &[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(tiled.len(), 12);
        assert_relative_eq!(tiled[5].0, 1.25);
        assert_relative_eq!(tiled[5].1, 2.0);
    }
}
