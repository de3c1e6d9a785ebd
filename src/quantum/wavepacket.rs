//! Time evolution of a Gaussian wave packet by eigenfunction expansion.

use nalgebra::DVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use super::hamiltonian::Spectrum;
use crate::error::{CpError, Result};

/// `(2π w²)^{-1/4} exp(-(x-x0)²/(4w²)) exp(i p0 x/ħ)` on the points `x`.
pub fn gaussian_packet(x: &[f64], x0: f64, p0: f64, hbar: f64, width: f64) -> DVector<Complex64> {
    let norm = (2.0 * PI * width * width).powf(-0.25);
    DVector::from_iterator(
        x.len(),
        x.iter().map(|&xi| {
            let envelope = norm * (-(xi - x0).powi(2) / (4.0 * width * width)).exp();
            Complex64::from_polar(envelope, p0 * xi / hbar)
        }),
    )
}

/// `c_n = dx Σ_x ψ_n(x) φ(x)`.
pub fn expansion_coefficients(spectrum: &Spectrum, packet: &DVector<Complex64>) -> Result<DVector<Complex64>> {
    if packet.len() != spectrum.states.nrows() {
        return Err(CpError::Shape(format!(
            "packet has {} points, eigenfunctions {}",
            packet.len(),
            spectrum.states.nrows()
        )));
    }
    let states = spectrum.states.map(|v| Complex64::new(v, 0.0));
    Ok(states.adjoint() * packet * Complex64::new(spectrum.dx, 0.0))
}

/// `Σ_n c_n ψ_n`.
pub fn reconstruct(spectrum: &Spectrum, coefficients: &DVector<Complex64>) -> DVector<Complex64> {
    evolve(spectrum, coefficients, 0.0, 1.0)
}

/// `√(Σ |φ̃ - φ|² dx)` between a packet and its reconstruction.
pub fn reconstruction_error(spectrum: &Spectrum, packet: &DVector<Complex64>, coefficients: &DVector<Complex64>) -> f64 {
    let diff = reconstruct(spectrum, coefficients) - packet;
    (diff.iter().map(|c| c.norm_sqr()).sum::<f64>() * spectrum.dx).sqrt()
}

/// `⟨E⟩ = Σ |c_n|² E_n`.
pub fn energy_expectation(coefficients: &DVector<Complex64>, energies: &[f64]) -> f64 {
    coefficients.iter().zip(energies).map(|(c, e)| c.norm_sqr() * e).sum()
}

/// `φ(t) = Σ c_n e^{-i E_n t/ħ} ψ_n`.
pub fn evolve(spectrum: &Spectrum, coefficients: &DVector<Complex64>, t: f64, hbar: f64) -> DVector<Complex64> {
    let n = spectrum.states.nrows();
    let mut phi = DVector::from_element(n, Complex64::new(0.0, 0.0));
    for (m, (&e, c)) in spectrum.energies.iter().zip(coefficients.iter()).enumerate() {
        let weight = c * Complex64::from_polar(1.0, -e * t / hbar);
        for (p, &psi) in phi.iter_mut().zip(spectrum.states.column(m).iter()) {
            *p += weight * psi;
        }
    }
    phi
}

/// `|c_n|²` scaled so the strongest excitation is one.
pub fn excitation_weights(coefficients: &DVector<Complex64>) -> Vec<f64> {
    let weights: Vec<f64> = coefficients.iter().map(|c| c.norm_sqr()).collect();
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max == 0.0 {
        return weights;
    }
    weights.into_iter().map(|w| w / max).collect()
}

pub fn norm(phi: &DVector<Complex64>, dx: f64) -> f64 {
    phi.iter().map(|c| c.norm_sqr()).sum::<f64>() * dx
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WavepacketParams {
    pub tilt: f64,
    pub half_width: f64,
    pub points: usize,
    pub hbar: f64,
    pub packet_width: f64,
    pub momentum: f64,
    pub t_max: f64,
    pub time_samples: usize,
    /// Only states up to this energy are drawn.
    pub e_max: f64,
    /// Packet centres, one evolution each.
    pub starts: Vec<f64>,
}

impl Default for WavepacketParams {
    fn default() -> Self {
        Self {
            tilt: 0.04,
            half_width: 1.5,
            points: 1000,
            hbar: 0.05,
            packet_width: 0.1,
            momentum: 0.0,
            t_max: 10.0,
            time_samples: 500,
            e_max: 0.1,
            starts: vec![-0.7],
        }
    }
}

/// Expansion of one packet together with its evolution at the requested times.
#[derive(Clone, Debug)]
pub struct Evolution {
    pub coefficients: DVector<Complex64>,
    pub energy: f64,
    pub reconstruction_error: f64,
    pub densities: Vec<Vec<f64>>,
}

pub fn run_evolution(spectrum: &Spectrum, x: &[f64], x0: f64, params: &WavepacketParams, times: &[f64]) -> Result<Evolution> {
    let packet = gaussian_packet(x, x0, params.momentum, params.hbar, params.packet_width);
    let coefficients = expansion_coefficients(spectrum, &packet)?;
    let energy = energy_expectation(&coefficients, &spectrum.energies);
    let error = reconstruction_error(spectrum, &packet, &coefficients);
    debug!(x0, energy, error, "expanded wave packet");
    let densities = times
        .iter()
        .map(|&t| evolve(spectrum, &coefficients, t, params.hbar).iter().map(|c| c.norm_sqr()).collect())
        .collect();
    Ok(Evolution { coefficients, energy, reconstruction_error: error, densities })
}
