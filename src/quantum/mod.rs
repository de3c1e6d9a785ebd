//! One-dimensional quantum mechanics on a grid.

mod potentials;
mod hamiltonian;
mod bloch;
mod wavepacket;

pub use potentials::{Cosine, DoubleWell, Harmonic, Potential, PotentialKind};
pub use hamiltonian::{diagonalize, discretize, hamiltonian, periodic_grid, EigenParams, Grid, Spectrum};
pub use bloch::{band_structure, bloch_hamiltonian, diagonalize_bloch, tile_periods, BandParams, BandStructure, BlochSpectrum};
pub use wavepacket::{
    energy_expectation, evolve, excitation_weights, expansion_coefficients, gaussian_packet, norm, reconstruct,
    reconstruction_error, run_evolution, Evolution, WavepacketParams,
};
