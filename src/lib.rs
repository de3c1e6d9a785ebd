//! rust_cp - computational physics experiments in Rust
//!
//! Each module holds one family of independent numerical experiments: discrete
//! maps, finite differences and quadrature, classical and quantum dynamics on a
//! grid, Monte Carlo simulations, and a few warm-up toys. Results are plain
//! structs; the binary prints them and renders SVG figures through [`plot`].

pub mod error;
pub mod io;
pub mod plot;
pub mod maps;
pub mod calculus;
pub mod dynamics;
pub mod quantum;
pub mod stochastic;
pub mod stats;
pub mod toys;

// Re-export commonly used types at crate root
pub use error::{CpError, Result};
pub use io::{read_config, Config};
pub use calculus::{Differentiable, FnFunction};
pub use dynamics::{HamiltonianSystem, OdeSystem};
pub use quantum::{Potential, PotentialKind, Spectrum};
pub use stochastic::Walker;
pub use stats::{summarize, Histogram, Summary};

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::calculus::{central_difference, gradient, linspace, simpson, Differentiable};
    use crate::dynamics::{integrate, HamiltonianSystem, OdeSystem};
    use crate::quantum::{discretize, diagonalize, DoubleWell, Harmonic, Potential};
    use crate::stats::{summarize, Histogram};
    use crate::stochastic::{approx_normal, estimate};

    /// Particle in a static potential, `ẋ = p`, `ṗ = -V'(x)`.
    struct Particle<V: Potential>(V);

    impl<V: Potential> OdeSystem<2> for Particle<V> {
        fn rhs(&self, _t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
            dydt[0] = y[1];
            dydt[1] = -self.0.derivative(y[0]).unwrap_or_else(|| self.0.numerical_derivative(y[0], 1e-6));
        }
    }

    impl<V: Potential> HamiltonianSystem for Particle<V> {
        fn potential(&self, x: f64) -> f64 {
            self.0.value(x)
        }
    }

    #[test]
    fn test_potential_derivatives_match_differences() {
        let well = DoubleWell { a: 0.1 };
        for x in [-1.2, -0.3, 0.0, 0.8] {
            let exact = well.derivative(x).unwrap();
            assert_relative_eq!(central_difference(&well, x, 1e-4), exact, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_classical_particle_conserves_energy_in_quantum_potential() {
        let particle = Particle(DoubleWell { a: 0.05 });
        let times = linspace(0.0, 20.0, 201);
        let states = integrate(&particle, [0.9, 0.0], &times, 10).unwrap();
        let e0 = particle.energy(0.9, 0.0);
        for y in &states {
            assert_relative_eq!(particle.energy(y[0], y[1]), e0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_harmonic_ground_state_density_integrates_to_one() {
        let grid = discretize(-6.0, 6.0, 400).unwrap();
        let spectrum = diagonalize(0.5, &grid, &Harmonic.sample(&grid.x)).unwrap();
        let density: Vec<f64> = spectrum.state(0).iter().map(|psi| psi * psi).collect();
        // integrate the sampled density by Simpson on a linear interpolant
        let dx = grid.dx;
        let x0 = grid.x[0];
        let interpolate = |x: f64| {
            let i = (((x - x0) / dx) as usize).min(density.len() - 2);
            let w = (x - grid.x[i]) / dx;
            density[i] * (1.0 - w) + density[i + 1] * w
        };
        let area = simpson(interpolate, grid.x[0], grid.x[grid.len() - 1], 2000).unwrap();
        assert_relative_eq!(area.value, 1.0, epsilon = 1e-3);
        assert_relative_eq!(spectrum.energies[0], 0.25, epsilon = 1e-3);
    }

    #[test]
    fn test_gradient_of_sampled_free_fall() {
        let t = linspace(0.0, 1.0, 101);
        let z: Vec<f64> = t.iter().map(|t| 2.0 - 4.905 * t * t).collect();
        let vz = gradient(&z, &t).unwrap();
        let az = gradient(&vz, &t).unwrap();
        let inner = summarize(&az[2..99]).unwrap();
        assert_relative_eq!(inner.mean, -9.81, epsilon = 1e-9);
    }

    #[test]
    fn test_uncorrelated_samples_statistics() {
        let mut rng = StdRng::seed_from_u64(31);
        let xs: Vec<f64> = (0..5000).map(|_| approx_normal(&mut rng)).collect();
        let chain = estimate(&xs).unwrap();
        let summary = summarize(&xs).unwrap();
        assert_relative_eq!(chain.mean, summary.mean, epsilon = 1e-12);
        assert!(chain.autocorrelation_time < 1.5);
        let hist = Histogram::new(&xs, 20).unwrap();
        assert_eq!(hist.total(), 5000);
        let peak = hist.counts.iter().enumerate().max_by_key(|(_, c)| **c).map(|(i, _)| hist.centers()[i]).unwrap();
        assert!(peak.abs() < 1.0);
    }
}
