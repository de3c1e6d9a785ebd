//! Traits for systems of ordinary differential equations.

/// A first-order system `dy/dt = f(t, y)` with `N` components.
pub trait OdeSystem<const N: usize> {
    /// Write `f(t, y)` into `dydt`.
    fn rhs(&self, t: f64, y: &[f64; N], dydt: &mut [f64; N]);
}

/// A one-dimensional Hamiltonian `H = p²/2 + V(x)`.
pub trait HamiltonianSystem {
    fn potential(&self, x: f64) -> f64;

    fn energy(&self, x: f64, p: f64) -> f64 {
        0.5 * p * p + self.potential(x)
    }

    /// Momentum magnitude on the level set `H = energy`, `None` where forbidden.
    fn momentum_at(&self, x: f64, energy: f64) -> Option<f64> {
        let kinetic = energy - self.potential(x);
        (kinetic >= 0.0).then(|| (2.0 * kinetic).sqrt())
    }
}
