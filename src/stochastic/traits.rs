//! Traits shared by the stochastic simulations.

use rand::Rng;

/// A random walker that can be removed from the ensemble.
pub trait Walker {
    /// Move the walker by one time step.
    fn move_walker<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// Current position.
    fn position(&self) -> f64;

    /// Check if the walker has left the ensemble.
    fn should_be_deleted(&self) -> bool;

    /// Take the walker out of the ensemble.
    fn mark_for_deletion(&mut self);
}
