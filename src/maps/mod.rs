//! Discrete maps: the kicked rotor and the decaying spiral demo.

mod kicked_rotor;
mod spiral;

pub use kicked_rotor::{orbit, phase_portrait, wrap_angle, wrap_momentum, RotorParams};
pub use spiral::{spiral, SpiralParams};
