//! One-dimensional potentials.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::calculus::Differentiable;

/// A potential energy curve `V(x)`.
pub trait Potential: Differentiable {
    fn sample(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.value(x)).collect()
    }
}

/// `x²/2`
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Harmonic;

impl Differentiable for Harmonic {
    fn value(&self, x: f64) -> f64 {
        0.5 * x * x
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        Some(x)
    }
}

impl Potential for Harmonic {}

/// `x⁴ - x² + a x`
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DoubleWell {
    pub a: f64,
}

impl Differentiable for DoubleWell {
    fn value(&self, x: f64) -> f64 {
        x.powi(4) - x * x + self.a * x
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        Some(4.0 * x.powi(3) - 2.0 * x + self.a)
    }
}

impl Potential for DoubleWell {}

/// `A cos 2πx`, period one.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Cosine {
    pub amplitude: f64,
}

impl Default for Cosine {
    fn default() -> Self {
        Self { amplitude: 1.0 }
    }
}

impl Differentiable for Cosine {
    fn value(&self, x: f64) -> f64 {
        self.amplitude * (2.0 * PI * x).cos()
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        Some(-2.0 * PI * self.amplitude * (2.0 * PI * x).sin())
    }
}

impl Potential for Cosine {}

/// Selectable potential for box-discretised problems.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PotentialKind {
    Harmonic,
    DoubleWell { a: f64 },
}

impl PotentialKind {
    pub fn sample(&self, xs: &[f64]) -> Vec<f64> {
        match *self {
            PotentialKind::Harmonic => Harmonic.sample(xs),
            PotentialKind::DoubleWell { a } => DoubleWell { a }.sample(xs),
        }
    }
}
