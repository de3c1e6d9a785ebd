//! Traits for real functions of one variable.

/// A smooth real function `f: ℝ → ℝ`.
pub trait Differentiable {
    /// Evaluate the function at `x`.
    fn value(&self, x: f64) -> f64;

    /// Analytic derivative, when known.
    fn derivative(&self, _x: f64) -> Option<f64> {
        None
    }

    /// Numerical derivative using a symmetric difference of width `h`.
    fn numerical_derivative(&self, x: f64, h: f64) -> f64 {
        (self.value(x + h / 2.0) - self.value(x - h / 2.0)) / h
    }

    /// Numerical second derivative using central difference.
    fn numerical_second_derivative(&self, x: f64, h: f64) -> f64 {
        (self.value(x + h) - 2.0 * self.value(x) + self.value(x - h)) / (h * h)
    }
}

/// Adapter so plain closures can be used wherever a [`Differentiable`] is expected.
pub struct FnFunction<F: Fn(f64) -> f64>(pub F);

impl<F: Fn(f64) -> f64> Differentiable for FnFunction<F> {
    fn value(&self, x: f64) -> f64 {
        (self.0)(x)
    }
}

/// `arctan(x²)`, the standard test function of the differentiation experiment.
pub struct ArctanSquare;

impl Differentiable for ArctanSquare {
    fn value(&self, x: f64) -> f64 {
        (x * x).atan()
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        Some(2.0 * x / (1.0 + x.powi(4)))
    }
}
