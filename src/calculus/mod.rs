//! Numerical differentiation and integration.

mod traits;
mod differentiation;
mod quadrature;

pub use traits::{ArctanSquare, Differentiable, FnFunction};
pub use differentiation::{
    central_difference, extrapolated_difference, forward_difference, gradient, linspace, logspace, scan_errors,
    DerivativeParams, DifferenceScan,
};
pub use quadrature::{
    compare_rules, midpoint, scan_errors as scan_quadrature_errors, simpson, subinterval_counts, trapezoid,
    Integrand, Quadrature, QuadratureParams, QuadratureScan, RuleComparison,
};
