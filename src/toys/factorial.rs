use num_bigint::BigUint;
use num_traits::One;

use crate::error::{CpError, Result};

/// Exact `n!`.
pub fn factorial(n: u64) -> BigUint {
    (1..=n).fold(BigUint::one(), |acc, k| acc * k)
}

/// `e ≈ 1 + Σ_{k=1}^{terms} 1/k!` in double precision.
///
/// Fails once `k!` no longer fits in an `f64`, which happens at `k = 171`.
pub fn euler_approximation(terms: u64) -> Result<f64> {
    let mut e = 1.0;
    let mut k_factorial = 1.0f64;
    for k in 1..=terms {
        k_factorial *= k as f64;
        if !k_factorial.is_finite() {
            return Err(CpError::Overflow(format!("{}! exceeds the double precision range", k)));
        }
        e += 1.0 / k_factorial;
    }
    Ok(e)
}
