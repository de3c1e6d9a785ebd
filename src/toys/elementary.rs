use std::f64::consts::PI;

use crate::error::{CpError, Result};

/// `log_base |value|`; negative arguments use their magnitude.
pub fn logarithm(value: i64, base: f64) -> Result<f64> {
    if value == 0 {
        return Err(CpError::invalid("logarithm of zero"));
    }
    if base <= 0.0 || base == 1.0 || !base.is_finite() {
        return Err(CpError::invalid(format!("invalid logarithm base {}", base)));
    }
    Ok((value.unsigned_abs() as f64).ln() / base.ln())
}

pub fn sphere_volume(radius: f64) -> f64 {
    4.0 / 3.0 * PI * radius.powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_logarithms() {
        assert_relative_eq!(logarithm(2, std::f64::consts::E).unwrap(), 2f64.ln());
        assert_relative_eq!(logarithm(1000, 10.0).unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(logarithm(1_073_741_824, 2.0).unwrap(), 30.0, epsilon = 1e-12);
        assert_relative_eq!(logarithm(2401, 7.0).unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(logarithm(-2121, 3.0).unwrap(), logarithm(2121, 3.0).unwrap());
    }

    #[test]
    fn test_invalid_logarithms() {
        assert!(logarithm(0, 10.0).is_err());
        assert!(logarithm(5, 1.0).is_err());
        assert!(logarithm(5, -2.0).is_err());
    }

    #[test]
    fn test_sphere_volume() {
        assert_relative_eq!(sphere_volume(1.0), 4.0 / 3.0 * PI);
        assert_relative_eq!(sphere_volume(7.0), 1436.7550402417319, epsilon = 1e-9);
    }
}
