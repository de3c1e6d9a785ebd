use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::{debug, warn};

use crate::error::{CpError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct MersenneResult {
    pub exponent: u32,
    pub prime: bool,
    /// `2^p - 1`.
    pub value: BigUint,
}

fn is_prime(p: u32) -> bool {
    p >= 2 && (2..).take_while(|d| d * d <= p).all(|d| p % d != 0)
}

/// Lucas-Lehmer test of `M_p = 2^p - 1`.
///
/// `s₀ = 4`, `s_{k+1} = s_k² - 2 mod M_p`; `M_p` is prime iff `s_{p-2} = 0`.
/// `M_2 = 3` is handled separately since the recursion starts at `p = 3`.
pub fn lucas_lehmer(p: u32) -> Result<MersenneResult> {
    if p < 2 {
        return Err(CpError::invalid(format!("exponent must be at least 2, got {}", p)));
    }
    let m = (BigUint::one() << p as usize) - BigUint::one();
    if p == 2 {
        return Ok(MersenneResult { exponent: p, prime: true, value: m });
    }
    if !is_prime(p) {
        warn!(p, "composite exponent, 2^p - 1 cannot be prime");
    }

    let two = BigUint::from(2u32);
    let mut s = BigUint::from(4u32);
    for _ in 2..p {
        s = (&s * &s + &m - &two) % &m;
    }
    let prime = s.is_zero();
    debug!(p, prime, "Lucas-Lehmer test");
    Ok(MersenneResult { exponent: p, prime, value: m })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_exponents() {
        let primes: Vec<u32> = (2..32).filter(|&p| lucas_lehmer(p).unwrap().prime).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 13, 17, 19, 31]);
    }

    #[test]
    fn test_value_is_all_ones_in_binary() {
        let r = lucas_lehmer(7).unwrap();
        assert!(r.prime);
        assert_eq!(r.value, BigUint::from(127u32));
        assert_eq!(format!("{:b}", r.value), "1111111");
    }

    #[test]
    fn test_composite_exponents() {
        assert!(!lucas_lehmer(26).unwrap().prime);
        assert!(!lucas_lehmer(42).unwrap().prime);
        assert!(!lucas_lehmer(11).unwrap().prime);
    }

    #[test]
    fn test_larger_mersenne_prime() {
        assert!(lucas_lehmer(521).unwrap().prime);
    }

    #[test]
    fn test_exponent_below_two() {
        assert!(lucas_lehmer(1).is_err());
    }
}
