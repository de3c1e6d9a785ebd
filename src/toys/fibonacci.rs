use crate::error::{CpError, Result};

fn recurse(n: u32, calls: &mut u64) -> u128 {
    *calls += 1;
    match n {
        0 => 0,
        1 => 1,
        _ => recurse(n - 1, calls) + recurse(n - 2, calls),
    }
}

/// Naive recursion, returning `F(n)` and the number of calls it took.
///
/// The call count is `2 F(n+1) - 1`, so keep `n` small.
pub fn fibonacci_recursive(n: u32) -> (u128, u64) {
    let mut calls = 0;
    let value = recurse(n, &mut calls);
    (value, calls)
}

pub fn fibonacci_iterative(n: u32) -> Result<u128> {
    if n == 0 {
        return Ok(0);
    }
    let (mut a, mut b) = (0u128, 1u128);
    for _ in 1..n {
        let next = a
            .checked_add(b)
            .ok_or_else(|| CpError::Overflow(format!("F({}) does not fit in 128 bits", n)))?;
        a = b;
        b = next;
    }
    Ok(b)
}

/// `(n, F(n), F(n)/F(n-1))` for `n = 1..=max`; the first ratio is taken as 1.
pub fn fibonacci_ratios(max: u32) -> Result<Vec<(u32, u128, f64)>> {
    let mut out = Vec::with_capacity(max as usize);
    let mut previous = 0u128;
    for n in 1..=max {
        let value = fibonacci_iterative(n)?;
        let ratio = if previous == 0 { 1.0 } else { value as f64 / previous as f64 };
        out.push((n, value, ratio));
        previous = value;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_recursive_counts_calls() {
        assert_eq!(fibonacci_recursive(0), (0, 1));
        assert_eq!(fibonacci_recursive(10), (55, 177));
        assert_eq!(fibonacci_recursive(20).0, 6765);
    }

    #[test]
    fn test_iterative_matches_recursive() {
        for n in 0..25 {
            assert_eq!(fibonacci_iterative(n).unwrap(), fibonacci_recursive(n).0);
        }
        assert_eq!(fibonacci_iterative(50).unwrap(), 12_586_269_025);
    }

    #[test]
    fn test_iterative_overflow() {
        assert!(fibonacci_iterative(186).is_ok());
        assert!(matches!(fibonacci_iterative(200), Err(CpError::Overflow(_))));
    }

    #[test]
    fn test_ratios_approach_golden_ratio() {
        let ratios = fibonacci_ratios(50).unwrap();
        assert_eq!(ratios.len(), 50);
        assert_relative_eq!(ratios[0].2, 1.0);
        let golden = (1.0 + 5f64.sqrt()) / 2.0;
        assert_relative_eq!(ratios[49].2, golden, epsilon = 1e-12);
    }
}
