//! Mean, spread and histograms of a series of measurements.

use serde::Serialize;

use crate::error::{CpError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    /// Sample variance with `n - 1` in the denominator.
    pub variance: f64,
    pub std_dev: f64,
    /// Standard error of the mean, `σ / √n`.
    pub std_error: f64,
}

pub fn summarize(data: &[f64]) -> Result<Summary> {
    let n = data.len();
    if n < 2 {
        return Err(CpError::invalid(format!("need at least two values, got {}", n)));
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    Ok(Summary { n, mean, variance, std_dev, std_error: std_dev / (n as f64).sqrt() })
}

/// Cumulative statistics after each of the first `k` measurements.
#[derive(Clone, Debug, Default)]
pub struct RunningSummary {
    pub mean: Vec<f64>,
    pub variance: Vec<f64>,
    pub std_error: Vec<f64>,
}

/// Running mean and variance from the sums of values and of squares.
///
/// The first variance is reported as zero.
pub fn running_summary(data: &[f64]) -> RunningSummary {
    let mut out = RunningSummary {
        mean: Vec::with_capacity(data.len()),
        variance: Vec::with_capacity(data.len()),
        std_error: Vec::with_capacity(data.len()),
    };
    let (mut sum, mut sum_sq) = (0.0, 0.0);
    for (i, &x) in data.iter().enumerate() {
        let k = (i + 1) as f64;
        sum += x;
        sum_sq += x * x;
        let mean = sum / k;
        let variance = if i == 0 { 0.0 } else { ((sum_sq - k * mean * mean) / (k - 1.0)).max(0.0) };
        out.mean.push(mean);
        out.variance.push(variance);
        out.std_error.push((variance / k).sqrt());
    }
    out
}

/// `⌈√(n + 1)⌉` bins for `n` values.
pub fn default_bin_count(n: usize) -> usize {
    ((n + 1) as f64).sqrt().ceil() as usize
}

/// Equal-width bins over `[min, max]`, the last one closed.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(data: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(CpError::invalid("histogram needs at least one bin"));
        }
        if data.is_empty() {
            return Err(CpError::invalid("histogram of empty data"));
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(CpError::invalid("histogram data must be finite"));
        }
        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == min {
            max = min + 1.0;
        }
        let width = (max - min) / bins as f64;
        let mut counts = vec![0; bins];
        for &x in data {
            let index = (((x - min) / width) as usize).min(bins - 1);
            counts[index] += 1;
        }
        Ok(Self { min, max, counts })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.bins() as f64
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn edges(&self) -> Vec<f64> {
        let w = self.bin_width();
        (0..=self.bins()).map(|i| self.min + i as f64 * w).collect()
    }

    pub fn centers(&self) -> Vec<f64> {
        let w = self.bin_width();
        (0..self.bins()).map(|i| self.min + (i as f64 + 0.5) * w).collect()
    }

    /// Poisson errors `√count`.
    pub fn errors(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| (c as f64).sqrt()).collect()
    }

    pub fn relative_frequencies(&self) -> Vec<f64> {
        let total = self.total() as f64;
        self.counts.iter().map(|&c| c as f64 / total).collect()
    }

    /// Normalised so the bars have unit area.
    pub fn density(&self) -> Vec<f64> {
        let w = self.bin_width();
        self.relative_frequencies().into_iter().map(|f| f / w).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_summary_of_small_sample() {
        let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.n, 8);
        assert_relative_eq!(s.mean, 5.0);
        assert_relative_eq!(s.variance, 32.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(s.std_error, (32.0f64 / 7.0 / 8.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_summary_needs_two_values() {
        assert!(matches!(summarize(&[1.0]), Err(CpError::InvalidParameter(_))));
    }

    #[test]
    fn test_running_summary_matches_batch() {
        let data = [1.0, 3.0, 2.0, 6.0, 4.0];
        let running = running_summary(&data);
        assert_eq!(running.variance[0], 0.0);
        assert_relative_eq!(running.mean[1], 2.0);
        let batch = summarize(&data).unwrap();
        assert_relative_eq!(running.mean[4], batch.mean, epsilon = 1e-12);
        assert_relative_eq!(running.variance[4], batch.variance, epsilon = 1e-12);
        assert_relative_eq!(running.std_error[4], batch.std_error, epsilon = 1e-12);
    }

    #[test]
    fn test_histogram_last_bin_closed() {
        let h = Histogram::new(&[0.0, 0.5, 1.0, 1.5, 2.0], 2).unwrap();
        assert_eq!(h.counts, vec![2, 3]);
        assert_relative_eq!(h.bin_width(), 1.0);
        assert_eq!(h.edges(), vec![0.0, 1.0, 2.0]);
        assert_eq!(h.centers(), vec![0.5, 1.5]);
        let area: f64 = h.density().iter().map(|d| d * h.bin_width()).sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-12);
        assert_relative_eq!(h.errors()[1], 3f64.sqrt());
    }

    #[test]
    fn test_histogram_of_constant_data() {
        let h = Histogram::new(&[3.0; 4], 5).unwrap();
        assert_eq!(h.total(), 4);
        assert_eq!(h.counts[0], 4);
    }

    #[test]
    fn test_default_bins() {
        assert_eq!(default_bin_count(0), 1);
        assert_eq!(default_bin_count(99), 10);
        assert_eq!(default_bin_count(100), 11);
    }
}
