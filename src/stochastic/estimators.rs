//! Error estimates for correlated Markov-chain samples.

use crate::error::{CpError, Result};

/// Mean of a correlated time series with its statistical error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainEstimate {
    pub mean: f64,
    pub error: f64,
    pub autocorrelation_time: f64,
}

pub fn estimate(samples: &[f64]) -> Result<ChainEstimate> {
    if samples.is_empty() {
        return Err(CpError::invalid("cannot estimate from an empty chain"));
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let autocorrelation_time = autocorrelation_time(samples);
    let error = blocking_error(samples, autocorrelation_time);
    Ok(ChainEstimate { mean, error, autocorrelation_time })
}

/// Integrated autocorrelation time, summed until the first negative term.
pub fn autocorrelation_time(samples: &[f64]) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 1.0;
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    let var = samples.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    if var == 0.0 {
        return 1.0;
    }

    let mut tau = 1.0;
    for t in 1..n / 2 {
        let rho: f64 = samples[..n - t]
            .iter()
            .zip(samples[t..].iter())
            .map(|(&x, &y)| (x - mean) * (y - mean))
            .sum::<f64>()
            / ((n - t) as f64 * var);
        if rho < 0.0 {
            break;
        }
        tau += 2.0 * rho;
    }
    tau
}

/// Standard error from block means with blocks of `2τ` samples.
pub fn blocking_error(samples: &[f64], autocorrelation_time: f64) -> f64 {
    let block_size = ((2.0 * autocorrelation_time).ceil() as usize).max(1);
    let n_blocks = samples.len() / block_size;
    if n_blocks < 2 {
        return 0.0;
    }

    let block_means: Vec<f64> = samples
        .chunks_exact(block_size)
        .map(|block| block.iter().sum::<f64>() / block_size as f64)
        .collect();
    let mean = block_means.iter().sum::<f64>() / n_blocks as f64;
    let variance = block_means.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n_blocks - 1) as f64;
    (variance / n_blocks as f64).sqrt()
}
