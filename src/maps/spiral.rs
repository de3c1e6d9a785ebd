//! Logarithmic spiral `r = 0.5^t`, `φ = 2πt`, drawn around a chosen centre.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralParams {
    pub samples: usize,
    pub t_max: f64,
    pub centers: Vec<(f64, f64)>,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self { samples: 500, t_max: 5.0, centers: vec![(0.0, 0.0)] }
    }
}

pub fn spiral(center: (f64, f64), samples: usize, t_max: f64) -> Vec<(f64, f64)> {
    if samples == 0 {
        return Vec::new();
    }
    let step = if samples > 1 { t_max / (samples - 1) as f64 } else { 0.0 };
    (0..samples)
        .map(|i| {
            let t = i as f64 * step;
            let r = 0.5f64.powf(t);
            let phi = 2.0 * PI * t;
            (center.0 + r * phi.cos(), center.1 + r * phi.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spiral_endpoints() {
        let pts = spiral((2.0, -1.0), 500, 5.0);
        assert_eq!(pts.len(), 500);
        assert_relative_eq!(pts[0].0, 3.0, epsilon = 1e-12);
        assert_relative_eq!(pts[0].1, -1.0, epsilon = 1e-12);
        // after five full turns the radius is 1/32
        assert_relative_eq!(pts[499].0, 2.0 + 1.0 / 32.0, epsilon = 1e-9);
    }

    #[test]
    fn test_radius_shrinks() {
        let pts = spiral((0.0, 0.0), 100, 5.0);
        let r: Vec<f64> = pts.iter().map(|(x, y)| x.hypot(*y)).collect();
        assert!(r.windows(2).all(|w| w[1] < w[0]));
    }
}
