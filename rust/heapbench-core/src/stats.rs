//! Summary statistics over timing samples.

use serde::{Deserialize, Serialize};

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_stddev(samples: &[f64]) -> Option<f64> {
    let mean = mean(samples)?;
    let sum_sq: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
    Some((sum_sq / samples.len() as f64).sqrt())
}

/// Mean, spread and range of a set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mean = mean(samples)?;
        let stddev = population_stddev(samples)?;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Summary {
            mean,
            stddev,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn empty_has_no_statistics() {
        assert_eq!(mean(&[]), None);
        assert_eq!(population_stddev(&[]), None);
        assert!(Summary::from_samples(&[]).is_none());
    }

    #[test]
    fn stddev_divides_by_count() {
        // Population stddev of 2,4,4,4,5,5,7,9 is exactly 2.
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx_eq(mean(&samples).unwrap(), 5.0));
        assert!(approx_eq(population_stddev(&samples).unwrap(), 2.0));
    }

    #[test]
    fn single_sample_has_zero_spread() {
        let s = Summary::from_samples(&[0.25]).unwrap();
        assert!(approx_eq(s.mean, 0.25));
        assert!(approx_eq(s.stddev, 0.0));
        assert!(approx_eq(s.min, 0.25));
        assert!(approx_eq(s.max, 0.25));
    }

    #[test]
    fn summary_tracks_range() {
        let s = Summary::from_samples(&[0.3, 0.1, 0.2]).unwrap();
        assert!(approx_eq(s.min, 0.1));
        assert!(approx_eq(s.max, 0.3));
        assert!(approx_eq(s.mean, 0.2));
    }
}
