//! Joins measured results with a reference dataset and checks growth rate.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::harness::{normalize_by_n_log_n, BenchmarkResult};
use crate::reference::{ReferenceDataset, ReferencePoint};

/// Stand-in for a zero mean so ratios stay finite.
pub const MIN_MEAN: f64 = 1e-12;

fn guarded(mean: f64) -> f64 {
    if mean <= 0.0 {
        MIN_MEAN
    } else {
        mean
    }
}

/// One size class, measured side by side with the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub size: usize,
    pub measured_mean: f64,
    pub measured_stddev: f64,
    pub reference: Option<ReferencePoint>,
    /// Reference mean divided by measured mean. Above 1 means the measured
    /// implementation is faster.
    pub speedup: Option<f64>,
    pub measured_normalized: Option<f64>,
    pub reference_normalized: Option<f64>,
}

/// Build one row per result, in result order.
pub fn compare(results: &[BenchmarkResult], reference: &ReferenceDataset) -> Vec<ComparisonRow> {
    results
        .iter()
        .map(|result| {
            let size = result.input_size();
            let point = reference.lookup(size).copied();
            if point.is_none() {
                warn!(size, dataset = %reference.name, "no reference timing for size");
            }
            ComparisonRow {
                label: result
                    .label()
                    .map(str::to_string)
                    .unwrap_or_else(|| size.to_string()),
                size,
                measured_mean: result.mean(),
                measured_stddev: result.stddev(),
                reference: point,
                speedup: point.map(|p| p.mean / guarded(result.mean())),
                measured_normalized: normalize_by_n_log_n(guarded(result.mean()), size),
                reference_normalized: point
                    .and_then(|p| normalize_by_n_log_n(guarded(p.mean), size)),
            }
        })
        .collect()
}

/// Observed growth between the smallest and largest size class against the
/// `N ln N` prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingCheck {
    pub smallest: usize,
    pub largest: usize,
    /// `mean(largest) / mean(smallest)`
    pub observed: f64,
    /// `(N ln N)(largest) / (N ln N)(smallest)`
    pub expected: f64,
}

impl ScalingCheck {
    /// `None` unless there are two distinct sizes of at least 2 elements.
    pub fn from_results(results: &[BenchmarkResult]) -> Option<Self> {
        let usable = results.iter().filter(|r| r.input_size() >= 2);
        let small = usable.clone().min_by_key(|r| r.input_size())?;
        let large = usable.max_by_key(|r| r.input_size())?;
        if small.input_size() == large.input_size() {
            return None;
        }

        let n_log_n = |n: usize| {
            let n = n as f64;
            n * n.ln()
        };
        Some(ScalingCheck {
            smallest: small.input_size(),
            largest: large.input_size(),
            observed: guarded(large.mean()) / guarded(small.mean()),
            expected: n_log_n(large.input_size()) / n_log_n(small.input_size()),
        })
    }

    /// How far off the prediction is, as a factor of at least 1.
    pub fn deviation(&self) -> f64 {
        let ratio = self.observed / self.expected;
        if ratio >= 1.0 {
            ratio
        } else {
            1.0 / ratio
        }
    }

    pub fn within(&self, factor: f64) -> bool {
        self.deviation() <= factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(size: usize, samples: &[f64]) -> BenchmarkResult {
        BenchmarkResult::from_samples(size, samples.to_vec()).unwrap()
    }

    #[test]
    fn speedup_is_reference_over_measured() {
        let results = vec![result(1_000, &[0.0001, 0.0001]).with_label("small")];
        let rows = compare(&results, &ReferenceDataset::interpreted_python());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "small");
        let speedup = rows[0].speedup.unwrap();
        assert!((speedup - 39.54).abs() < 1e-6);
    }

    #[test]
    fn missing_reference_leaves_gaps() {
        let rows = compare(&[result(77, &[0.5])], &ReferenceDataset::native_c());
        assert_eq!(rows[0].label, "77");
        assert!(rows[0].reference.is_none());
        assert!(rows[0].speedup.is_none());
        assert!(rows[0].reference_normalized.is_none());
        assert!(rows[0].measured_normalized.is_some());
    }

    #[test]
    fn zero_mean_is_guarded() {
        let rows = compare(&[result(1_000, &[0.0])], &ReferenceDataset::native_c());
        assert!(rows[0].speedup.unwrap().is_finite());
    }

    #[test]
    fn perfect_n_log_n_growth_has_unit_deviation() {
        let nlogn = |n: f64| n * n.ln();
        let results = vec![
            result(100_000, &[nlogn(100_000.0) * 1e-9]),
            result(1_000, &[nlogn(1_000.0) * 1e-9]),
        ];
        let check = ScalingCheck::from_results(&results).unwrap();
        assert_eq!(check.smallest, 1_000);
        assert_eq!(check.largest, 100_000);
        assert!((check.deviation() - 1.0).abs() < 1e-9);
        assert!(check.within(1.0001));
    }

    #[test]
    fn deviation_is_symmetric() {
        let check = ScalingCheck {
            smallest: 10,
            largest: 100,
            observed: 5.0,
            expected: 20.0,
        };
        assert!((check.deviation() - 4.0).abs() < 1e-12);
        assert!(!check.within(3.0));
    }

    #[test]
    fn scaling_needs_two_sizes() {
        assert!(ScalingCheck::from_results(&[result(100, &[0.1])]).is_none());
        assert!(ScalingCheck::from_results(&[result(1, &[0.1]), result(100, &[0.2])]).is_none());
    }
}
