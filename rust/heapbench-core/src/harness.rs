//! Timing harness: generate random arrays, time the sort, aggregate samples.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BenchError, Result};
use crate::heap::sort;
use crate::stats;

/// Generated values fall in `[0, size * VALUE_RANGE_FACTOR]`.
pub const VALUE_RANGE_FACTOR: u64 = 10;

pub const DEFAULT_REPETITIONS: usize = 30;

/// A named input size, e.g. `small` = 1 000 elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeClass {
    pub label: String,
    pub size: usize,
}

impl SizeClass {
    pub fn new(label: impl Into<String>, size: usize) -> Self {
        SizeClass {
            label: label.into(),
            size,
        }
    }

    /// Build a size class from signed user input, rejecting negative sizes.
    pub fn from_signed(label: impl Into<String>, size: i64) -> Result<Self> {
        let size = usize::try_from(size).map_err(|_| BenchError::NegativeSize(size))?;
        Ok(SizeClass::new(label, size))
    }

    /// The three classes the comparison charts are drawn for.
    pub fn defaults() -> Vec<SizeClass> {
        vec![
            SizeClass::new("small", 1_000),
            SizeClass::new("medium", 10_000),
            SizeClass::new("large", 100_000),
        ]
    }
}

/// Which sizes to run, how often, and how to seed the random source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub size_classes: Vec<SizeClass>,
    pub repetitions: usize,
    /// Fixed seed for reproducible inputs. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            size_classes: SizeClass::defaults(),
            repetitions: DEFAULT_REPETITIONS,
            seed: None,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size_classes.is_empty() {
            return Err(BenchError::EmptySuite);
        }
        if self.repetitions == 0 {
            return Err(BenchError::NoRepetitions);
        }
        Ok(())
    }
}

/// Timings for one input size. Built once from the raw samples and not
/// modified afterwards. Deserializing recomputes the statistics from
/// `elapsed_times`; stored `mean`/`stddev` values are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredResult")]
pub struct BenchmarkResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    input_size: usize,
    repetitions: usize,
    elapsed_times: Vec<f64>,
    mean: f64,
    stddev: f64,
}

/// On-disk shape of a `BenchmarkResult`; only the samples are trusted.
#[derive(Deserialize)]
struct StoredResult {
    #[serde(default)]
    label: Option<String>,
    input_size: usize,
    elapsed_times: Vec<f64>,
}

impl TryFrom<StoredResult> for BenchmarkResult {
    type Error = BenchError;

    fn try_from(stored: StoredResult) -> Result<Self> {
        let result = BenchmarkResult::from_samples(stored.input_size, stored.elapsed_times)?;
        Ok(match stored.label {
            Some(label) => result.with_label(label),
            None => result,
        })
    }
}

impl BenchmarkResult {
    /// Aggregate raw samples (seconds, in repetition order).
    pub fn from_samples(input_size: usize, elapsed_times: Vec<f64>) -> Result<Self> {
        let summary = stats::Summary::from_samples(&elapsed_times).ok_or(BenchError::NoRepetitions)?;
        Ok(BenchmarkResult {
            label: None,
            input_size,
            repetitions: elapsed_times.len(),
            elapsed_times,
            mean: summary.mean,
            stddev: summary.stddev,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Raw samples in seconds, ordered by repetition index.
    pub fn elapsed_times(&self) -> &[f64] {
        &self.elapsed_times
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    pub fn min(&self) -> f64 {
        self.elapsed_times.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.elapsed_times
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean divided by `N ln N`. Flat across sizes for O(N log N) growth.
    pub fn normalized_mean(&self) -> Option<f64> {
        normalize_by_n_log_n(self.mean, self.input_size)
    }
}

/// `seconds / (n ln n)`, or `None` when `n < 2` (the divisor is zero).
pub fn normalize_by_n_log_n(seconds: f64, n: usize) -> Option<f64> {
    if n < 2 {
        return None;
    }
    let n = n as f64;
    Some(seconds / (n * n.ln()))
}

/// Drives the sort over freshly generated inputs. Owns the random source.
pub struct Harness {
    rng: StdRng,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Harness seeded from OS entropy.
    pub fn new() -> Self {
        Harness {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Harness {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn for_config(config: &BenchmarkConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    /// `size` uniform values in `[0, size * VALUE_RANGE_FACTOR]`.
    pub fn generate(&mut self, size: usize) -> Result<Vec<u64>> {
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| BenchError::Allocation { size })?;
        let upper = (size as u64).saturating_mul(VALUE_RANGE_FACTOR);
        data.extend((0..size).map(|_| self.rng.gen_range(0..=upper)));
        Ok(data)
    }

    /// Time `repetitions` sorts of independent random arrays of `size`.
    pub fn run(&mut self, size: usize, repetitions: usize) -> Result<BenchmarkResult> {
        if repetitions == 0 {
            return Err(BenchError::NoRepetitions);
        }
        info!(size, repetitions, "starting benchmark");

        let mut samples = Vec::new();
        samples
            .try_reserve_exact(repetitions)
            .map_err(|_| BenchError::Allocation { size: repetitions })?;
        for repetition in 1..=repetitions {
            let mut data = self.generate(size)?;

            let start = Instant::now();
            sort(&mut data);
            let elapsed_s = start.elapsed().as_secs_f64();
            std::hint::black_box(&data);

            debug!(repetition, repetitions, elapsed_s, "run finished");
            samples.push(elapsed_s);
        }

        let result = BenchmarkResult::from_samples(size, samples)?;
        info!(
            size,
            mean_s = result.mean(),
            stddev_s = result.stddev(),
            "benchmark finished"
        );
        Ok(result)
    }

    /// Run every size class in configured order. The first failure aborts
    /// the suite; no partial results are returned.
    pub fn run_suite(&mut self, config: &BenchmarkConfig) -> Result<Vec<BenchmarkResult>> {
        config.validate()?;
        config
            .size_classes
            .iter()
            .map(|class| {
                self.run(class.size, config.repetitions)
                    .map(|r| r.with_label(&class.label))
            })
            .collect()
    }
}

/// Benchmark `size` elements over `repetitions` runs with an entropy-seeded
/// harness.
pub fn benchmark(size: usize, repetitions: usize) -> Result<BenchmarkResult> {
    Harness::new().run(size, repetitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_size_is_rejected() {
        assert_eq!(
            SizeClass::from_signed("bad", -1),
            Err(BenchError::NegativeSize(-1))
        );
        assert_eq!(
            SizeClass::from_signed("ok", 10).unwrap(),
            SizeClass::new("ok", 10)
        );
    }

    #[test]
    fn zero_repetitions_is_rejected() {
        let mut harness = Harness::with_seed(1);
        assert_eq!(harness.run(10, 0), Err(BenchError::NoRepetitions));
    }

    #[test]
    fn huge_repetition_count_fails_with_allocation_error() {
        let mut harness = Harness::with_seed(1);
        assert_eq!(
            harness.run(1, usize::MAX),
            Err(BenchError::Allocation { size: usize::MAX })
        );
    }

    #[test]
    fn empty_suite_is_rejected() {
        let config = BenchmarkConfig {
            size_classes: vec![],
            ..BenchmarkConfig::default()
        };
        assert_eq!(config.validate(), Err(BenchError::EmptySuite));
    }

    #[test]
    fn generated_values_stay_in_range() {
        let mut harness = Harness::with_seed(7);
        let data = harness.generate(50).unwrap();
        assert_eq!(data.len(), 50);
        assert!(data.iter().all(|&v| v <= 500));
    }

    #[test]
    fn generate_zero_is_empty() {
        let mut harness = Harness::with_seed(7);
        assert!(harness.generate(0).unwrap().is_empty());
    }

    #[test]
    fn seeded_harnesses_generate_identical_inputs() {
        let a = Harness::with_seed(42).generate(100).unwrap();
        let b = Harness::with_seed(42).generate(100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn size_zero_is_valid() {
        let result = Harness::with_seed(3).run(0, 3).unwrap();
        assert_eq!(result.elapsed_times().len(), 3);
        assert_eq!(result.normalized_mean(), None);
    }

    #[test]
    fn suite_keeps_configured_order_and_labels() {
        let config = BenchmarkConfig {
            size_classes: vec![SizeClass::new("b", 20), SizeClass::new("a", 10)],
            repetitions: 2,
            seed: Some(9),
        };
        let results = Harness::for_config(&config).run_suite(&config).unwrap();
        let sizes: Vec<usize> = results.iter().map(|r| r.input_size()).collect();
        let labels: Vec<Option<&str>> = results.iter().map(|r| r.label()).collect();
        assert_eq!(sizes, [20, 10]);
        assert_eq!(labels, [Some("b"), Some("a")]);
    }

    #[test]
    fn normalization_divides_by_n_ln_n() {
        let n = 1000usize;
        let expected = 2.0 / (1000.0 * (1000.0f64).ln());
        let got = normalize_by_n_log_n(2.0, n).unwrap();
        assert!((got - expected).abs() < 1e-15);
        assert_eq!(normalize_by_n_log_n(1.0, 1), None);
    }

    #[test]
    fn result_round_trips_through_json() {
        let result = BenchmarkResult::from_samples(4, vec![0.1, 0.3])
            .unwrap()
            .with_label("tiny");
        let json = serde_json::to_string(&result).unwrap();
        let back: BenchmarkResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn loading_recomputes_statistics_from_samples() {
        let json = r#"{
            "label": "small",
            "input_size": 10,
            "repetitions": 99,
            "elapsed_times": [1.0, 3.0],
            "mean": 42.0,
            "stddev": 7.0
        }"#;
        let loaded: BenchmarkResult = serde_json::from_str(json).unwrap();
        assert_eq!(loaded.label(), Some("small"));
        assert_eq!(loaded.repetitions(), 2);
        assert!((loaded.mean() - 2.0).abs() < 1e-12);
        assert!((loaded.stddev() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn loading_without_samples_is_rejected() {
        let json = r#"{"input_size": 10, "elapsed_times": [], "mean": 0.0, "stddev": 0.0}"#;
        let err = serde_json::from_str::<BenchmarkResult>(json).unwrap_err();
        assert!(err.to_string().contains("repetition count must be at least 1"));
    }
}
