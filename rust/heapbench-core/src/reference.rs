//! Recorded timings from other implementations of the same heap sort.
//!
//! These are fixtures from earlier measurements; nothing here is re-run.

use serde::{Deserialize, Serialize};

/// Mean and population stddev (seconds) for one input size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub size: usize,
    pub mean: f64,
    pub stddev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDataset {
    pub name: String,
    pub points: Vec<ReferencePoint>,
}

impl ReferenceDataset {
    pub fn new(name: impl Into<String>, points: Vec<ReferencePoint>) -> Self {
        ReferenceDataset {
            name: name.into(),
            points,
        }
    }

    /// Native C build, 30 runs per size.
    pub fn native_c() -> Self {
        Self::new(
            "C",
            vec![
                ReferencePoint { size: 1_000, mean: 0.000167, stddev: 0.000373 },
                ReferencePoint { size: 10_000, mean: 0.001900, stddev: 0.000651 },
                ReferencePoint { size: 100_000, mean: 0.023067, stddev: 0.001504 },
            ],
        )
    }

    /// Interpreted Python build, 30 runs per size.
    pub fn interpreted_python() -> Self {
        Self::new(
            "Python",
            vec![
                ReferencePoint { size: 1_000, mean: 0.003954, stddev: 0.006136 },
                ReferencePoint { size: 10_000, mean: 0.030530, stddev: 0.003250 },
                ReferencePoint { size: 100_000, mean: 0.446888, stddev: 0.021328 },
            ],
        )
    }

    /// Look up a builtin dataset by name (case-insensitive).
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "c" | "native" => Some(Self::native_c()),
            "python" | "py" => Some(Self::interpreted_python()),
            _ => None,
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &["c", "python"]
    }

    pub fn lookup(&self, size: usize) -> Option<&ReferencePoint> {
        self.points.iter().find(|p| p.size == size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_is_case_insensitive() {
        assert_eq!(ReferenceDataset::builtin("C").unwrap().name, "C");
        assert_eq!(ReferenceDataset::builtin("python").unwrap().name, "Python");
        assert!(ReferenceDataset::builtin("fortran").is_none());
    }

    #[test]
    fn native_dataset_covers_default_sizes() {
        let c = ReferenceDataset::native_c();
        for size in [1_000, 10_000, 100_000] {
            assert!(c.lookup(size).is_some(), "missing {}", size);
        }
        assert!(c.lookup(5).is_none());
    }
}
