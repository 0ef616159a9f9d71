//! Configuration file parsing for `heapbench.toml`.
//!
//! Searches current directory then ancestors, falling back to
//! `~/.config/heapbench/heapbench.toml` if no project-level file is found.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use heapbench_core::harness::DEFAULT_REPETITIONS;
use heapbench_core::{BenchmarkConfig, ReferenceDataset, ReferencePoint, SizeClass};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

pub const CONFIG_FILE: &str = "heapbench.toml";

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct HeapbenchConfig {
    #[serde(default)]
    pub benchmark: BenchmarkSection,
    #[serde(default)]
    pub reference: ReferenceSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BenchmarkSection {
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,
    pub seed: Option<u64>,
    /// Empty means the built-in small/medium/large classes.
    #[serde(default)]
    pub sizes: Vec<SizeEntry>,
}

impl Default for BenchmarkSection {
    fn default() -> Self {
        BenchmarkSection {
            repetitions: DEFAULT_REPETITIONS,
            seed: None,
            sizes: Vec::new(),
        }
    }
}

fn default_repetitions() -> usize {
    DEFAULT_REPETITIONS
}

/// Sizes are signed here so a negative value is reported as such rather
/// than as a TOML type error.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SizeEntry {
    pub label: Option<String>,
    pub size: i64,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct ReferenceSection {
    /// Built-in dataset name (`c` or `python`). Ignored when `points` is set.
    pub dataset: Option<String>,
    /// Display name for inline points.
    pub name: Option<String>,
    #[serde(default)]
    pub points: Vec<ReferencePoint>,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,
    pub charts_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl HeapbenchConfig {
    /// Load config from `heapbench.toml`, searching current dir then parents.
    /// Returns `Default` when no file is found.
    pub fn load() -> Result<Self, CliError> {
        match Self::find() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CliError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    fn find() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }
            if !dir.pop() {
                break;
            }
        }
        let home = std::env::var("HOME").ok().map(PathBuf::from)?;
        let global = home.join(".config").join("heapbench").join(CONFIG_FILE);
        global.exists().then_some(global)
    }

    /// Parse a TOML string directly.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Validated benchmark settings. Negative sizes fail here, before any
    /// array is allocated.
    pub fn benchmark_config(&self) -> Result<BenchmarkConfig, CliError> {
        let size_classes = if self.benchmark.sizes.is_empty() {
            SizeClass::defaults()
        } else {
            self.benchmark
                .sizes
                .iter()
                .map(|entry| {
                    let label = entry
                        .label
                        .clone()
                        .unwrap_or_else(|| entry.size.to_string());
                    SizeClass::from_signed(label, entry.size)
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let config = BenchmarkConfig {
            size_classes,
            repetitions: self.benchmark.repetitions,
            seed: self.benchmark.seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Inline points win over the dataset name; no setting means native C.
    pub fn reference_dataset(&self) -> Result<ReferenceDataset, CliError> {
        let section = &self.reference;
        if !section.points.is_empty() {
            let name = section.name.clone().unwrap_or_else(|| "reference".to_string());
            return Ok(ReferenceDataset::new(name, section.points.clone()));
        }
        resolve_reference(section.dataset.as_deref().unwrap_or("c"))
    }

    /// Default `heapbench.toml` written by `heapbench init`.
    pub fn default_template() -> &'static str {
        r#"# heapbench configuration

[benchmark]
repetitions = 30
# seed = 42

[[benchmark.sizes]]
label = "small"
size = 1000

[[benchmark.sizes]]
label = "medium"
size = 10000

[[benchmark.sizes]]
label = "large"
size = 100000

[reference]
# Built-in timings to compare against: "c" or "python"
dataset = "c"

# Or supply your own (seconds):
# name = "my-build"
# [[reference.points]]
# size = 1000
# mean = 0.000167
# stddev = 0.000373

[output]
format = "text"
# charts_dir = "charts"
"#
    }
}

pub fn resolve_reference(name: &str) -> Result<ReferenceDataset, CliError> {
    ReferenceDataset::builtin(name).ok_or_else(|| CliError::UnknownReference {
        name: name.to_string(),
        expected: ReferenceDataset::builtin_names().join(", "),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
