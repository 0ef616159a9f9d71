use std::path::PathBuf;

use heapbench_core::BenchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Bench(#[from] BenchError),
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid toml in '{}': {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid report '{}': {source}", path.display())]
    Report {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("cannot serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("unknown reference dataset '{name}' (expected one of: {expected})")]
    UnknownReference { name: String, expected: String },
    #[error("'{}' already exists, not overwriting", .0.display())]
    AlreadyExists(PathBuf),
}
