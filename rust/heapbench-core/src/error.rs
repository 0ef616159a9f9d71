use thiserror::Error;

/// Errors raised while validating or running a benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BenchError {
    #[error("input size must not be negative (got {0})")]
    NegativeSize(i64),
    #[error("repetition count must be at least 1")]
    NoRepetitions,
    #[error("could not allocate an array of {size} elements")]
    Allocation { size: usize },
    #[error("benchmark configuration has no size classes")]
    EmptySuite,
}

pub type Result<T> = std::result::Result<T, BenchError>;
