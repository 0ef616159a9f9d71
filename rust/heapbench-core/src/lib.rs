//! heapbench core
//!
//! In-place heap sort plus the harness that times it over random inputs of
//! several sizes, and the math that sets those timings against a recorded
//! reference dataset.

pub mod compare;
pub mod error;
pub mod harness;
pub mod heap;
pub mod reference;
pub mod stats;

pub use compare::{compare, ComparisonRow, ScalingCheck};
pub use error::BenchError;
pub use harness::{benchmark, BenchmarkConfig, BenchmarkResult, Harness, SizeClass};
pub use heap::{heap_sort, heapify, sort};
pub use reference::{ReferenceDataset, ReferencePoint};
