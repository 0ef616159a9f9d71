//! heapbench CLI library.
//!
//! Configuration, report rendering and chart output for the `heapbench`
//! binary.

pub mod chart;
pub mod colors;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;

pub use error::CliError;
