//! Subcommand implementations. `main.rs` parses arguments and prints; the
//! work happens here so it can be tested without a process boundary.

use std::path::{Path, PathBuf};

use heapbench_core::{sort, Harness};
use tracing::info;

use crate::chart;
use crate::config::{resolve_reference, HeapbenchConfig, OutputFormat, SizeEntry, CONFIG_FILE};
use crate::error::CliError;
use crate::report::Report;

/// Flags for `heapbench run`. Set fields override the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub sizes: Vec<i64>,
    pub repetitions: Option<usize>,
    pub seed: Option<u64>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub charts: Option<PathBuf>,
    pub reference: Option<String>,
}

#[derive(Debug)]
pub struct RunOutput {
    pub report: Report,
    pub rendered: String,
    pub saved: Option<PathBuf>,
    pub charts: Vec<PathBuf>,
}

/// Fold command-line overrides into the file configuration.
pub fn apply_overrides(mut config: HeapbenchConfig, opts: &RunOptions) -> HeapbenchConfig {
    if !opts.sizes.is_empty() {
        config.benchmark.sizes = opts
            .sizes
            .iter()
            .map(|&size| SizeEntry { label: None, size })
            .collect();
    }
    if let Some(repetitions) = opts.repetitions {
        config.benchmark.repetitions = repetitions;
    }
    if opts.seed.is_some() {
        config.benchmark.seed = opts.seed;
    }
    if let Some(format) = opts.format {
        config.output.format = format;
    }
    if opts.charts.is_some() {
        config.output.charts_dir = opts.charts.clone();
    }
    if let Some(name) = &opts.reference {
        config.reference.dataset = Some(name.clone());
        config.reference.points.clear();
    }
    config
}

pub fn run(config: HeapbenchConfig, opts: &RunOptions) -> Result<RunOutput, CliError> {
    let config = apply_overrides(config, opts);
    let bench = config.benchmark_config()?;
    let reference = config.reference_dataset()?;

    let results = Harness::for_config(&bench).run_suite(&bench)?;
    let report = Report::new(results, reference);
    let rendered = report.render(config.output.format)?;

    let saved = match &opts.output {
        Some(path) => {
            report.save(path)?;
            info!(path = %path.display(), "report saved");
            Some(path.clone())
        }
        None => None,
    };

    let charts = match &config.output.charts_dir {
        Some(dir) => render_charts(&report, dir)?,
        None => Vec::new(),
    };

    Ok(RunOutput {
        report,
        rendered,
        saved,
        charts,
    })
}

/// Render charts from a saved report, optionally against another dataset.
pub fn plot(input: &Path, out_dir: &Path, reference: Option<&str>) -> Result<Vec<PathBuf>, CliError> {
    let mut report = Report::load(input)?;
    if let Some(name) = reference {
        report = report.with_reference(resolve_reference(name)?);
    }
    render_charts(&report, out_dir)
}

fn render_charts(report: &Report, dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    chart::write_charts(
        dir,
        &report.comparison,
        &report.implementation,
        &report.reference.name,
    )
}

pub fn sort_values(mut values: Vec<i64>) -> Vec<i64> {
    sort(&mut values);
    values
}

/// Write the default config template to `dir`, refusing to overwrite.
pub fn init(dir: &Path) -> Result<PathBuf, CliError> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        return Err(CliError::AlreadyExists(path));
    }
    std::fs::write(&path, HeapbenchConfig::default_template()).map_err(|source| {
        CliError::Write {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}
