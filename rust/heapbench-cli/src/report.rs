//! Benchmark report: the saved JSON document and its text/CSV renderings.

use std::path::Path;

use chrono::{DateTime, Utc};
use heapbench_core::{compare, BenchmarkResult, ComparisonRow, ReferenceDataset, ScalingCheck};
use serde::{Deserialize, Serialize};

use crate::config::OutputFormat;
use crate::error::CliError;

/// Name under which measured results appear in tables and charts.
pub const IMPLEMENTATION: &str = "Rust";

/// Chart tolerance for the N ln N check, as a factor either way.
pub const SCALING_TOLERANCE: f64 = 3.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub implementation: String,
    pub repetitions: usize,
    pub results: Vec<BenchmarkResult>,
    pub reference: ReferenceDataset,
    pub comparison: Vec<ComparisonRow>,
    pub scaling: Option<ScalingCheck>,
}

impl Report {
    pub fn new(results: Vec<BenchmarkResult>, reference: ReferenceDataset) -> Self {
        let repetitions = results.first().map_or(0, |r| r.repetitions());
        let comparison = compare(&results, &reference);
        let scaling = ScalingCheck::from_results(&results);
        Report {
            generated_at: Utc::now(),
            implementation: IMPLEMENTATION.to_string(),
            repetitions,
            results,
            reference,
            comparison,
            scaling,
        }
    }

    /// Recompute the comparison against another dataset.
    pub fn with_reference(mut self, reference: ReferenceDataset) -> Self {
        self.comparison = compare(&self.results, &reference);
        self.reference = reference;
        self
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CliError::Report {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, CliError> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Csv => self.to_csv(),
            OutputFormat::Json => self.to_json(),
        }
    }

    /// One row per size class. Fields are quoted only where a label needs
    /// it, so plain rows read as bare comma-separated values.
    pub fn to_csv(&self) -> Result<String, CliError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "size",
            "label",
            "repetitions",
            "mean_s",
            "stddev_s",
            "min_s",
            "max_s",
        ])?;
        for r in &self.results {
            writer.write_record([
                r.input_size().to_string(),
                r.label().unwrap_or("").to_string(),
                r.repetitions().to_string(),
                format!("{:.9}", r.mean()),
                format!("{:.9}", r.stddev()),
                format!("{:.9}", r.min()),
                format!("{:.9}", r.max()),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Summary table followed by the comparison against the reference and
    /// the growth check.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let title = format!(
            "Heap sort summary ({}, {} runs per size)",
            self.implementation, self.repetitions
        );
        out.push_str(&format!("{}\n", title));
        out.push_str(&format!("{}\n", "=".repeat(title.len())));
        out.push_str(&format!(
            "{:<10} | {:>9} | {:<15} | {:<20}\n",
            "Size", "N", "Mean (s)", "Std Dev (s)"
        ));
        out.push_str(&format!("{}\n", "-".repeat(63)));
        for r in &self.results {
            let label = r
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| r.input_size().to_string());
            out.push_str(&format!(
                "{:<10} | {:>9} | {:<15.6} | {:<20.6}\n",
                label,
                r.input_size(),
                r.mean(),
                r.stddev()
            ));
        }

        out.push('\n');
        out.push_str(&format!("Against {}:\n", self.reference.name));
        for row in &self.comparison {
            match (row.reference, row.speedup) {
                (Some(point), Some(speedup)) => {
                    out.push_str(&format!(
                        "  {:<10} {:.6}s vs {:.6}s  ({:.1}x)\n",
                        row.label, row.measured_mean, point.mean, speedup
                    ));
                }
                _ => {
                    out.push_str(&format!("  {:<10} no reference timing\n", row.label));
                }
            }
        }

        if let Some(check) = &self.scaling {
            let verdict = if check.within(SCALING_TOLERANCE) {
                "consistent with"
            } else {
                "NOT consistent with"
            };
            out.push_str(&format!(
                "\nGrowth {} -> {}: {:.1}x measured, {:.1}x predicted ({} N ln N)\n",
                check.smallest, check.largest, check.observed, check.expected, verdict
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        let results = vec![
            BenchmarkResult::from_samples(1_000, vec![0.0001, 0.0003])
                .unwrap()
                .with_label("small"),
            BenchmarkResult::from_samples(10_000, vec![0.002, 0.002])
                .unwrap()
                .with_label("medium"),
        ];
        Report::new(results, ReferenceDataset::native_c())
    }

    #[test]
    fn text_lists_every_size_class() {
        let text = sample_report().to_text();
        assert!(text.starts_with("Heap sort summary (Rust, 2 runs per size)"));
        assert!(text.contains("small"));
        assert!(text.contains("0.000200"));
        assert!(text.contains("Against C:"));
        assert!(text.contains("Growth 1000 -> 10000"));
    }

    #[test]
    fn csv_has_header_and_one_row_per_result() {
        let csv = sample_report().to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "size,label,repetitions,mean_s,stddev_s,min_s,max_s");
        assert!(lines[1].starts_with("1000,small,2,0.000200000,0.000100000,"));
    }

    #[test]
    fn csv_quotes_labels_containing_commas() {
        let results = vec![BenchmarkResult::from_samples(1_000, vec![0.0001, 0.0003])
            .unwrap()
            .with_label("a,b")];
        let out = Report::new(results, ReferenceDataset::native_c())
            .to_csv()
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[1].starts_with("1000,\"a,b\",2,"));

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 7);
        assert_eq!(&rows[0][1], "a,b");
    }

    #[test]
    fn json_report_reloads() {
        let report = sample_report();
        let json = report.to_json().unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.results, report.results);
        assert_eq!(back.comparison, report.comparison);
        assert_eq!(back.generated_at, report.generated_at);
    }

    #[test]
    fn switching_reference_recomputes_comparison() {
        let report = sample_report().with_reference(ReferenceDataset::interpreted_python());
        assert_eq!(report.reference.name, "Python");
        let speedup = report.comparison[0].speedup.unwrap();
        assert!((speedup - 0.003954 / 0.0002).abs() < 1e-6);
    }
}
