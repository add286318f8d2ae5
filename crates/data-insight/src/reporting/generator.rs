use crate::error::{InsightError, Result, ResultExt};
use crate::reporting::charts::{ChartPanel, Visualizer};
use crate::types::{DatasetSummary, Finding, ScoreResult};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Report aggregating everything one cleaning and scoring run produced.
///
/// Used for JSON output to stdout (`--json`), the report file
/// (`--emit-report`), and programmatic access in library mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Name of the input (file path or caller-supplied label)
    pub input_name: String,
    /// Path to the exported cleaned table, if written
    pub output_file: Option<String>,
    /// Wall-clock time of the run in milliseconds
    pub duration_ms: u64,

    // Tables
    /// Shape of the raw table
    pub original_summary: SummaryTable,
    /// Shape of the cleaned table
    pub cleaned_summary: SummaryTable,
    /// Missing counts of the raw table, only columns with at least one
    pub missing_values: Vec<MissingValueRow>,

    // Score
    pub quality_score: u8,
    pub findings: Vec<Finding>,

    // Charts and log
    pub charts: Vec<ChartPanel>,
    pub cleaning_actions: Vec<String>,
}

/// Row/column/duplicate counts of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub total_rows: usize,
    pub total_columns: usize,
    pub duplicate_rows: usize,
    pub missing_cells: usize,
}

impl From<&DatasetSummary> for SummaryTable {
    fn from(summary: &DatasetSummary) -> Self {
        Self {
            total_rows: summary.rows,
            total_columns: summary.columns,
            duplicate_rows: summary.duplicate_count,
            missing_cells: summary.total_missing(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueRow {
    pub column: String,
    pub missing_count: usize,
    pub missing_percent: f64,
}

/// Inputs for [`ReportGenerator::build_report`].
pub struct ReportParams<'a> {
    pub input_name: &'a str,
    pub output_file: Option<&'a Path>,
    pub cleaned: &'a DataFrame,
    pub original_summary: &'a DatasetSummary,
    pub cleaned_summary: &'a DatasetSummary,
    pub score: &'a ScoreResult,
    pub cleaning_actions: &'a [String],
    pub duration_ms: u64,
}

// ============================================================================
// Generator
// ============================================================================

pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
    separator: u8,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            output_name: None,
            separator: b',',
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
            ..Self::default()
        }
    }

    /// Use a different field separator for exported tables.
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Build a report from a finished run.
    ///
    /// The report is a plain value; nothing is written until
    /// [`Self::write_report_to_file`] is called.
    pub fn build_report(params: ReportParams<'_>) -> Result<InsightReport> {
        let ReportParams {
            input_name,
            output_file,
            cleaned,
            original_summary,
            cleaned_summary,
            score,
            cleaning_actions,
            duration_ms,
        } = params;

        let rows = original_summary.rows.max(1) as f64;
        let missing_values = original_summary
            .columns_with_missing()
            .map(|col| MissingValueRow {
                column: col.name.clone(),
                missing_count: col.missing_count,
                missing_percent: col.missing_count as f64 / rows * 100.0,
            })
            .collect();

        let charts = Visualizer::panels(cleaned).context("Failed to build chart panels")?;

        Ok(InsightReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_name: input_name.to_string(),
            output_file: output_file.map(|p| p.display().to_string()),
            duration_ms,
            original_summary: SummaryTable::from(original_summary),
            cleaned_summary: SummaryTable::from(cleaned_summary),
            missing_values,
            quality_score: score.score,
            findings: score.findings.clone(),
            charts,
            cleaning_actions: cleaning_actions.to_vec(),
        })
    }

    /// Write a report to `<stem>_report.json` in the output directory.
    ///
    /// The stem is the configured output name, or `report_base_name` when
    /// none was set.
    pub fn write_report_to_file(
        &self,
        report: &InsightReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let stem = self.output_name.as_deref().unwrap_or(report_base_name);
        let report_path = self.output_dir.join(format!("{}_report.json", stem));
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| InsightError::ReportGenerationFailed(e.to_string()))?;

        let mut file = File::create(&report_path)?;
        file.write_all(json.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }

    /// Write the cleaned table as delimited text with a header row.
    pub fn export_cleaned_csv(&self, df: &DataFrame, file_stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let stem = self.output_name.as_deref().unwrap_or(file_stem);
        let output_path = self.output_dir.join(format!("{}.csv", stem));
        let mut file = File::create(&output_path)?;

        let mut df = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(self.separator)
            .with_quote_char(b'"')
            .finish(&mut df)
            .context(format!("Failed to write {}", output_path.display()))?;

        info!("Dataset saved: {}", output_path.display());
        Ok(output_path)
    }
}
