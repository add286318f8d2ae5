//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the clean, summarize, score and report workflow.

use crate::cleaner::DataCleaner;
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::{Result, ResultExt};
use crate::profiler::DataProfiler;
use crate::quality::InsightScorer;
use crate::reporting::{ReportGenerator, ReportParams};
use crate::types::PipelineResult;
use polars::prelude::*;
use std::time::Instant;
use tracing::{error, info};

/// The main cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use data_insight::{Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().save_to_disk(true).build()?)
///     .input_name("customers.csv")
///     .build()?
///     .process(&dataframe)?;
///
/// println!("score: {}", result.score.score);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    input_name: String,
    cleaner: DataCleaner,
    reporter: ReportGenerator,
}

// Pipelines are stateless between runs and may be shared across threads.
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Process a table through the pipeline.
    ///
    /// The input is never modified. Files are written only when
    /// `save_to_disk` is set.
    pub fn process(&self, df: &DataFrame) -> Result<PipelineResult> {
        self.process_internal(df).inspect_err(|e| {
            error!("Pipeline error [{}]: {}", e.error_code(), e);
        })
    }

    fn process_internal(&self, df: &DataFrame) -> Result<PipelineResult> {
        let start_time = Instant::now();

        info!("Starting cleaning pipeline...");

        // Step 1: Summarize the raw table
        info!("Step 1: Summarizing raw table...");
        let original_summary =
            DataProfiler::summarize(df).context("Failed to summarize raw table")?;

        // Step 2: Clean
        info!("Step 2: Cleaning...");
        let (cleaned, cleaning_actions) = self.cleaner.perform_cleaning(df)?;

        // Step 3: Summarize and score the cleaned table
        info!("Step 3: Scoring cleaned table...");
        let cleaned_summary =
            DataProfiler::summarize(&cleaned).context("Failed to summarize cleaned table")?;
        let score = InsightScorer::score(&cleaned)?;
        info!(
            "Quality score: {}/100 ({} findings)",
            score.score,
            score.findings.len()
        );

        // Step 4: Outputs
        let mut written_files = Vec::new();
        let output_file = if self.config.save_to_disk && self.config.export_cleaned {
            let path = self
                .reporter
                .export_cleaned_csv(&cleaned, self.config.output_stem())?;
            written_files.push(path.clone());
            Some(path)
        } else {
            None
        };

        let duration_ms = start_time.elapsed().as_millis() as u64;

        let report = if self.config.generate_reports {
            let report = ReportGenerator::build_report(ReportParams {
                input_name: &self.input_name,
                output_file: output_file.as_deref(),
                cleaned: &cleaned,
                original_summary: &original_summary,
                cleaned_summary: &cleaned_summary,
                score: &score,
                cleaning_actions: &cleaning_actions,
                duration_ms,
            })?;

            if self.config.save_to_disk {
                written_files.push(
                    self.reporter
                        .write_report_to_file(&report, self.config.output_stem())?,
                );
            }
            Some(report)
        } else {
            None
        };

        info!("Pipeline finished in {} ms", duration_ms);

        Ok(PipelineResult {
            cleaned,
            original_summary,
            cleaned_summary,
            score,
            cleaning_actions,
            duration_ms,
            report,
            written_files,
        })
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    input_name: Option<String>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Label recorded in the report as the input's name.
    pub fn input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = Some(name.into());
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        // Create report generator with config's output settings
        let reporter = ReportGenerator::new(config.output_dir.clone(), config.output_name.clone())
            .with_separator(config.csv_separator);

        Ok(Pipeline {
            cleaner: DataCleaner::new(config.name_collision),
            input_name: self.input_name.unwrap_or_else(|| "in-memory table".to_string()),
            config,
            reporter,
        })
    }
}
