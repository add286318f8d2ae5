//! Configuration types for the cleaning and scoring pipeline.
//!
//! Cleaning and scoring thresholds are fixed constants (see [`thresholds`]);
//! [`PipelineConfig`] only covers naming policy and the I/O performed by the
//! collaborators around the core.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fixed constants used by the cleaner and the insight scorer.
pub mod thresholds {
    /// Literal strings treated as missing values (exact, case-sensitive).
    pub const SENTINEL_NULLS: [&str; 5] = ["None", "none", "null", "NULL", ""];

    /// Tukey fence multiplier applied to the interquartile range.
    pub const TUKEY_MULTIPLIER: f64 = 1.5;

    /// Lower quartile used for the fences.
    pub const LOWER_QUARTILE: f64 = 0.25;

    /// Upper quartile used for the fences.
    pub const UPPER_QUARTILE: f64 = 0.75;

    /// Score every dataset starts from.
    pub const START_SCORE: i32 = 100;

    /// Missing percentage a column must exceed to trigger the missingness rule.
    pub const MISSING_PERCENT_THRESHOLD: f64 = 20.0;

    /// Penalty for the missingness rule.
    pub const MISSING_PENALTY: u32 = 15;

    /// Penalty for the duplicate-row rule.
    pub const DUPLICATE_PENALTY: u32 = 10;

    /// Absolute skewness a numeric column must exceed to be reported.
    pub const SKEWNESS_THRESHOLD: f64 = 1.0;

    /// Absolute correlation a pair must exceed to trigger the correlation rule.
    pub const CORRELATION_THRESHOLD: f64 = 0.8;

    /// Penalty for the correlation rule.
    pub const CORRELATION_PENALTY: u32 = 10;

    /// Number of categories shown per textual column.
    pub const TOP_CATEGORY_LIMIT: usize = 10;
}

/// What to do when two input column names normalize to the same string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NameCollisionPolicy {
    /// Keep the first column, rename later ones `name_2`, `name_3`, ...
    #[default]
    Suffix,
    /// Refuse to clean the table.
    Fail,
}

/// Configuration for the pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use data_insight::config::{NameCollisionPolicy, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .name_collision(NameCollisionPolicy::Fail)
///     .output_dir("reports")
///     .save_to_disk(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Policy for column names that collide after normalization.
    /// Default: Suffix
    pub name_collision: NameCollisionPolicy,

    /// Output directory for reports and the cleaned table.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Custom output file stem (without extension).
    /// If None, uses "cleaned_dataset".
    /// Default: None
    pub output_name: Option<String>,

    /// Whether to write anything to disk.
    /// When false, results are kept in memory only.
    /// Default: false
    pub save_to_disk: bool,

    /// Whether to export the cleaned table as delimited text.
    /// Only honored when `save_to_disk` is true.
    /// Default: true
    pub export_cleaned: bool,

    /// Whether to build the insight report.
    /// Default: true
    pub generate_reports: bool,

    /// Field separator for reading and exporting delimited text.
    /// Default: b','
    pub csv_separator: u8,

    /// Number of rows the CSV reader inspects to infer column types.
    /// Default: 100
    pub infer_schema_length: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name_collision: NameCollisionPolicy::default(),
            output_dir: PathBuf::from("output"),
            output_name: None,
            save_to_disk: false,
            export_cleaned: true,
            generate_reports: true,
            csv_separator: b',',
            infer_schema_length: 100,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// File stem used for exported artifacts.
    pub fn output_stem(&self) -> &str {
        self.output_name.as_deref().unwrap_or("cleaned_dataset")
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.csv_separator.is_ascii()
            || matches!(self.csv_separator, b'"' | b'\n' | b'\r')
        {
            return Err(ConfigValidationError::InvalidSeparator(
                self.csv_separator as char,
            ));
        }

        if self.infer_schema_length == 0 {
            return Err(ConfigValidationError::InvalidSchemaLength(
                self.infer_schema_length,
            ));
        }

        if let Some(name) = &self.output_name
            && (name.trim().is_empty() || name.contains(['/', '\\']))
        {
            return Err(ConfigValidationError::InvalidOutputName(name.clone()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid separator {0:?} (must be ASCII and not a quote or line break)")]
    InvalidSeparator(char),

    #[error("Invalid schema inference length: {0} (must be at least 1)")]
    InvalidSchemaLength(usize),

    #[error("Invalid output name: '{0}' (must be a non-empty file stem)")]
    InvalidOutputName(String),
}

impl From<ConfigValidationError> for crate::error::InsightError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::InsightError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    name_collision: Option<NameCollisionPolicy>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    save_to_disk: Option<bool>,
    export_cleaned: Option<bool>,
    generate_reports: Option<bool>,
    csv_separator: Option<u8>,
    infer_schema_length: Option<usize>,
}

impl PipelineConfigBuilder {
    /// Set the policy for column names that collide after normalization.
    pub fn name_collision(mut self, policy: NameCollisionPolicy) -> Self {
        self.name_collision = Some(policy);
        self
    }

    /// Set the output directory for reports and the cleaned table.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set a custom output file stem (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Enable or disable writing artifacts to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Enable or disable exporting the cleaned table.
    pub fn export_cleaned(mut self, export: bool) -> Self {
        self.export_cleaned = Some(export);
        self
    }

    /// Enable or disable report generation.
    pub fn generate_reports(mut self, generate: bool) -> Self {
        self.generate_reports = Some(generate);
        self
    }

    /// Set the field separator for delimited text.
    pub fn csv_separator(mut self, separator: u8) -> Self {
        self.csv_separator = Some(separator);
        self
    }

    /// Set how many rows the CSV reader inspects to infer types.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            name_collision: self.name_collision.unwrap_or_default(),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            output_name: self.output_name,
            save_to_disk: self.save_to_disk.unwrap_or(defaults.save_to_disk),
            export_cleaned: self.export_cleaned.unwrap_or(defaults.export_cleaned),
            generate_reports: self.generate_reports.unwrap_or(defaults.generate_reports),
            csv_separator: self.csv_separator.unwrap_or(defaults.csv_separator),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
        };

        config.validate()?;
        Ok(config)
    }
}
