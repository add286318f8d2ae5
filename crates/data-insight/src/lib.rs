//! Data Insight Library
//!
//! Automatic table cleaning and rule-based quality scoring built with Rust
//! and Polars.
//!
//! # Overview
//!
//! - **Cleaning**: column-name normalization, sentinel null strings,
//!   duplicate rows, empty columns, infinities, median/mode imputation and
//!   Tukey outlier capping, in one fixed order
//! - **Scoring**: a 0-100 score with findings for missingness, duplicates,
//!   skewness and correlation
//! - **Collaborators**: file loading (delimited text, spreadsheets, Parquet),
//!   summaries, chart data, JSON reports and CSV export
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_insight::{clean, score};
//! use data_insight::loader::{LoaderOptions, load_table};
//!
//! let raw = load_table("data.csv", &LoaderOptions::default())?;
//! let cleaned = clean(&raw)?;
//! let result = score(&cleaned)?;
//!
//! println!("score: {}", result.score);
//! for finding in &result.findings {
//!     println!("  {}", finding.message);
//! }
//! ```
//!
//! # Pipeline
//!
//! [`Pipeline`] runs clean, summarize, score and report in one call and can
//! write the cleaned table and report to disk:
//!
//! ```rust,ignore
//! use data_insight::{Pipeline, PipelineConfig, NameCollisionPolicy};
//!
//! let config = PipelineConfig::builder()
//!     .name_collision(NameCollisionPolicy::Fail)
//!     .output_dir("results")
//!     .save_to_disk(true)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .build()?
//!     .process(&raw)?;
//!
//! println!("{} -> {} rows", result.original_summary.rows, result.cleaned_summary.rows);
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, clean};
pub use config::{ConfigValidationError, NameCollisionPolicy, PipelineConfig, PipelineConfigBuilder};
pub use error::{InsightError, Result as InsightResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use pipeline::{OutlierHandler, Pipeline, PipelineBuilder};
pub use profiler::DataProfiler;
pub use quality::{InsightScorer, score};
pub use reporting::{
    ChartPanel, InsightReport, ReportGenerator, ReportParams, SummaryTable, Visualizer,
};
pub use types::{
    ColumnKind, ColumnSchema, ColumnSummary, CorrelationMatrix, DatasetSummary, Finding,
    FindingKind, PipelineResult, ScoreResult,
};

// The core is stateless and safe to share across threads.
static_assertions::assert_impl_all!(DataCleaner: Send, Sync);
static_assertions::assert_impl_all!(InsightScorer: Send, Sync);
static_assertions::assert_impl_all!(DataProfiler: Send, Sync);
static_assertions::assert_impl_all!(Visualizer: Send, Sync);
