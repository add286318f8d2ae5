//! Report generation module.
//!
//! This module turns a finished run into chart data, a JSON report, and an
//! exported copy of the cleaned table.
//!
//! # Example
//!
//! ```rust,ignore
//! use data_insight::reporting::{ReportGenerator, ReportParams};
//!
//! let report = ReportGenerator::build_report(ReportParams {
//!     input_name: "data/customers.csv",
//!     output_file: None,
//!     cleaned: &result.cleaned,
//!     original_summary: &result.original_summary,
//!     cleaned_summary: &result.cleaned_summary,
//!     score: &result.score,
//!     cleaning_actions: &result.cleaning_actions,
//!     duration_ms: result.duration_ms,
//! })?;
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or write to file
//! let generator = ReportGenerator::new(PathBuf::from("output"), None);
//! generator.write_report_to_file(&report, "customers")?;
//! ```

mod charts;
mod generator;

pub use charts::{
    BoxPlotChart, CategoryChart, CategoryCount, ChartPanel, HeatmapChart, HistogramBin,
    HistogramChart, Visualizer,
};
pub use generator::{InsightReport, MissingValueRow, ReportGenerator, ReportParams, SummaryTable};
