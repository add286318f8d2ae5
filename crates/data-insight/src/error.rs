//! Custom error types for the cleaning and scoring pipeline.
//!
//! This module provides a single error hierarchy using `thiserror`.
//! Column-level pathologies (degenerate columns, unsupported types, zero
//! variance) never surface here: the core degrades gracefully and only
//! configuration, name collisions under the fail-fast policy, and I/O in
//! the collaborators produce errors.
//!
//! Errors are serializable so they can be embedded in JSON reports or sent
//! to a frontend for display.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the insight pipeline.
#[derive(Error, Debug)]
pub enum InsightError {
    /// Two or more input columns normalize to the same name and the
    /// collision policy is fail-fast.
    #[error("Columns {columns:?} all normalize to '{name}'")]
    ColumnNameCollision { name: String, columns: Vec<String> },

    /// The loader could not turn a file into a table.
    #[error("Failed to load '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// The file extension does not map to a known table format.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet reader error.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<InsightError>,
    },
}

impl InsightError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        InsightError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNameCollision { .. } => "COLUMN_NAME_COLLISION",
            Self::LoadFailed { .. } => "LOAD_FAILED",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from reading input rather than processing it.
    ///
    /// Load failures are reportable to the user ("pick another file"), while
    /// everything else indicates a bug or a misconfiguration.
    pub fn is_load_failure(&self) -> bool {
        match self {
            Self::LoadFailed { .. } | Self::UnsupportedFormat(_) | Self::Spreadsheet(_) => true,
            Self::WithContext { source, .. } => source.is_load_failure(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for InsightError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("InsightError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for insight operations.
pub type Result<T> = std::result::Result<T, InsightError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| InsightError::Polars(e).with_context(context))
    }
}
