//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling datasets, including:
//! - Shape and duplicate-row detection
//! - Per-column missing-value counts
//! - Pairwise correlation of numeric columns
//! - The statistical helpers shared by the cleaner and the scorer

pub(crate) mod statistics;

use crate::error::Result;
use crate::types::{ColumnKind, ColumnSummary, CorrelationMatrix, DatasetSummary};
use crate::utils::{missing_count, numeric_values};
use polars::prelude::*;

/// Data profiler for analyzing dataset structure.
pub struct DataProfiler;

impl DataProfiler {
    /// Summarize a table: shape, duplicate rows, and missing values per column.
    ///
    /// The summary is a fresh snapshot; call again after the table changes.
    pub fn summarize(df: &DataFrame) -> Result<DatasetSummary> {
        let mut column_summaries = Vec::with_capacity(df.width());

        for col in df.get_columns() {
            let series = col.as_materialized_series();
            column_summaries.push(ColumnSummary {
                name: series.name().to_string(),
                kind: ColumnKind::of(series.dtype()),
                missing_count: missing_count(series)?,
            });
        }

        Ok(DatasetSummary {
            rows: df.height(),
            columns: df.width(),
            duplicate_count: Self::duplicate_count(df)?,
            column_summaries,
        })
    }

    /// Count rows that repeat an earlier row exactly.
    ///
    /// Null cells compare equal to each other, so two rows missing the same
    /// values are still duplicates.
    pub fn duplicate_count(df: &DataFrame) -> Result<usize> {
        if df.width() == 0 || df.height() < 2 {
            return Ok(0);
        }

        let unique = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        Ok(df.height() - unique.height())
    }

    /// Names of the numeric columns, in column order.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| ColumnKind::of(col.dtype()) == ColumnKind::Numeric)
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Pearson correlation between every pair of numeric columns.
    ///
    /// Each pair uses only the rows where both sides have a value.
    pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
        let columns = Self::numeric_columns(df);
        let data = columns
            .iter()
            .map(|name| numeric_values(df.column(name)?.as_materialized_series()))
            .collect::<PolarsResult<Vec<_>>>()?;

        let values = data
            .iter()
            .map(|x| data.iter().map(|y| statistics::pearson(x, y)).collect())
            .collect();

        Ok(CorrelationMatrix { columns, values })
    }
}
