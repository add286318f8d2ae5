//! Shared utilities for the cleaning and scoring pipeline.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use crate::config::thresholds::SENTINEL_NULLS;
use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

// =============================================================================
// String Utilities
// =============================================================================

/// Check if a raw cell is one of the sentinel null strings.
///
/// The match is exact and case-sensitive: `"Null"` and `" null "` are data.
///
/// # Example
///
/// ```rust,ignore
/// use data_insight::utils::is_sentinel_null;
///
/// assert!(is_sentinel_null("NULL"));
/// assert!(is_sentinel_null(""));
/// assert!(!is_sentinel_null("Null"));
/// ```
#[inline]
pub fn is_sentinel_null(value: &str) -> bool {
    SENTINEL_NULLS.contains(&value)
}

/// Normalize a column header: trim, lower-case, spaces to underscores.
///
/// # Example
///
/// ```rust,ignore
/// use data_insight::utils::normalize_column_name;
///
/// assert_eq!(normalize_column_name("  Unit Price "), "unit_price");
/// ```
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Try to parse a text cell as a floating point number.
///
/// Only surrounding whitespace is tolerated; currency symbols or thousands
/// separators make the cell textual.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

// =============================================================================
// Series Utilities
// =============================================================================

/// Count missing cells: nulls, plus NaN in float columns.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    let nulls = series.null_count();
    if !is_float_dtype(series.dtype()) {
        return Ok(nulls);
    }

    let nan = series
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .filter(|v| v.is_some_and(f64::is_nan))
        .count();
    Ok(nulls + nan)
}

/// Materialize a numeric Series as `Option<f64>` values.
///
/// NaN is reported as `None` so every statistic treats it as missing.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64)?;
    Ok(cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Materialize a textual Series as owned `Option<String>` values.
pub fn text_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let cast = series.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Calculate the mode (most frequent value) of text values.
///
/// Ties are broken by picking the lexically smallest candidate so the result
/// never depends on row order.
pub fn string_mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut value_counts: HashMap<&str, usize> = HashMap::new();
    for val in values {
        *value_counts.entry(val).or_insert(0) += 1;
    }

    value_counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            // Higher count wins; on equal counts the smaller string wins.
            a_count.cmp(b_count).then_with(|| b_val.cmp(a_val))
        })
        .map(|(val, _)| val.to_string())
}

/// Fill null values in a numeric Series with a specific value.
pub fn fill_numeric_nulls(values: &[Option<f64>], fill_value: f64) -> Vec<f64> {
    values.iter().map(|v| v.unwrap_or(fill_value)).collect()
}

/// Fill null values in a text column with a specific value.
pub fn fill_string_nulls(values: Vec<Option<String>>, fill_value: &str) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.unwrap_or_else(|| fill_value.to_string()))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
