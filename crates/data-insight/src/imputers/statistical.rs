//! Statistical imputation methods.
//!
//! Median fill for numeric columns and mode fill for textual columns.

use crate::error::Result;
use crate::profiler::statistics;
use crate::utils::{fill_numeric_nulls, fill_string_nulls, numeric_values, string_mode, text_values};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Apply median imputation for a numeric column.
    ///
    /// Returns `false` without touching the column when it holds no values
    /// to take a median from.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<bool> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let values = numeric_values(&series)?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();

        let Some(median_val) = statistics::median(&present) else {
            return Ok(false);
        };

        let missing = values.len() - present.len();
        if missing > 0 {
            let filled = fill_numeric_nulls(&values, median_val);
            df.replace(col_name, Series::new(col_name.into(), filled))?;

            debug!("Filled {} nulls in '{}' with median {}", missing, col_name, median_val);
            processing_steps.push(format!(
                "Filled {} missing values in '{}' with median: {:.2}",
                missing, col_name, median_val
            ));
        }

        Ok(true)
    }

    /// Apply mode imputation for a textual column.
    ///
    /// Ties between equally frequent values go to the lexically smallest.
    /// Returns `false` when the column holds no values.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<bool> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let values = text_values(&series)?;

        let Some(mode_val) = string_mode(values.iter().flatten().map(String::as_str)) else {
            return Ok(false);
        };

        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing > 0 {
            let filled = fill_string_nulls(values, &mode_val);
            df.replace(col_name, Series::new(col_name.into(), filled))?;

            debug!("Filled {} nulls in '{}' with mode '{}'", missing, col_name, mode_val);
            processing_steps.push(format!(
                "Filled {} missing values in '{}' with mode: '{}'",
                missing, col_name, mode_val
            ));
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_imputation() {
        let mut df = df!["age" => [Some(30.0), None, Some(40.0), Some(35.0)]].unwrap();
        let mut steps = Vec::new();

        let filled = StatisticalImputer::apply_numeric_median(&mut df, "age", &mut steps).unwrap();
        assert!(filled);
        assert_eq!(steps.len(), 1);

        let values: Vec<Option<f64>> = df.column("age").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(30.0), Some(35.0), Some(40.0), Some(35.0)]);
    }

    #[test]
    fn test_median_imputation_degenerate_column() {
        let mut df = df!["x" => [None::<f64>, None]].unwrap();
        let mut steps = Vec::new();

        let filled = StatisticalImputer::apply_numeric_median(&mut df, "x", &mut steps).unwrap();
        assert!(!filled);
        assert!(steps.is_empty());
        assert_eq!(df.column("x").unwrap().null_count(), 2);
    }

    #[test]
    fn test_median_imputation_nothing_missing() {
        let mut df = df!["x" => [1.0, 2.0]].unwrap();
        let mut steps = Vec::new();

        assert!(StatisticalImputer::apply_numeric_median(&mut df, "x", &mut steps).unwrap());
        assert!(steps.is_empty());
    }

    #[test]
    fn test_mode_imputation() {
        let mut df = df!["city" => [Some("boston"), None, Some("chicago"), Some("boston")]].unwrap();
        let mut steps = Vec::new();

        assert!(StatisticalImputer::apply_mode_imputation(&mut df, "city", &mut steps).unwrap());
        let values = text_values(df.column("city").unwrap().as_materialized_series()).unwrap();
        assert_eq!(values[1].as_deref(), Some("boston"));
        assert_eq!(df.column("city").unwrap().null_count(), 0);
    }

    #[test]
    fn test_mode_imputation_tie() {
        let mut df = df!["c" => [Some("pear"), Some("apple"), None]].unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::apply_mode_imputation(&mut df, "c", &mut steps).unwrap();
        let values = text_values(df.column("c").unwrap().as_materialized_series()).unwrap();
        assert_eq!(values[2].as_deref(), Some("apple"));
    }
}
