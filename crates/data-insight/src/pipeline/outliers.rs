//! Outlier handling module.
//!
//! Caps numeric values to the Tukey fences of their column.

use crate::config::thresholds::{LOWER_QUARTILE, TUKEY_MULTIPLIER, UPPER_QUARTILE};
use crate::error::Result;
use crate::profiler::statistics;
use crate::utils::numeric_values;
use polars::prelude::*;
use tracing::debug;

/// Handles outlier detection and treatment.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Tukey fences `(Q1 - 1.5*IQR, Q3 + 1.5*IQR)` of a numeric series.
    ///
    /// Missing values are ignored. `None` when the series has no values.
    pub fn fences(series: &Series) -> Result<Option<(f64, f64)>> {
        let present: Vec<f64> = numeric_values(series)?.into_iter().flatten().collect();
        let sorted = statistics::sorted(&present);
        Ok(statistics::tukey_fences(
            &sorted,
            LOWER_QUARTILE,
            UPPER_QUARTILE,
            TUKEY_MULTIPLIER,
        ))
    }

    /// Clamp every value of a numeric column into its Tukey fences.
    ///
    /// Fences are computed from the column as it stands, so call this after
    /// imputation. Nulls stay null. Returns how many values moved.
    pub fn cap_outliers(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let Some((lower_val, upper_val)) = Self::fences(&series)? else {
            return Ok(0);
        };

        let mut total_outliers = 0;
        let capped: Vec<Option<f64>> = numeric_values(&series)?
            .into_iter()
            .map(|v| {
                v.map(|val| {
                    if val < lower_val || val > upper_val {
                        total_outliers += 1;
                    }
                    val.clamp(lower_val, upper_val)
                })
            })
            .collect();

        if total_outliers > 0 {
            df.replace(col_name, Series::new(col_name.into(), capped))?;
            debug!(
                "Capped {} outliers in '{}' to [{}, {}]",
                total_outliers, col_name, lower_val, upper_val
            );
            processing_steps.push(format!(
                "Capped {} outliers in '{}' to [{:.2}, {:.2}]",
                total_outliers, col_name, lower_val, upper_val
            ));
        }

        Ok(total_outliers)
    }
}
