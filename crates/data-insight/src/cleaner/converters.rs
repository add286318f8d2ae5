//! Type conversion functions for data cleaning.

use crate::error::Result;
use crate::types::{ColumnKind, ColumnSchema};
use crate::utils::{parse_numeric_string, text_values};
use polars::prelude::*;
use tracing::debug;

/// Convert a string series to Float64 when every non-null value parses.
///
/// Returns `None` when the column holds no values at all or when any value
/// is not a number, leaving the column textual.
pub(crate) fn string_to_numeric(series: &Series) -> Result<Option<Series>> {
    let values = text_values(series)?;
    if values.iter().all(Option::is_none) {
        return Ok(None);
    }

    let mut result_vec: Vec<Option<f64>> = Vec::with_capacity(values.len());
    for opt_val in &values {
        match opt_val {
            Some(val) => match parse_numeric_string(val) {
                Some(parsed) => result_vec.push(Some(parsed)),
                None => return Ok(None),
            },
            None => result_vec.push(None),
        }
    }

    Ok(Some(Series::new(series.name().clone(), result_vec)))
}

/// Decide each column's kind once and bring its storage in line.
///
/// Numeric columns become Float64 so repaired values (medians, fences)
/// keep their precision. A string column is converted to numeric only when
/// it is listed in `sentinel_columns` and every remaining value is a
/// number; all other text stays textual as plain strings.
pub(crate) fn resolve_column_kinds(
    df: DataFrame,
    sentinel_columns: &[String],
) -> Result<(DataFrame, Vec<ColumnSchema>, Vec<String>)> {
    let mut df = df;
    let mut schema = Vec::with_capacity(df.width());
    let mut notes = Vec::new();

    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    for col_name in column_names {
        let series = df.column(&col_name)?.as_materialized_series().clone();

        let kind = match ColumnKind::of(series.dtype()) {
            ColumnKind::Numeric => {
                if series.dtype() != &DataType::Float64 {
                    df.replace(&col_name, series.cast(&DataType::Float64)?)?;
                }
                ColumnKind::Numeric
            }
            ColumnKind::Textual => match contaminated_numeric(&series, &col_name, sentinel_columns)? {
                Some(converted) => {
                    df.replace(&col_name, converted)?;
                    debug!("Converted '{}' from text to numeric", col_name);
                    notes.push(format!("Converted '{}' from text to numeric", col_name));
                    ColumnKind::Numeric
                }
                None => {
                    if series.dtype() != &DataType::String {
                        df.replace(&col_name, series.cast(&DataType::String)?)?;
                    }
                    ColumnKind::Textual
                }
            },
            ColumnKind::Other => ColumnKind::Other,
        };

        schema.push(ColumnSchema {
            name: col_name,
            kind,
        });
    }

    Ok((df, schema, notes))
}

fn contaminated_numeric(
    series: &Series,
    col_name: &str,
    sentinel_columns: &[String],
) -> Result<Option<Series>> {
    if !sentinel_columns.iter().any(|c| c == col_name) {
        return Ok(None);
    }
    string_to_numeric(series)
}
