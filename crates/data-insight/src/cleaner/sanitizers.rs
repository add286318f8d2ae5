//! Data sanitization functions for cleaning names and values.

use crate::config::NameCollisionPolicy;
use crate::error::{InsightError, Result};
use crate::types::{ColumnKind, ColumnSchema};
use crate::utils::{is_sentinel_null, normalize_column_name, numeric_values, text_values};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Normalize every column name and resolve collisions per `policy`.
///
/// Returns the renamed frame and a note for each column whose name was
/// suffixed to stay unique.
pub(crate) fn normalize_column_names(
    df: DataFrame,
    policy: NameCollisionPolicy,
) -> Result<(DataFrame, Vec<String>)> {
    let original: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    let normalized: Vec<String> = original
        .iter()
        .map(|name| normalize_column_name(name))
        .collect();

    let (resolved, notes) = resolve_collisions(&original, &normalized, policy)?;

    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .zip(&resolved)
        .map(|(col, name)| {
            col.as_materialized_series()
                .clone()
                .with_name(name.as_str().into())
                .into_column()
        })
        .collect();

    debug!("Normalized {} column names", columns.len());
    Ok((DataFrame::new(columns)?, notes))
}

/// Make normalized names unique.
///
/// The first column keeps a contested name; later ones get the smallest
/// `_N` suffix (N >= 2) not used by any other column.
fn resolve_collisions(
    original: &[String],
    normalized: &[String],
    policy: NameCollisionPolicy,
) -> Result<(Vec<String>, Vec<String>)> {
    let all_names: HashSet<&str> = normalized.iter().map(String::as_str).collect();
    let mut assigned: HashSet<String> = HashSet::with_capacity(normalized.len());
    let mut resolved = Vec::with_capacity(normalized.len());
    let mut notes = Vec::new();

    for (idx, name) in normalized.iter().enumerate() {
        if !assigned.contains(name) {
            assigned.insert(name.clone());
            resolved.push(name.clone());
            continue;
        }

        if policy == NameCollisionPolicy::Fail {
            let columns = original
                .iter()
                .zip(normalized)
                .filter(|(_, n)| *n == name)
                .map(|(o, _)| o.clone())
                .collect();
            return Err(InsightError::ColumnNameCollision {
                name: name.clone(),
                columns,
            });
        }

        let mut suffix = 2;
        let candidate = loop {
            let candidate = format!("{}_{}", name, suffix);
            if !all_names.contains(candidate.as_str()) && !assigned.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };

        warn!(
            "Column '{}' normalizes to existing name '{}', renamed to '{}'",
            original[idx], name, candidate
        );
        notes.push(format!(
            "Renamed column '{}' to '{}' to avoid a name collision",
            original[idx], candidate
        ));
        assigned.insert(candidate.clone());
        resolved.push(candidate);
    }

    Ok((resolved, notes))
}

/// Replace sentinel null strings with real nulls in every textual column.
///
/// Categorical columns are cast to plain strings on the way. Returns the
/// replacement count for each column that had at least one sentinel, in
/// column order.
pub(crate) fn replace_sentinel_nulls(df: DataFrame) -> Result<(DataFrame, Vec<(String, usize)>)> {
    let mut df = df;
    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut replaced_per_column = Vec::new();

    for col_name in &column_names {
        let series = df.column(col_name)?.as_materialized_series().clone();
        if ColumnKind::of(series.dtype()) != ColumnKind::Textual {
            continue;
        }

        let values = text_values(&series)?;
        let mut replaced = 0;
        let cleaned: Vec<Option<String>> = values
            .into_iter()
            .map(|v| match v {
                Some(val) if is_sentinel_null(&val) => {
                    replaced += 1;
                    None
                }
                other => other,
            })
            .collect();

        df.replace(col_name, Series::new(col_name.as_str().into(), cleaned))?;
        if replaced > 0 {
            debug!("Replaced {} sentinel values in '{}'", replaced, col_name);
            replaced_per_column.push((col_name.clone(), replaced));
        }
    }

    Ok((df, replaced_per_column))
}

/// Replace infinities (and NaN) in numeric columns with nulls.
///
/// Returns the number of cells replaced.
pub(crate) fn replace_non_finite(df: &mut DataFrame, schema: &[ColumnSchema]) -> Result<usize> {
    let mut total = 0;

    for col in schema.iter().filter(|c| c.kind == ColumnKind::Numeric) {
        let series = df.column(&col.name)?.as_materialized_series().clone();
        let raw = series.cast(&DataType::Float64)?;
        let non_finite = raw
            .f64()?
            .into_iter()
            .filter(|v| v.is_some_and(|x| !x.is_finite()))
            .count();

        if non_finite == 0 {
            continue;
        }

        // numeric_values already maps NaN to None; infinities are handled here.
        let finite: Vec<Option<f64>> = numeric_values(&series)?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();

        df.replace(&col.name, Series::new(col.name.as_str().into(), finite))?;
        total += non_finite;
    }

    Ok(total)
}

/// Trim and lower-case every value of a textual column.
///
/// Values that become empty or a sentinel after canonicalization become
/// null, so a second cleaning pass finds nothing left to replace.
pub(crate) fn canonicalize_text_column(df: &mut DataFrame, col_name: &str) -> Result<usize> {
    let series = df.column(col_name)?.as_materialized_series().clone();
    let values = text_values(&series)?;

    let mut changed = 0;
    let canonical: Vec<Option<String>> = values
        .into_iter()
        .map(|v| {
            v.and_then(|val| {
                let canon = val.trim().to_lowercase();
                if canon != val {
                    changed += 1;
                }
                (!is_sentinel_null(&canon)).then_some(canon)
            })
        })
        .collect();

    df.replace(col_name, Series::new(col_name.into(), canonical))?;
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    // ==================== normalize_column_names tests ====================

    #[test]
    fn test_normalize_column_names() {
        let df = df![
            "Name " => ["a"],
            " Age" => [1],
            "Unit Price" => [2.5],
        ]
        .unwrap();

        let (df, notes) = normalize_column_names(df, NameCollisionPolicy::Suffix).unwrap();
        assert_eq!(names(&df), vec!["name", "age", "unit_price"]);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_collision_suffix() {
        let df = df![
            "Age" => [1],
            " age" => [2],
            "AGE " => [3],
        ]
        .unwrap();

        let (df, notes) = normalize_column_names(df, NameCollisionPolicy::Suffix).unwrap();
        assert_eq!(names(&df), vec!["age", "age_2", "age_3"]);
        assert_eq!(notes.len(), 2);
        // Data stays attached to its column
        assert_eq!(
            df.column("age_2").unwrap().get(0).unwrap().try_extract::<i32>().unwrap(),
            2
        );
    }

    #[test]
    fn test_collision_suffix_skips_taken_names() {
        let df = df![
            "a" => [1],
            "A" => [2],
            "a_2" => [3],
        ]
        .unwrap();

        let (df, _) = normalize_column_names(df, NameCollisionPolicy::Suffix).unwrap();
        assert_eq!(names(&df), vec!["a", "a_3", "a_2"]);
    }

    #[test]
    fn test_collision_fail() {
        let df = df![
            "City" => ["x"],
            "city " => ["y"],
        ]
        .unwrap();

        let err = normalize_column_names(df, NameCollisionPolicy::Fail).unwrap_err();
        match err {
            InsightError::ColumnNameCollision { name, columns } => {
                assert_eq!(name, "city");
                assert_eq!(columns, vec!["City".to_string(), "city ".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // ==================== replace_sentinel_nulls tests ====================

    #[test]
    fn test_replace_sentinel_nulls_exact_match() {
        let df = df![
            "t" => ["None", "none", "null", "NULL", "", "Null", " null", "ok"],
        ]
        .unwrap();

        let (df, replaced) = replace_sentinel_nulls(df).unwrap();
        assert_eq!(replaced, vec![("t".to_string(), 5)]);

        let col = df.column("t").unwrap();
        assert_eq!(col.null_count(), 5);
        let values = text_values(col.as_materialized_series()).unwrap();
        assert_eq!(values[5].as_deref(), Some("Null"));
        assert_eq!(values[6].as_deref(), Some(" null"));
        assert_eq!(values[7].as_deref(), Some("ok"));
    }

    #[test]
    fn test_replace_sentinel_nulls_ignores_numeric() {
        let df = df!["n" => [Some(1.0), None]].unwrap();
        let (df, replaced) = replace_sentinel_nulls(df).unwrap();
        assert!(replaced.is_empty());
        assert_eq!(df.column("n").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_replace_sentinel_nulls_reports_only_touched_columns() {
        let df = df![
            "zip" => ["02134", "02135", "02136"],
            "age" => ["25", "None", "31"],
            "city" => ["boston", "", "NULL"],
        ]
        .unwrap();

        let (_, replaced) = replace_sentinel_nulls(df).unwrap();
        assert_eq!(
            replaced,
            vec![("age".to_string(), 1), ("city".to_string(), 2)]
        );
    }

    // ==================== replace_non_finite tests ====================

    #[test]
    fn test_replace_non_finite() {
        let mut df = df![
            "v" => [1.0, f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 5.0],
        ]
        .unwrap();
        let schema = vec![ColumnSchema {
            name: "v".to_string(),
            kind: ColumnKind::Numeric,
        }];

        let count = replace_non_finite(&mut df, &schema).unwrap();
        assert_eq!(count, 3);
        assert_eq!(df.column("v").unwrap().null_count(), 3);
    }

    // ==================== canonicalize_text_column tests ====================

    #[test]
    fn test_canonicalize_text_column() {
        let mut df = df![
            "city" => [Some("  New York "), Some("boston"), Some(" NULL "), Some("   "), None],
        ]
        .unwrap();

        let changed = canonicalize_text_column(&mut df, "city").unwrap();
        assert_eq!(changed, 3);

        let values = text_values(df.column("city").unwrap().as_materialized_series()).unwrap();
        assert_eq!(
            values,
            vec![Some("new york".to_string()), Some("boston".to_string()), None, None, None]
        );
    }
}
