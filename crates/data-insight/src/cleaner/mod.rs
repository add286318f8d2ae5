//! Data cleaning module for preprocessing datasets.
//!
//! This module provides functionality for:
//! - Normalizing column names
//! - Turning sentinel strings and non-finite numbers into nulls
//! - Removing duplicate rows and all-null columns
//! - Median/outlier repair of numeric columns
//! - Canonicalization and mode fill of textual columns

mod converters;
mod sanitizers;

use crate::config::NameCollisionPolicy;
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::pipeline::OutlierHandler;
use crate::types::{ColumnKind, ColumnSchema};
use crate::utils::missing_count;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Data cleaner for automatic dataset cleaning operations.
///
/// Cleaning never mutates the caller's table; every step works on an owned
/// copy and the result is a new table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner {
    name_collision: NameCollisionPolicy,
}

impl DataCleaner {
    pub fn new(name_collision: NameCollisionPolicy) -> Self {
        Self { name_collision }
    }

    /// Clean a table and return only the cleaned copy.
    pub fn clean(&self, raw: &DataFrame) -> Result<DataFrame> {
        self.perform_cleaning(raw).map(|(df, _)| df)
    }

    /// Clean a table, returning the cleaned copy and a log of actions taken.
    ///
    /// Steps run in a fixed order:
    /// 1. Normalize column names
    /// 2. Replace sentinel strings with nulls
    /// 3. Remove duplicate rows
    /// 4. Drop columns with no values
    /// 5. Replace infinities with nulls
    /// 6. Fill numeric nulls with the median, then cap to Tukey fences
    /// 7. Canonicalize text and fill nulls with the mode; drop text columns
    ///    that canonicalization left with no values
    /// 8. Remove rows that became duplicates after repair
    ///
    /// Cleaning an already cleaned table is not always a no-op: removing
    /// rows or capping values can move the quartiles that a second pass
    /// caps against.
    pub fn perform_cleaning(&self, raw: &DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let mut cleaning_actions = Vec::new();

        info!(
            "Performing automatic data cleaning on {} rows x {} columns...",
            raw.height(),
            raw.width()
        );

        // 1. Column names
        let (df, rename_notes) = sanitizers::normalize_column_names(raw.clone(), self.name_collision)?;
        cleaning_actions.extend(rename_notes);

        // 2. Sentinel strings
        let (df, sentinels) = sanitizers::replace_sentinel_nulls(df)?;
        let sentinel_total: usize = sentinels.iter().map(|(_, n)| n).sum();
        if sentinel_total > 0 {
            cleaning_actions.push(format!("Replaced {} sentinel values with null", sentinel_total));
        }
        let sentinel_columns: Vec<String> = sentinels.into_iter().map(|(name, _)| name).collect();

        let (df, mut schema, conversion_notes) =
            converters::resolve_column_kinds(df, &sentinel_columns)?;
        cleaning_actions.extend(conversion_notes);

        // 3. Duplicate rows
        let (df, duplicates_removed) = remove_duplicate_rows(df)?;
        if duplicates_removed > 0 {
            cleaning_actions.push(format!("Removed {} duplicate rows", duplicates_removed));
        } else {
            cleaning_actions.push("No duplicate rows found".to_string());
        }

        // 4. All-null columns
        let (mut df, dropped) = remove_empty_columns(df)?;
        if !dropped.is_empty() {
            schema.retain(|col| !dropped.contains(&col.name));
            cleaning_actions.push(format!(
                "Removed {} columns with no values: {:?}",
                dropped.len(),
                dropped
            ));
        }

        // 5. Infinities
        let non_finite = sanitizers::replace_non_finite(&mut df, &schema)?;
        if non_finite > 0 {
            cleaning_actions.push(format!("Replaced {} infinite values with null", non_finite));
        }

        // 6. Numeric repair
        for col in schema.iter().filter(|c| c.kind == ColumnKind::Numeric) {
            if !StatisticalImputer::apply_numeric_median(&mut df, &col.name, &mut cleaning_actions)? {
                warn_degenerate(col, &mut cleaning_actions);
                continue;
            }
            OutlierHandler::cap_outliers(&mut df, &col.name, &mut cleaning_actions)?;
        }

        // 7. Text repair
        let mut emptied = Vec::new();
        for col in schema.iter().filter(|c| c.kind == ColumnKind::Textual) {
            let changed = sanitizers::canonicalize_text_column(&mut df, &col.name)?;
            if changed > 0 {
                debug!("Canonicalized {} values in '{}'", changed, col.name);
            }
            let series = df.column(&col.name)?.as_materialized_series();
            if df.height() > 0 && missing_count(series)? == df.height() {
                emptied.push(col.name.clone());
                continue;
            }
            if !StatisticalImputer::apply_mode_imputation(&mut df, &col.name, &mut cleaning_actions)? {
                warn_degenerate(col, &mut cleaning_actions);
            }
        }
        if !emptied.is_empty() {
            df = drop_columns(df, &emptied)?;
            cleaning_actions.push(format!(
                "Removed {} text columns left blank after trimming: {:?}",
                emptied.len(),
                emptied
            ));
        }

        // 8. Duplicates exposed by repair
        let (df, late_duplicates) = remove_duplicate_rows(df)?;
        if late_duplicates > 0 {
            cleaning_actions.push(format!(
                "Removed {} rows that became duplicates after cleaning",
                late_duplicates
            ));
        }

        info!(
            "Cleaning finished: {} rows x {} columns",
            df.height(),
            df.width()
        );

        Ok((df, cleaning_actions))
    }
}

/// Clean a table with the default cleaner.
pub fn clean(raw: &DataFrame) -> Result<DataFrame> {
    DataCleaner::default().clean(raw)
}

/// Drop rows that exactly repeat an earlier row, keeping the first.
fn remove_duplicate_rows(df: DataFrame) -> Result<(DataFrame, usize)> {
    if df.width() == 0 || df.height() < 2 {
        return Ok((df, 0));
    }

    let before = df.height();
    let df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = before - df.height();

    if removed > 0 {
        debug!("Removed {} duplicate rows", removed);
    }
    Ok((df, removed))
}

/// Drop columns where every cell is missing.
fn remove_empty_columns(df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
    let height = df.height();
    let mut kept = Vec::with_capacity(df.width());
    let mut dropped = Vec::new();

    for col in df.get_columns() {
        let series = col.as_materialized_series();
        if missing_count(series)? == height {
            dropped.push(series.name().to_string());
        } else {
            kept.push(col.clone());
        }
    }

    if dropped.is_empty() {
        return Ok((df, dropped));
    }

    debug!("Removed {} empty columns: {:?}", dropped.len(), dropped);
    Ok((DataFrame::new(kept)?, dropped))
}

/// Drop the named columns, keeping the order of the rest.
fn drop_columns(df: DataFrame, names: &[String]) -> Result<DataFrame> {
    debug!("Removed {} blank text columns: {:?}", names.len(), names);
    let kept: Vec<Column> = df
        .get_columns()
        .iter()
        .filter(|col| !names.iter().any(|n| n.as_str() == col.name().as_str()))
        .cloned()
        .collect();
    Ok(DataFrame::new(kept)?)
}

fn warn_degenerate(col: &ColumnSchema, cleaning_actions: &mut Vec<String>) {
    warn!(
        "Column '{}' has no values after cleaning, left unfilled",
        col.name
    );
    cleaning_actions.push(format!("Left '{}' unfilled: no values to impute from", col.name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::text_values;

    fn f64_values(df: &DataFrame, col: &str) -> Vec<Option<f64>> {
        df.column(col).unwrap().f64().unwrap().into_iter().collect()
    }

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_clean_text_numbers_and_case_duplicates() {
        let df = df![
            "Name " => ["alice", "ALICE", "bob"],
            " Age" => ["25", "25", "None"],
        ]
        .unwrap();

        let cleaned = clean(&df).unwrap();
        assert_eq!(names(&cleaned), vec!["name", "age"]);
        assert_eq!(cleaned.height(), 2);
        assert_eq!(f64_values(&cleaned, "age"), vec![Some(25.0), Some(25.0)]);

        let people = text_values(cleaned.column("name").unwrap().as_materialized_series()).unwrap();
        assert_eq!(people, vec![Some("alice".to_string()), Some("bob".to_string())]);
    }

    #[test]
    fn test_clean_keeps_numeric_looking_text() {
        let df = df!["zip" => ["02134", "02135", "02136", "02137", "99999"]].unwrap();

        let cleaned = clean(&df).unwrap();
        assert_eq!(cleaned.column("zip").unwrap().dtype(), &DataType::String);
        let zips = text_values(cleaned.column("zip").unwrap().as_materialized_series()).unwrap();
        assert_eq!(zips[0].as_deref(), Some("02134"));
        assert_eq!(zips[4].as_deref(), Some("99999"));
    }

    #[test]
    fn test_clean_drops_blank_text_column() {
        let df = df![
            "id" => [1.0, 2.0, 3.0],
            "note" => ["  ", "   ", " "],
        ]
        .unwrap();

        let (once, actions) = DataCleaner::default().perform_cleaning(&df).unwrap();
        assert_eq!(names(&once), vec!["id"]);
        assert!(actions.iter().any(|a| a.contains("blank")));

        let twice = clean(&once).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_clean_caps_outlier() {
        let df = df!["v" => [1i64, 2, 3, 4, 100]].unwrap();
        let cleaned = clean(&df).unwrap();
        assert_eq!(
            f64_values(&cleaned, "v"),
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(7.0)]
        );
    }

    #[test]
    fn test_clean_drops_all_null_column() {
        let df = df![
            "keep" => [1.0, 2.0],
            "gone" => [None::<&str>, None],
            "sentinels" => ["NULL", ""],
        ]
        .unwrap();

        let (cleaned, actions) = DataCleaner::default().perform_cleaning(&df).unwrap();
        assert_eq!(names(&cleaned), vec!["keep"]);
        assert!(actions.iter().any(|a| a.contains("no values")));
    }

    #[test]
    fn test_clean_only_empty_column() {
        let df = df!["x" => [None::<f64>, None, None]].unwrap();
        let cleaned = clean(&df).unwrap();
        assert_eq!(cleaned.width(), 0);
    }

    #[test]
    fn test_clean_infinite_column_kept_unfilled() {
        let df = df![
            "inf" => [f64::INFINITY, f64::NEG_INFINITY],
            "id" => [1.0, 2.0],
        ]
        .unwrap();

        let (cleaned, actions) = DataCleaner::default().perform_cleaning(&df).unwrap();
        assert_eq!(names(&cleaned), vec!["inf", "id"]);
        assert_eq!(cleaned.column("inf").unwrap().null_count(), 2);
        assert!(actions.iter().any(|a| a.contains("unfilled")));
    }

    #[test]
    fn test_clean_does_not_mutate_input() {
        let df = df![
            "City " => [Some(" Boston"), None, Some("NULL")],
            "v" => [Some(1.0), None, Some(3.0)],
        ]
        .unwrap();
        let snapshot = df.clone();

        let _ = clean(&df).unwrap();
        assert!(df.equals_missing(&snapshot));
        assert_eq!(names(&df), vec!["City ", "v"]);
    }

    #[test]
    fn test_clean_other_columns_pass_through() {
        let df = df![
            "flag" => [Some(true), None, Some(false)],
            "v" => [1.0, 2.0, 3.0],
        ]
        .unwrap();

        let cleaned = clean(&df).unwrap();
        assert_eq!(cleaned.column("flag").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(cleaned.column("flag").unwrap().null_count(), 1);
    }

    #[test]
    fn test_clean_collision_fail_policy() {
        let df = df![
            "Age" => [1],
            "age " => [2],
        ]
        .unwrap();

        let err = DataCleaner::new(NameCollisionPolicy::Fail)
            .clean(&df)
            .unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NAME_COLLISION");

        let cleaned = DataCleaner::new(NameCollisionPolicy::Suffix).clean(&df).unwrap();
        assert_eq!(names(&cleaned), vec!["age", "age_2"]);
    }
}
