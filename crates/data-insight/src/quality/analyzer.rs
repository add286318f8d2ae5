use crate::config::thresholds::{CORRELATION_THRESHOLD, MISSING_PERCENT_THRESHOLD, SKEWNESS_THRESHOLD};
use crate::error::Result;
use crate::profiler::{DataProfiler, statistics};
use crate::types::{Finding, FindingKind, ScoreResult};
use crate::utils::{missing_count, numeric_values};
use polars::prelude::*;
use tracing::debug;

/// Rule-based quality scorer for cleaned tables.
pub struct InsightScorer;

impl InsightScorer {
    /// Score a table, starting from 100 and subtracting rule penalties.
    pub fn score(df: &DataFrame) -> Result<ScoreResult> {
        let findings = Self::identify_findings(df)?;
        let result = ScoreResult::from_findings(findings);
        debug!(
            "Scored table at {} with {} findings",
            result.score,
            result.findings.len()
        );
        Ok(result)
    }

    /// Run every rule in order and collect their findings.
    pub fn identify_findings(df: &DataFrame) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        // Missing values
        findings.extend(Self::analyze_missing_values(df)?);

        // Duplicate rows
        findings.extend(Self::analyze_duplicates(df)?);

        // Skewed numeric columns (informational)
        findings.extend(Self::analyze_skewness(df)?);

        // Strong correlations
        findings.extend(Self::analyze_correlations(df)?);

        Ok(findings)
    }

    fn analyze_missing_values(df: &DataFrame) -> Result<Option<Finding>> {
        let rows = df.height();
        if rows == 0 {
            return Ok(None);
        }

        let mut high_missing_cols = Vec::new();
        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let missing_pct = missing_count(series)? as f64 / rows as f64 * 100.0;
            if missing_pct > MISSING_PERCENT_THRESHOLD {
                high_missing_cols.push(series.name().to_string());
            }
        }

        if high_missing_cols.is_empty() {
            return Ok(None);
        }

        Ok(Some(Finding::new(
            FindingKind::HighMissingness,
            "Some columns have more than 20% missing values.",
            high_missing_cols,
        )))
    }

    fn analyze_duplicates(df: &DataFrame) -> Result<Option<Finding>> {
        let duplicates = DataProfiler::duplicate_count(df)?;
        if duplicates == 0 {
            return Ok(None);
        }

        Ok(Some(Finding::new(
            FindingKind::DuplicateRows,
            format!("Dataset contains {} duplicate rows.", duplicates),
            Vec::new(),
        )))
    }

    fn analyze_skewness(df: &DataFrame) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for name in DataProfiler::numeric_columns(df) {
            let values: Vec<f64> = numeric_values(df.column(&name)?.as_materialized_series())?
                .into_iter()
                .flatten()
                .collect();

            if let Some(skew) = statistics::skewness(&values)
                && skew.abs() > SKEWNESS_THRESHOLD
            {
                debug!("Column '{}' skewness {:.3}", name, skew);
                findings.push(Finding::new(
                    FindingKind::SkewedColumn,
                    format!("Column '{}' is highly skewed.", name),
                    vec![name],
                ));
            }
        }

        Ok(findings)
    }

    fn analyze_correlations(df: &DataFrame) -> Result<Option<Finding>> {
        let matrix = DataProfiler::correlation_matrix(df)?;
        if matrix.columns.len() < 2 {
            return Ok(None);
        }

        let mut columns: Vec<String> = Vec::new();
        for (left, right, r) in matrix.pairs() {
            if r.abs() > CORRELATION_THRESHOLD && r.abs() < 1.0 {
                debug!("Strong correlation {:.3} between '{}' and '{}'", r, left, right);
                for name in [left, right] {
                    if !columns.iter().any(|c| c == name) {
                        columns.push(name.to_string());
                    }
                }
            }
        }

        if columns.is_empty() {
            return Ok(None);
        }

        Ok(Some(Finding::new(
            FindingKind::StrongCorrelation,
            "Strong correlations detected between numeric variables.",
            columns,
        )))
    }
}

/// Score a table with the fixed rule set.
pub fn score(df: &DataFrame) -> Result<ScoreResult> {
    InsightScorer::score(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(result: &ScoreResult) -> Vec<FindingKind> {
        result.findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_missingness_and_correlation() {
        let df = df![
            "x" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            "y" => [1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 8.0, 7.0],
            "note" => [Some("a"), None, Some("b"), Some("c"), None, Some("d"), Some("e"), Some("f")],
        ]
        .unwrap();

        let result = score(&df).unwrap();
        assert_eq!(result.score, 75);
        assert_eq!(
            kinds(&result),
            vec![FindingKind::HighMissingness, FindingKind::StrongCorrelation]
        );
        assert_eq!(result.findings[0].columns, vec!["note".to_string()]);
        assert_eq!(result.findings[1].columns, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_clean_table_scores_full() {
        let df = df![
            "x" => [1.0, 2.0, 3.0, 4.0, 5.0],
            "y" => [2.0, 5.0, 1.0, 4.0, 3.0],
            "label" => ["a", "b", "c", "d", "e"],
        ]
        .unwrap();

        let result = score(&df).unwrap();
        assert_eq!(result.score, 100);
        assert!(result.is_clean());
    }

    #[test]
    fn test_exactly_twenty_percent_missing_does_not_fire() {
        let df = df!["v" => [Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)]].unwrap();
        let result = score(&df).unwrap();
        assert!(!kinds(&result).contains(&FindingKind::HighMissingness));
    }

    #[test]
    fn test_duplicates_penalized() {
        let df = df![
            "a" => ["x", "x", "y", "x"],
            "b" => [1.0, 1.0, 2.0, 1.0],
        ]
        .unwrap();

        let result = score(&df).unwrap();
        assert_eq!(result.score, 90);
        assert_eq!(result.findings[0].message, "Dataset contains 2 duplicate rows.");
    }

    #[test]
    fn test_skewness_is_informational() {
        let df = df!["income" => [1.0, 1.0, 1.0, 1.0, 10.0]].unwrap();

        let result = score(&df).unwrap();
        assert_eq!(result.score, 90);
        assert_eq!(
            kinds(&result),
            vec![FindingKind::DuplicateRows, FindingKind::SkewedColumn]
        );
        assert_eq!(result.findings[1].message, "Column 'income' is highly skewed.");
    }

    #[test]
    fn test_perfect_correlation_excluded() {
        let df = df![
            "a" => [1.0, 2.0, 3.0, 4.0],
            "b" => [2.0, 4.0, 6.0, 8.0],
        ]
        .unwrap();

        assert!(score(&df).unwrap().is_clean());
    }

    #[test]
    fn test_negative_correlation_counts() {
        let df = df![
            "a" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            "b" => [8.0, 6.0, 7.0, 4.0, 5.0, 3.0, 1.0, 2.0],
        ]
        .unwrap();

        let result = score(&df).unwrap();
        assert_eq!(kinds(&result), vec![FindingKind::StrongCorrelation]);
        assert_eq!(result.score, 90);
    }

    #[test]
    fn test_empty_table() {
        let result = score(&DataFrame::empty()).unwrap();
        assert_eq!(result.score, 100);
        assert!(result.is_clean());
    }
}
