use crate::config::thresholds;
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Column Classification
// ============================================================================

/// Value type of a column, decided once from its dtype.
///
/// The cleaner only repairs `Numeric` and `Textual` columns; `Other`
/// columns (booleans, dates, nested types) pass through untouched and are
/// ignored by the scorer's per-type rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Textual,
    Other,
}

impl ColumnKind {
    /// Classify a Polars dtype.
    pub fn of(dtype: &DataType) -> Self {
        if is_numeric_dtype(dtype) {
            ColumnKind::Numeric
        } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
            ColumnKind::Textual
        } else {
            ColumnKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Textual => "textual",
            ColumnKind::Other => "other",
        }
    }
}

/// A column name paired with its resolved kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

// ============================================================================
// Dataset Summary
// ============================================================================

/// Missing-value count for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub missing_count: usize,
}

/// Read-only snapshot of a table's shape and missingness.
///
/// Computed fresh by [`crate::profiler::DataProfiler::summarize`]; never
/// updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub duplicate_count: usize,
    /// One entry per column, in column order.
    pub column_summaries: Vec<ColumnSummary>,
}

impl DatasetSummary {
    /// Total number of missing cells.
    pub fn total_missing(&self) -> usize {
        self.column_summaries.iter().map(|c| c.missing_count).sum()
    }

    /// Columns with at least one missing value, in column order.
    pub fn columns_with_missing(&self) -> impl Iterator<Item = &ColumnSummary> {
        self.column_summaries.iter().filter(|c| c.missing_count > 0)
    }
}

/// Pairwise Pearson correlations between numeric columns.
///
/// `values[i][j]` is the correlation of `columns[i]` and `columns[j]`;
/// `None` where it is undefined (too few pairs, zero variance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Defined off-diagonal entries `(left, right, r)` with `left < right`.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.columns.iter().enumerate().flat_map(move |(i, left)| {
            self.columns
                .iter()
                .enumerate()
                .skip(i + 1)
                .filter_map(move |(j, right)| {
                    self.values[i][j].map(|r| (left.as_str(), right.as_str(), r))
                })
        })
    }
}

// ============================================================================
// Findings and Scores
// ============================================================================

/// The rule that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    HighMissingness,
    DuplicateRows,
    SkewedColumn,
    StrongCorrelation,
}

impl FindingKind {
    /// Points subtracted from the score when this rule fires.
    pub fn penalty(&self) -> u32 {
        match self {
            FindingKind::HighMissingness => thresholds::MISSING_PENALTY,
            FindingKind::DuplicateRows => thresholds::DUPLICATE_PENALTY,
            FindingKind::SkewedColumn => 0,
            FindingKind::StrongCorrelation => thresholds::CORRELATION_PENALTY,
        }
    }
}

/// One human-readable statement about a detected data-quality condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
    /// Columns the finding is about (empty for table-level findings).
    pub columns: Vec<String>,
}

impl Finding {
    pub fn new(kind: FindingKind, message: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            columns,
        }
    }

    pub fn penalty(&self) -> u32 {
        self.kind.penalty()
    }
}

/// Final quality score and the findings that explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Score in `0..=100`.
    pub score: u8,
    /// Findings in rule evaluation order.
    pub findings: Vec<Finding>,
}

impl ScoreResult {
    /// Build a result from findings, deriving the clamped score from their penalties.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let penalty: i32 = findings.iter().map(|f| f.penalty() as i32).sum();
        let score = (thresholds::START_SCORE - penalty).clamp(0, thresholds::START_SCORE);
        Self {
            score: score as u8,
            findings,
        }
    }

    /// True when no rule fired.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

// ============================================================================
// Pipeline Result
// ============================================================================

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub cleaned: DataFrame,
    pub original_summary: DatasetSummary,
    pub cleaned_summary: DatasetSummary,
    pub score: ScoreResult,
    pub cleaning_actions: Vec<String>,
    pub duration_ms: u64,
    /// Report built from the run, when report generation is enabled.
    pub report: Option<crate::reporting::InsightReport>,
    /// Paths written to disk, when saving is enabled.
    pub written_files: Vec<std::path::PathBuf>,
}
