//! Chart data for the cleaned table.
//!
//! Every builder returns an owned panel describing what to draw; nothing
//! here keeps drawing state between calls.

use crate::config::thresholds::{LOWER_QUARTILE, TOP_CATEGORY_LIMIT, UPPER_QUARTILE};
use crate::error::Result;
use crate::pipeline::OutlierHandler;
use crate::profiler::{DataProfiler, statistics};
use crate::types::ColumnKind;
use crate::utils::{numeric_values, text_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A self-contained chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ChartPanel {
    Histogram(HistogramChart),
    BoxPlot(BoxPlotChart),
    TopCategories(CategoryChart),
    CorrelationHeatmap(HeatmapChart),
}

impl ChartPanel {
    pub fn title(&self) -> String {
        match self {
            ChartPanel::Histogram(h) => format!("{} Distribution", h.column),
            ChartPanel::BoxPlot(b) => format!("{} Box Plot", b.column),
            ChartPanel::TopCategories(c) => format!("{} Top Categories", c.column),
            ChartPanel::CorrelationHeatmap(_) => "Correlation Heatmap".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram with a Sturges bin count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramChart {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    pub mean: f64,
    pub median: f64,
}

/// Five-number summary plus Tukey fences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotChart {
    pub column: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Most frequent values of a textual column, highest count first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChart {
    pub column: String,
    pub categories: Vec<CategoryCount>,
}

/// Signed Pearson correlations between numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapChart {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// Builds chart panels from a cleaned table.
pub struct Visualizer;

impl Visualizer {
    /// All panels for a table: distribution and box plot per numeric
    /// column, top categories per textual column (column order), then a
    /// heatmap when there are at least two numeric columns.
    pub fn panels(df: &DataFrame) -> Result<Vec<ChartPanel>> {
        let mut panels = Vec::new();

        for col in df.get_columns() {
            let name = col.name().as_str();
            match ColumnKind::of(col.dtype()) {
                ColumnKind::Numeric => {
                    if let Some(hist) = Self::histogram(df, name)? {
                        panels.push(ChartPanel::Histogram(hist));
                    }
                    if let Some(bp) = Self::box_plot(df, name)? {
                        panels.push(ChartPanel::BoxPlot(bp));
                    }
                }
                ColumnKind::Textual => {
                    if let Some(cats) = Self::top_categories(df, name, TOP_CATEGORY_LIMIT)? {
                        panels.push(ChartPanel::TopCategories(cats));
                    }
                }
                ColumnKind::Other => {}
            }
        }

        if let Some(heatmap) = Self::correlation_heatmap(df)? {
            panels.push(ChartPanel::CorrelationHeatmap(heatmap));
        }

        Ok(panels)
    }

    /// Histogram of a numeric column. `None` when it has no values.
    pub fn histogram(df: &DataFrame, column: &str) -> Result<Option<HistogramChart>> {
        let values: Vec<f64> = numeric_values(df.column(column)?.as_materialized_series())?
            .into_iter()
            .flatten()
            .collect();

        let (Some(mean), Some(median)) = (statistics::mean(&values), statistics::median(&values))
        else {
            return Ok(None);
        };

        Ok(Some(HistogramChart {
            column: column.to_string(),
            bins: histogram_bins(&values),
            mean,
            median,
        }))
    }

    /// Box plot statistics of a numeric column.
    pub fn box_plot(df: &DataFrame, column: &str) -> Result<Option<BoxPlotChart>> {
        let series = df.column(column)?.as_materialized_series();
        let present: Vec<f64> = numeric_values(series)?.into_iter().flatten().collect();
        let sorted = statistics::sorted(&present);

        let (Some(q1), Some(median), Some(q3), Some((lower_fence, upper_fence))) = (
            statistics::quantile_sorted(&sorted, LOWER_QUARTILE),
            statistics::quantile_sorted(&sorted, 0.5),
            statistics::quantile_sorted(&sorted, UPPER_QUARTILE),
            OutlierHandler::fences(series)?,
        ) else {
            return Ok(None);
        };

        Ok(Some(BoxPlotChart {
            column: column.to_string(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_fence,
            upper_fence,
        }))
    }

    /// Up to `limit` most frequent values; ties keep first-seen order.
    pub fn top_categories(
        df: &DataFrame,
        column: &str,
        limit: usize,
    ) -> Result<Option<CategoryChart>> {
        let values = text_values(df.column(column)?.as_materialized_series())?;

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for val in values.into_iter().flatten() {
            let count = counts.entry(val.clone()).or_insert(0);
            if *count == 0 {
                order.push(val);
            }
            *count += 1;
        }

        if order.is_empty() {
            return Ok(None);
        }

        let mut categories: Vec<CategoryCount> = order
            .into_iter()
            .map(|value| {
                let count = counts.get(&value).copied().unwrap_or(0);
                CategoryCount { value, count }
            })
            .collect();
        // Stable sort keeps first-seen order among equal counts.
        categories.sort_by(|a, b| b.count.cmp(&a.count));
        categories.truncate(limit);

        Ok(Some(CategoryChart {
            column: column.to_string(),
            categories,
        }))
    }

    /// Correlation heatmap. `None` with fewer than two numeric columns.
    pub fn correlation_heatmap(df: &DataFrame) -> Result<Option<HeatmapChart>> {
        let matrix = DataProfiler::correlation_matrix(df)?;
        if matrix.columns.len() < 2 {
            return Ok(None);
        }

        Ok(Some(HeatmapChart {
            columns: matrix.columns,
            values: matrix.values,
        }))
    }
}

/// Equal-width bins between min and max, `ceil(log2 n) + 1` of them.
fn histogram_bins(values: &[f64]) -> Vec<HistogramBin> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let bin_count = (values.len() as f64).log2().ceil() as usize + 1;
    let width = (max - min) / bin_count as f64;

    let mut counts = vec![0usize; bin_count];
    for v in values {
        let idx = (((v - min) / width) as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bin_count { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect()
}
