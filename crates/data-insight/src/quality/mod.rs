//! Data quality scoring module.
//!
//! Runs fixed rules over a cleaned table (missingness, duplicate rows,
//! skewness, correlation) and turns them into a 0-100 score with findings.

mod analyzer;

pub use analyzer::{InsightScorer, score};
