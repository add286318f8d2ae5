//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with their median, textual columns with
//! their most frequent value.

mod statistical;

pub use statistical::StatisticalImputer;
