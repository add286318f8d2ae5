//! Pipeline module.
//!
//! This module provides the main cleaning pipeline and the outlier capping
//! it relies on.

mod builder;
pub mod outliers;

pub use builder::{Pipeline, PipelineBuilder};
pub use outliers::OutlierHandler;
