//! # CropFreq Analysis
//!
//! Zonal crop frequency statistics: given a polygonal area of interest and
//! a catalog of categorical rasters (cell value = years a crop was planted,
//! 2008–2019), report per-dataset cell counts per frequency category plus
//! derived sum and mean.
//!
//! Pipeline: [`aoi::normalize`] → [`reproject::reproject`] per dataset →
//! [`zonal::category_histogram`] → [`stats::describe`], orchestrated by
//! [`Analyzer`].

pub mod analyzer;
pub mod aoi;
pub mod catalog;
pub mod error;
pub mod reproject;
pub mod stats;
pub mod zonal;

pub use analyzer::{AnalysisConfig, Analyzer, Response};
pub use catalog::{DatasetSource, DirectorySource, MemorySource};
pub use error::{AnalysisError, Result};
pub use stats::{CategoryHistogram, FrequencyStats};
