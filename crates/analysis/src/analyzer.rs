//! Analysis orchestration
//!
//! Composes the pipeline per dataset: reproject the AOI into the dataset's
//! CRS, extract its category histogram, augment with descriptive
//! statistics, and record the result under the dataset name. One dataset's
//! failure degrades that entry only; siblings are always processed.

use crate::catalog::DatasetSource;
use crate::error::{AnalysisError, Result};
use crate::stats::FrequencyStats;
use crate::{aoi, reproject, stats, zonal};
use cropfreq_core::Crs;
use geo::MultiPolygon;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Per-dataset statistics keyed by dataset name.
pub type Response = BTreeMap<String, FrequencyStats>;

/// Analysis configuration.
///
/// Passed in at construction so tests can inject in-memory sources and a
/// request CRS without touching process-wide state.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// CRS of incoming AOI coordinates
    pub request_crs: Crs,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            request_crs: Crs::wgs84(),
        }
    }
}

/// Runs the crop frequency analysis over a dataset source.
pub struct Analyzer<S> {
    source: S,
    config: AnalysisConfig,
}

impl<S: DatasetSource> Analyzer<S> {
    pub fn new(source: S, config: AnalysisConfig) -> Self {
        Self { source, config }
    }

    /// Analyze a raw GeoJSON payload.
    ///
    /// # Errors
    /// `InvalidAoi` when the payload cannot be normalized; source
    /// enumeration failures propagate as-is. Per-dataset failures do not
    /// surface here; they degrade that dataset's entry.
    pub fn analyze(&self, payload: &str) -> Result<Response> {
        let aoi = aoi::normalize(payload)?;
        self.analyze_aoi(&aoi)
    }

    /// Analyze an already-normalized AOI in the request CRS.
    pub fn analyze_aoi(&self, aoi: &MultiPolygon<f64>) -> Result<Response> {
        let mut names = self.source.list()?;
        names.sort();

        let mut response = Response::new();
        for name in names {
            let stats = match self.dataset_stats(&name, aoi) {
                Ok(stats) => stats,
                Err(err) => {
                    warn!("dataset '{}' degraded to empty result: {}", name, err);
                    degraded()
                }
            };
            response.insert(name, stats);
        }

        Ok(response)
    }

    /// One dataset end-to-end. The opened raster is dropped on every exit
    /// path when this returns.
    fn dataset_stats(&self, name: &str, aoi: &MultiPolygon<f64>) -> Result<FrequencyStats> {
        let raster = self.source.open(name)?;
        let dataset_crs = raster.crs().cloned().ok_or(AnalysisError::MissingCrs)?;

        let projected = reproject::reproject(aoi, &self.config.request_crs, &dataset_crs)?;
        let histogram = zonal::category_histogram(&raster, &projected);
        debug!(
            "dataset '{}': {} categories in zone",
            name,
            histogram.len()
        );

        Ok(stats::describe(histogram))
    }
}

/// Placeholder entry for a dataset whose extraction failed.
fn degraded() -> FrequencyStats {
    stats::describe(zonal::nodata_histogram())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemorySource;
    use cropfreq_core::{GeoTransform, Raster};

    fn wgs84_raster(fill: i32) -> Raster<i32> {
        let mut raster = Raster::filled(4, 4, fill);
        raster.set_transform(GeoTransform::new(0.0, 4.0, 1.0, -1.0));
        raster.set_crs(Some(Crs::wgs84()));
        raster
    }

    const AOI: &str = r#"{
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]]
    }"#;

    #[test]
    fn test_one_entry_per_dataset() {
        let mut source = MemorySource::new();
        source.insert("corn", wgs84_raster(1));
        source.insert("soybeans", wgs84_raster(2));

        let analyzer = Analyzer::new(source, AnalysisConfig::default());
        let response = analyzer.analyze(AOI).unwrap();

        assert_eq!(
            response.keys().collect::<Vec<_>>(),
            vec!["corn", "soybeans"]
        );
    }

    #[test]
    fn test_invalid_payload_aborts_request() {
        let mut source = MemorySource::new();
        source.insert("corn", wgs84_raster(1));

        let analyzer = Analyzer::new(source, AnalysisConfig::default());
        assert!(matches!(
            analyzer.analyze("{}"),
            Err(AnalysisError::InvalidAoi(_))
        ));
    }

    #[test]
    fn test_missing_crs_degrades_single_dataset() {
        let mut bad = Raster::filled(4, 4, 1);
        bad.set_transform(GeoTransform::new(0.0, 4.0, 1.0, -1.0));
        // CRS deliberately unset

        let mut source = MemorySource::new();
        source.insert("bad", bad);
        source.insert("good", wgs84_raster(2));

        let analyzer = Analyzer::new(source, AnalysisConfig::default());
        let response = analyzer.analyze(AOI).unwrap();

        assert_eq!(response.len(), 2);
        assert_eq!(response["bad"].categories.get("nodata"), Some(&0));
        assert_eq!(response["bad"].sum, 0);
        assert_eq!(response["good"].categories.get("2"), Some(&16));
    }
}
