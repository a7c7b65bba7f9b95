//! AOI normalization
//!
//! Reduces a GeoJSON request payload (a bare geometry, a feature, or a
//! feature collection) to one canonical polygonal geometry. Multi-feature
//! collections are merged by geometric union, so overlapping features
//! collapse into a single (possibly multipart) region.

use crate::error::{AnalysisError, Result};
use geo::{BooleanOps, MultiPolygon, Polygon};
use geojson::GeoJson;

/// Normalize a GeoJSON payload into one polygonal AOI.
///
/// Accepts a geometry, a feature, or a feature collection. A collection
/// with several features is unioned; a single feature is unwrapped.
///
/// # Errors
/// `AnalysisError::InvalidAoi` on unparseable payloads, features without a
/// geometry, empty collections, and non-polygonal geometry.
pub fn normalize(payload: &str) -> Result<MultiPolygon<f64>> {
    let geojson = payload
        .parse::<GeoJson>()
        .map_err(|e| AnalysisError::InvalidAoi(e.to_string()))?;

    from_geojson(geojson)
}

/// Normalize an already-parsed JSON value.
///
/// The transport layer hands over whatever it deserialized; this is the
/// same normalization as [`normalize`] minus the string parse.
pub fn normalize_value(value: serde_json::Value) -> Result<MultiPolygon<f64>> {
    let geojson =
        GeoJson::from_json_value(value).map_err(|e| AnalysisError::InvalidAoi(e.to_string()))?;

    from_geojson(geojson)
}

fn from_geojson(geojson: GeoJson) -> Result<MultiPolygon<f64>> {
    let polygons = match geojson {
        GeoJson::FeatureCollection(collection) => {
            if collection.features.is_empty() {
                return Err(AnalysisError::InvalidAoi(
                    "feature collection has no features".to_string(),
                ));
            }

            let mut polygons = Vec::new();
            for feature in &collection.features {
                let geometry = feature.geometry.as_ref().ok_or_else(|| {
                    AnalysisError::InvalidAoi("feature has no geometry".to_string())
                })?;
                polygons.extend(polygonal_parts(geometry)?);
            }
            polygons
        }
        GeoJson::Feature(feature) => {
            let geometry = feature
                .geometry
                .as_ref()
                .ok_or_else(|| AnalysisError::InvalidAoi("feature has no geometry".to_string()))?;
            polygonal_parts(geometry)?
        }
        GeoJson::Geometry(geometry) => polygonal_parts(&geometry)?,
    };

    if polygons.is_empty() {
        return Err(AnalysisError::InvalidAoi(
            "AOI contains no polygons".to_string(),
        ));
    }

    if polygons.len() == 1 {
        return Ok(MultiPolygon::new(polygons));
    }

    let mut parts = polygons.into_iter();
    let first = MultiPolygon::new(vec![parts.next().expect("checked non-empty")]);
    let merged = parts.fold(first, |merged, polygon| {
        merged.union(&MultiPolygon::new(vec![polygon]))
    });

    if merged.0.is_empty() {
        return Err(AnalysisError::InvalidAoi(
            "union of AOI features is empty".to_string(),
        ));
    }

    Ok(merged)
}

/// Extract the polygonal parts of one GeoJSON geometry.
fn polygonal_parts(geometry: &geojson::Geometry) -> Result<Vec<Polygon<f64>>> {
    let geometry = geo_types::Geometry::<f64>::try_from(&geometry.value)
        .map_err(|e| AnalysisError::InvalidAoi(e.to_string()))?;

    match geometry {
        geo_types::Geometry::Polygon(polygon) => Ok(vec![polygon]),
        geo_types::Geometry::MultiPolygon(multi) => Ok(multi.0),
        other => Err(AnalysisError::InvalidAoi(format!(
            "expected polygonal geometry, got {}",
            geometry_kind(&other)
        ))),
    }
}

fn geometry_kind(geometry: &geo_types::Geometry<f64>) -> &'static str {
    match geometry {
        geo_types::Geometry::Point(_) => "Point",
        geo_types::Geometry::Line(_) => "Line",
        geo_types::Geometry::LineString(_) => "LineString",
        geo_types::Geometry::MultiPoint(_) => "MultiPoint",
        geo_types::Geometry::MultiLineString(_) => "MultiLineString",
        geo_types::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo_types::Geometry::Rect(_) => "Rect",
        geo_types::Geometry::Triangle(_) => "Triangle",
        geo_types::Geometry::Polygon(_) | geo_types::Geometry::MultiPolygon(_) => "Polygon",
    }
}
