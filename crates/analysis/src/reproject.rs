//! Geometry reprojection
//!
//! Forward coordinate transforms between two CRSs using PROJ. Transforms
//! built with `new_known_crs` are normalized to x=longitude/easting,
//! y=latitude/northing axis order regardless of the authority definition.
//! Seam behavior (antimeridian, polar) is whatever PROJ guarantees.

use crate::error::{AnalysisError, Result};
use cropfreq_core::Crs;
use geo::{Coord, LineString, MultiPolygon, Polygon};
use proj::Proj;

/// Reprojects polygonal geometry between two coordinate reference systems.
pub struct Reprojector {
    proj: Proj,
    from: String,
    to: String,
}

impl Reprojector {
    /// Build a forward transform between two CRSs.
    pub fn new(from: &Crs, to: &Crs) -> Result<Self> {
        let (from, to) = (from.identifier(), to.identifier());

        let proj = Proj::new_known_crs(&from, &to, None).map_err(|e| {
            AnalysisError::Projection {
                from: from.clone(),
                to: to.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self { proj, from, to })
    }

    /// Transform every coordinate of a multipolygon into the target CRS.
    pub fn transform_multi_polygon(&self, multi: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        let polygons = multi
            .0
            .iter()
            .map(|p| self.transform_polygon(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(MultiPolygon::new(polygons))
    }

    fn transform_polygon(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>> {
        let exterior = self.transform_ring(polygon.exterior())?;
        let interiors = polygon
            .interiors()
            .iter()
            .map(|ring| self.transform_ring(ring))
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon::new(exterior, interiors))
    }

    /// Transform one ring, batching the whole coordinate array through PROJ.
    fn transform_ring(&self, ring: &LineString<f64>) -> Result<LineString<f64>> {
        let mut coords: Vec<(f64, f64)> = ring.0.iter().map(|c| (c.x, c.y)).collect();

        self.proj
            .convert_array(&mut coords)
            .map_err(|e| AnalysisError::Projection {
                from: self.from.clone(),
                to: self.to.clone(),
                reason: e.to_string(),
            })?;

        Ok(LineString::new(
            coords.into_iter().map(|(x, y)| Coord { x, y }).collect(),
        ))
    }
}

/// Reproject a multipolygon from one CRS to another.
///
/// Equivalent CRSs short-circuit to a clone; no transform is built, so a
/// request in the dataset's own CRS needs no PROJ database at all.
pub fn reproject(
    multi: &MultiPolygon<f64>,
    from: &Crs,
    to: &Crs,
) -> Result<MultiPolygon<f64>> {
    if from.is_equivalent(to) {
        return Ok(multi.clone());
    }

    Reprojector::new(from, to)?.transform_multi_polygon(multi)
}
