//! Zonal category histogram extraction
//!
//! Clips a category raster to a polygonal AOI and counts cells per distinct
//! category value. A cell belongs to the AOI when its center lies strictly
//! inside the polygon; partially covered cells whose center falls outside
//! are excluded. The scan is cropped to the AOI bounding box intersected
//! with the raster extent before any containment test runs.

use crate::stats::CategoryHistogram;
use cropfreq_core::Raster;
use geo::{BoundingRect, Contains, MultiPolygon, Point, Rect};
use std::ops::Range;

/// Key used when no raster cells intersect the queried zone.
pub const NODATA_KEY: &str = "nodata";

/// The histogram reported for a zone with no intersecting cells.
pub fn nodata_histogram() -> CategoryHistogram {
    CategoryHistogram::from([(NODATA_KEY.to_string(), 0)])
}

/// Count raster cells per category value inside a polygonal zone.
///
/// Returns the no-data histogram when the zone lies outside the raster
/// extent or covers no cell center. Counts otherwise sum to the number of
/// cell centers inside the zone.
pub fn category_histogram(raster: &Raster<i32>, aoi: &MultiPolygon<f64>) -> CategoryHistogram {
    let Some(rect) = aoi.bounding_rect() else {
        return nodata_histogram();
    };

    let Some((row_range, col_range)) = clip_window(raster, &rect) else {
        return nodata_histogram();
    };

    let mut counts = CategoryHistogram::new();
    for row in row_range {
        for col in col_range.clone() {
            let (x, y) = raster.pixel_to_geo(col, row);
            if !aoi.contains(&Point::new(x, y)) {
                continue;
            }
            // In-window indices are bounds-checked by construction
            let value = unsafe { raster.get_unchecked(row, col) };
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
    }

    if counts.is_empty() {
        return nodata_histogram();
    }

    counts
}

/// Pixel window covering the intersection of a bounding box with the
/// raster extent, or None when they do not overlap.
fn clip_window(raster: &Raster<i32>, rect: &Rect<f64>) -> Option<(Range<usize>, Range<usize>)> {
    let (rows, cols) = raster.shape();

    let corners = [
        (rect.min().x, rect.min().y),
        (rect.min().x, rect.max().y),
        (rect.max().x, rect.min().y),
        (rect.max().x, rect.max().y),
    ];

    let mut min_col = f64::INFINITY;
    let mut max_col = f64::NEG_INFINITY;
    let mut min_row = f64::INFINITY;
    let mut max_row = f64::NEG_INFINITY;

    for (x, y) in corners {
        let (col, row) = raster.geo_to_pixel(x, y);
        if col.is_nan() || row.is_nan() {
            return None;
        }
        min_col = min_col.min(col);
        max_col = max_col.max(col);
        min_row = min_row.min(row);
        max_row = max_row.max(row);
    }

    let col_start = min_col.floor().max(0.0) as usize;
    let col_end = (max_col.ceil().min(cols as f64).max(0.0)) as usize;
    let row_start = min_row.floor().max(0.0) as usize;
    let row_end = (max_row.ceil().min(rows as f64).max(0.0)) as usize;

    if col_start >= col_end || row_start >= row_end {
        return None;
    }

    Some((row_start..row_end, col_start..col_end))
}
