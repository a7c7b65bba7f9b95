//! GeoTIFF reading
//!
//! Read-only decoding of single-band category rasters using the `tiff`
//! crate: band data, the ModelPixelScale/ModelTiepoint transform tags, and
//! the EPSG code from the GeoKeyDirectory. Datasets are write-once inputs;
//! there is no encoder here.

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

// GeoTIFF tag numbers
const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;

// GeoKey ids carrying an EPSG code
const GEOGRAPHIC_TYPE_GEO_KEY: u64 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u64 = 3072;

/// Read a GeoTIFF file into a Raster
///
/// # Arguments
/// * `path` - Path to the GeoTIFF file
///
/// # Example
/// ```ignore
/// let raster: Raster<i32> = read_geotiff("corn.tif")?;
/// ```
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(file)
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8]) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data))
}

/// Internal: decode a GeoTIFF from any `Read + Seek` source
fn decode_geotiff<T, R>(reader: R) -> Result<Raster<T>>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Decode(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Decode(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Decode(format!("Cannot read image data: {}", e)))?;

    // Category rasters are integer-typed; reject float imagery outright
    let data: Vec<T> = match result {
        DecodingResult::U8(buf) => cast_buffer(&buf)?,
        DecodingResult::U16(buf) => cast_buffer(&buf)?,
        DecodingResult::U32(buf) => cast_buffer(&buf)?,
        DecodingResult::I8(buf) => cast_buffer(&buf)?,
        DecodingResult::I16(buf) => cast_buffer(&buf)?,
        DecodingResult::I32(buf) => cast_buffer(&buf)?,
        _ => {
            return Err(Error::UnsupportedDataType(
                "category rasters must hold integer samples".to_string(),
            ))
        }
    };

    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;

    // Tags are optional in the container; absent tags leave the defaults
    if let Ok(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }

    if let Some(crs) = read_crs(&mut decoder) {
        raster.set_crs(Some(crs));
    }

    Ok(raster)
}

fn cast_buffer<S, T>(buf: &[S]) -> Result<Vec<T>>
where
    S: Copy + num_traits::NumCast + std::fmt::Debug,
    T: RasterElement,
{
    buf.iter()
        .map(|&v| {
            num_traits::cast(v).ok_or_else(|| {
                Error::UnsupportedDataType(format!("sample {:?} does not fit target type", v))
            })
        })
        .collect()
}

/// Attempt to read a GeoTransform from TIFF tags
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::Unknown(MODEL_PIXEL_SCALE))
        .map_err(|_| Error::Decode("No pixel scale tag".into()))?;

    let tiepoint = decoder
        .get_tag_f64_vec(Tag::Unknown(MODEL_TIEPOINT))
        .map_err(|_| Error::Decode("No tiepoint tag".into()))?;

    if scale.len() >= 2 && tiepoint.len() >= 6 {
        // tiepoint: [I, J, K, X, Y, Z]
        // scale: [ScaleX, ScaleY, ScaleZ]
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
        let pixel_width = scale[0];
        let pixel_height = -scale[1]; // Negative for north-up

        return Ok(GeoTransform::new(
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        ));
    }

    Err(Error::Decode("Cannot determine geotransform".into()))
}

/// Attempt to read the CRS from the GeoKeyDirectory tag
fn read_crs<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<Crs> {
    let directory = decoder
        .get_tag_u64_vec(Tag::Unknown(GEO_KEY_DIRECTORY))
        .ok()?;

    epsg_from_geokeys(&directory).map(Crs::from_epsg)
}

/// Scan a GeoKeyDirectory for an EPSG code.
///
/// The directory is a 4-word header followed by (key_id, tag_location,
/// count, value) quads; a zero tag_location means the value is stored
/// inline. A projected CS key wins over a geographic one when both exist.
fn epsg_from_geokeys(directory: &[u64]) -> Option<u32> {
    if directory.len() < 4 {
        return None;
    }

    let mut geographic = None;
    let mut projected = None;

    for quad in directory[4..].chunks_exact(4) {
        let (key_id, tag_location, value) = (quad[0], quad[1], quad[3]);
        if tag_location != 0 {
            continue;
        }
        match key_id {
            GEOGRAPHIC_TYPE_GEO_KEY => geographic = Some(value as u32),
            PROJECTED_CS_TYPE_GEO_KEY => projected = Some(value as u32),
            _ => {}
        }
    }

    projected.or(geographic).filter(|&code| code != 0 && code != 32767)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsg_from_geokeys_projected() {
        // Version header + GTModelType + ProjectedCSType
        let directory = vec![
            1, 1, 0, 2, //
            1024, 0, 1, 1, //
            3072, 0, 1, 32614,
        ];
        assert_eq!(epsg_from_geokeys(&directory), Some(32614));
    }

    #[test]
    fn test_epsg_from_geokeys_geographic() {
        let directory = vec![
            1, 1, 0, 2, //
            1024, 0, 1, 2, //
            2048, 0, 1, 4326,
        ];
        assert_eq!(epsg_from_geokeys(&directory), Some(4326));
    }

    #[test]
    fn test_epsg_from_geokeys_projected_wins() {
        let directory = vec![
            1, 1, 0, 3, //
            1024, 0, 1, 1, //
            2048, 0, 1, 4269, //
            3072, 0, 1, 5070,
        ];
        assert_eq!(epsg_from_geokeys(&directory), Some(5070));
    }

    #[test]
    fn test_epsg_from_geokeys_user_defined_is_none() {
        // 32767 marks a user-defined CRS; there is no EPSG code to extract
        let directory = vec![
            1, 1, 0, 1, //
            3072, 0, 1, 32767,
        ];
        assert_eq!(epsg_from_geokeys(&directory), None);
        assert_eq!(epsg_from_geokeys(&[]), None);
    }
}
