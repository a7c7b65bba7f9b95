//! # CropFreq Core
//!
//! Core types and I/O for crop frequency analysis.
//!
//! This crate provides:
//! - `Raster<T>`: Generic raster grid type for category datasets
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `Crs`: Coordinate Reference System handling
//! - Read-only GeoTIFF decoding

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::Crs;
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};
