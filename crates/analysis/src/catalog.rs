//! Dataset catalog
//!
//! Enumerable sources of named category rasters. The analyzer opens each
//! dataset immediately before extraction and drops it right after, so a
//! source hands out fresh `Raster<i32>` values rather than shared handles.

use crate::error::{AnalysisError, Result};
use cropfreq_core::io::read_geotiff;
use cropfreq_core::Raster;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A source of named category raster datasets.
pub trait DatasetSource {
    /// Enumerate the dataset names available from this source.
    fn list(&self) -> Result<Vec<String>>;

    /// Open one dataset by name.
    fn open(&self, name: &str) -> Result<Raster<i32>>;
}

/// Datasets stored as `*.tif` files in a directory.
///
/// The dataset name is the file stem, matching how the files are published
/// (`corn.tif` → `corn`).
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DatasetSource for DirectorySource {
    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_tif = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tif"));
            if !is_tif {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    fn open(&self, name: &str) -> Result<Raster<i32>> {
        let path = self.dir.join(format!("{}.tif", name));
        if !path.is_file() {
            return Err(AnalysisError::DatasetNotFound(name.to_string()));
        }
        Ok(read_geotiff(path)?)
    }
}

/// In-memory datasets, for deterministic tests and embedding.
#[derive(Default)]
pub struct MemorySource {
    rasters: BTreeMap<String, Raster<i32>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset under a name.
    pub fn insert(&mut self, name: impl Into<String>, raster: Raster<i32>) {
        self.rasters.insert(name.into(), raster);
    }
}

impl DatasetSource for MemorySource {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.rasters.keys().cloned().collect())
    }

    fn open(&self, name: &str) -> Result<Raster<i32>> {
        self.rasters
            .get(name)
            .cloned()
            .ok_or_else(|| AnalysisError::DatasetNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_lists_sorted() {
        let mut source = MemorySource::new();
        source.insert("soybeans", Raster::new(2, 2));
        source.insert("corn", Raster::new(2, 2));

        assert_eq!(source.list().unwrap(), vec!["corn", "soybeans"]);
    }

    #[test]
    fn test_memory_source_missing_dataset() {
        let source = MemorySource::new();
        assert!(matches!(
            source.open("wheat"),
            Err(AnalysisError::DatasetNotFound(_))
        ));
    }
}
