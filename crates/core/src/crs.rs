//! Coordinate Reference System handling

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    /// WKT representation
    wkt: Option<String>,
    /// EPSG code if known
    epsg: Option<u32>,
    /// PROJ string if available
    proj: Option<String>,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            wkt: None,
            epsg: Some(code),
            proj: None,
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkt: Some(wkt.into()),
            epsg: None,
            proj: None,
        }
    }

    /// Create a CRS from a PROJ string
    pub fn from_proj(proj: impl Into<String>) -> Self {
        Self {
            wkt: None,
            epsg: None,
            proj: Some(proj.into()),
        }
    }

    /// Parse a user-supplied CRS identifier.
    ///
    /// Accepts `EPSG:nnnn` (any case), a bare EPSG code, a PROJ string
    /// (`+proj=...`), or WKT.
    pub fn from_user_input(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(Error::InvalidCrs(input.to_string()));
        }

        if let Some(code) = trimmed
            .strip_prefix("EPSG:")
            .or_else(|| trimmed.strip_prefix("epsg:"))
        {
            return code
                .parse::<u32>()
                .map(Self::from_epsg)
                .map_err(|_| Error::InvalidCrs(input.to_string()));
        }

        if let Ok(code) = trimmed.parse::<u32>() {
            return Ok(Self::from_epsg(code));
        }

        if trimmed.starts_with('+') {
            return Ok(Self::from_proj(trimmed));
        }

        if trimmed.starts_with("GEOGCS")
            || trimmed.starts_with("PROJCS")
            || trimmed.starts_with("GEOGCRS")
            || trimmed.starts_with("PROJCRS")
        {
            return Ok(Self::from_wkt(trimmed));
        }

        Err(Error::InvalidCrs(input.to_string()))
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get WKT representation
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Get PROJ string
    pub fn proj(&self) -> Option<&str> {
        self.proj.as_deref()
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }

        // String comparison is imperfect but sufficient for same-source CRSs
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return a == b;
        }

        if let (Some(a), Some(b)) = (&self.proj, &other.proj) {
            return a == b;
        }

        false
    }

    /// Get a string identifier for this CRS, suitable for PROJ lookup
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(proj) = &self.proj {
            return proj.clone();
        }
        if let Some(wkt) = &self.wkt {
            return wkt.clone();
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = Crs::from_epsg(4326);
        assert_eq!(crs.epsg(), Some(4326));
        assert_eq!(crs.identifier(), "EPSG:4326");
    }

    #[test]
    fn test_from_user_input_epsg() {
        let crs = Crs::from_user_input("EPSG:4269").unwrap();
        assert_eq!(crs.epsg(), Some(4269));

        let crs = Crs::from_user_input("epsg:3857").unwrap();
        assert_eq!(crs.epsg(), Some(3857));

        let crs = Crs::from_user_input("32614").unwrap();
        assert_eq!(crs.epsg(), Some(32614));
    }

    #[test]
    fn test_from_user_input_proj_string() {
        let crs = Crs::from_user_input("+proj=longlat +datum=WGS84").unwrap();
        assert!(crs.proj().is_some());
        assert_eq!(crs.identifier(), "+proj=longlat +datum=WGS84");
    }

    #[test]
    fn test_from_user_input_rejects_garbage() {
        assert!(Crs::from_user_input("").is_err());
        assert!(Crs::from_user_input("EPSG:abc").is_err());
        assert!(Crs::from_user_input("not-a-crs").is_err());
    }

    #[test]
    fn test_crs_equivalence() {
        let a = Crs::from_epsg(4326);
        let b = Crs::wgs84();
        assert!(a.is_equivalent(&b));
        assert!(!a.is_equivalent(&Crs::from_epsg(3857)));
    }
}
