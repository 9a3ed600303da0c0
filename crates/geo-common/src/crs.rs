//! Coordinate Reference System identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// EPSG code of WGS84 geographic coordinates.
pub const EPSG_WGS84: u32 = 4326;

/// EPSG code of Web Mercator.
pub const EPSG_WEB_MERCATOR: u32 = 3857;

/// A coordinate reference system, either a registry code or a raw PROJ string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crs {
    /// EPSG registry code, e.g. 4326.
    Epsg(u32),
    /// PROJ.4 definition, e.g. "+proj=utm +zone=33 +datum=WGS84".
    Proj(String),
}

impl Crs {
    /// WGS84 lon/lat.
    pub fn wgs84() -> Self {
        Crs::Epsg(EPSG_WGS84)
    }

    /// Parse a CRS string.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326" / "epsg:4326" / "4326"
    /// - "CRS:84" (equivalent to EPSG:4326 with lon/lat axis order)
    /// - "+proj=longlat +datum=WGS84"
    pub fn parse(s: &str) -> Result<Self, CrsParseError> {
        let trimmed = s.trim();
        if trimmed.starts_with("+proj=") || trimmed.starts_with("+init=") {
            return Ok(Crs::Proj(trimmed.to_string()));
        }

        let normalized = trimmed.to_uppercase();
        if normalized == "CRS:84" || normalized == "OGC:CRS84" {
            return Ok(Crs::Epsg(EPSG_WGS84));
        }

        let code = normalized.strip_prefix("EPSG:").unwrap_or(&normalized);
        code.parse::<u32>()
            .map(Crs::Epsg)
            .map_err(|_| CrsParseError::UnsupportedCrs(s.to_string()))
    }

    /// EPSG code, if this CRS is a registry code.
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Crs::Epsg(code) => Some(*code),
            Crs::Proj(_) => None,
        }
    }

    /// Check if this is a geographic (lat/lon in degrees) CRS.
    pub fn is_geographic(&self) -> bool {
        match self {
            Crs::Epsg(code) => matches!(code, 4326 | 4269 | 4258 | 4979),
            Crs::Proj(def) => def.contains("+proj=longlat") || def.contains("+proj=latlong"),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Epsg(code) => write!(f, "EPSG:{}", code),
            Crs::Proj(def) => write!(f, "{}", def),
        }
    }
}

impl std::str::FromStr for Crs {
    type Err = CrsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Crs::parse(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
