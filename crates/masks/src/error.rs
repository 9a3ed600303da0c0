//! Error types for region masks.

use geo_common::GeoError;
use thiserror::Error;

/// Result type alias using MaskError.
pub type MaskResult<T> = Result<T, MaskError>;

/// Errors that can occur while loading regions or building masks.
#[derive(Error, Debug)]
pub enum MaskError {
    /// The boundary document is not valid GeoJSON.
    #[error("failed to parse GeoJSON: {0}")]
    Parse(String),

    /// A feature geometry other than Polygon or MultiPolygon.
    #[error("unsupported geometry in feature {feature}: {message}")]
    UnsupportedGeometry { feature: usize, message: String },

    /// No region with the requested name.
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    /// No directory configured for the Natural Earth files.
    #[error("Natural Earth directory not set (GEOTOOLZ_NATURAL_EARTH_DIR)")]
    MissingDataDir,

    #[error("io error: {0}")]
    Io(String),

    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl MaskError {
    /// Create an UnsupportedGeometry error.
    pub fn unsupported_geometry(feature: usize, message: impl Into<String>) -> Self {
        Self::UnsupportedGeometry {
            feature,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for MaskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MaskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
