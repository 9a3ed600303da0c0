//! Error types for coordinate conversions.

use geo_common::GeoError;
use thiserror::Error;

/// Result type alias using ProjectionError.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Errors that can occur while converting coordinates.
#[derive(Error, Debug)]
pub enum ProjectionError {
    /// The CRS is not in the built-in registry and is not a PROJ string.
    #[error("unsupported CRS: {0}")]
    UnsupportedCrs(String),

    /// proj4rs rejected the projection definition.
    #[error("failed to initialise projection {crs}: {message}")]
    ProjInit { crs: String, message: String },

    /// A point could not be transformed.
    #[error("transform failed for ({x}, {y}): {message}")]
    TransformFailed { x: f64, y: f64, message: String },

    /// Coordinate slices of different length.
    #[error("coordinate length mismatch: {x} x values, {y} y values")]
    LengthMismatch { x: usize, y: usize },

    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl ProjectionError {
    /// Create a ProjInit error.
    pub fn proj_init(crs: impl ToString, message: impl Into<String>) -> Self {
        Self::ProjInit {
            crs: crs.to_string(),
            message: message.into(),
        }
    }
}
