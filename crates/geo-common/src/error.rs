//! Error types shared by the geotoolz crates.

use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Primary error type for labeled-array operations.
#[derive(Debug, Error)]
pub enum GeoError {
    // === Structure Errors ===
    #[error("Dimension not found: {0}")]
    MissingDimension(String),

    #[error("Coordinate not found: {0}")]
    MissingCoordinate(String),

    #[error("Variable not found: {0}")]
    MissingVariable(String),

    #[error("Shape mismatch for '{name}': expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Conflicting size for dimension '{dim}': {existing} vs {new}")]
    DimensionConflict {
        dim: String,
        existing: usize,
        new: usize,
    },

    #[error("Coordinate '{name}' is not of kind {expected}")]
    WrongKind { name: String, expected: &'static str },

    #[error("Index {index} out of bounds for dimension '{dim}' of size {size}")]
    IndexOutOfBounds {
        dim: String,
        index: usize,
        size: usize,
    },

    // === Value Errors ===
    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("Invalid attribute '{name}': {message}")]
    InvalidAttribute { name: String, message: String },

    #[error("Array error: {0}")]
    Array(String),
}

impl GeoError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(name: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            name: name.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Create an InvalidAttribute error.
    pub fn invalid_attribute(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<ndarray::ShapeError> for GeoError {
    fn from(err: ndarray::ShapeError) -> Self {
        GeoError::Array(err.to_string())
    }
}
