//! Error types for grid processing.

use geo_common::GeoError;
use thiserror::Error;

/// Errors that can occur during grid processing.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// The grid definition is unusable (bounds, resolution, time axis).
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// A statistic name that the binning engine does not provide.
    #[error("unknown statistic: {0}")]
    UnknownStatistic(String),

    /// Input arrays have mismatched lengths.
    #[error("length mismatch: x={x}, y={y}, z={z}")]
    LengthMismatch { x: usize, y: usize, z: usize },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(String),

    /// Configuration document could not be parsed.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Labeled-array error.
    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl GridProcessorError {
    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }

    /// Create a ConfigError.
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<std::io::Error> for GridProcessorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ndarray::ShapeError> for GridProcessorError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Geo(err.into())
    }
}

impl From<serde_yaml::Error> for GridProcessorError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
