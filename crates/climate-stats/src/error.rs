//! Error types for climate statistics.

use geo_common::GeoError;
use thiserror::Error;

/// Errors that can occur while computing climate statistics.
#[derive(Error, Debug)]
pub enum StatsError {
    /// Quantile outside [0, 1].
    #[error("invalid quantile {0}: must be within [0, 1]")]
    InvalidQuantile(f64),

    /// Block size of zero.
    #[error("invalid block size {0}: must be > 0")]
    InvalidBlockSize(usize),

    /// `Boundary::Exact` with a length that is not a multiple of the block size.
    #[error("length {len} is not a multiple of block size {block}")]
    InexactBoundary { len: usize, block: usize },

    /// Unrecognised climatology frequency, boundary or side name.
    #[error("unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },

    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl StatsError {
    /// Create an UnknownOption error.
    pub fn unknown_option(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownOption {
            kind,
            value: value.into(),
        }
    }
}

/// Result type for climate statistics.
pub type Result<T> = std::result::Result<T, StatsError>;
