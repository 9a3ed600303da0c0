//! Common types and utilities shared across the geotoolz crates.

pub mod array;
pub mod bbox;
pub mod crs;
pub mod dataset;
pub mod encoders;
pub mod error;
pub mod labeled;
pub mod time;
pub mod validation;

pub use array::{Attrs, Coords, DataArray, VarData, Variable};
pub use bbox::BoundingBox;
pub use crs::{Crs, CrsParseError};
pub use dataset::Dataset;
pub use error::{GeoError, GeoResult};
pub use labeled::Labeled;
pub use time::{Period, TimeUnit};
pub use validation::{validate_latitude, validate_longitude};
