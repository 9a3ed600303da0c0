//! Land, ocean basin and country masks.
//!
//! Region boundaries are read from GeoJSON feature collections (Natural Earth
//! layers by default) and evaluated at the lon/lat points of a [`Dataset`]
//! by ray casting.

pub mod error;
pub mod mask;
pub mod polygon;
pub mod region;

pub use error::{MaskError, MaskResult};
pub use mask::{add_country_mask, add_land_mask, add_ocean_mask, mask_3d};
pub use polygon::Polygon;
pub use region::{NaturalEarth, Region, RegionKeys, RegionSet, NATURAL_EARTH_DIR_ENV};

pub use geo_common::Dataset;
