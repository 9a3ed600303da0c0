//! Coordinate reference system conversions.
//!
//! WGS84 <-> Web Mercator uses closed-form math; every other pair goes
//! through proj4rs.

pub mod epsg;
pub mod error;
pub mod latlon;
pub mod mercator;
pub mod transform;

pub use error::{ProjectionError, ProjectionResult};
pub use latlon::{calc_latlon, convert_lat_lon_to_x_y, convert_x_y_to_lat_lon};
pub use transform::CoordTransformer;
