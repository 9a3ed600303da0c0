//! Conversions between lon/lat and the projected `x`/`y` of a dataset.

use geo_common::{Crs, Dataset, GeoError, VarData, Variable};
use ndarray::Array2;
use tracing::{debug, warn};

use crate::error::ProjectionResult;
use crate::transform::CoordTransformer;

/// Project WGS84 longitudes/latitudes into `crs`. Returns `(x, y)`.
pub fn convert_lat_lon_to_x_y(
    crs: &Crs,
    lon: &[f64],
    lat: &[f64],
) -> ProjectionResult<(Vec<f64>, Vec<f64>)> {
    CoordTransformer::from_lonlat_to(crs)?.transform_slices(lon, lat)
}

/// Unproject `x`/`y` in `crs` to WGS84. Returns `(lon, lat)`.
pub fn convert_x_y_to_lat_lon(
    crs: &Crs,
    x: &[f64],
    y: &[f64],
) -> ProjectionResult<(Vec<f64>, Vec<f64>)> {
    CoordTransformer::to_lonlat_from(crs)?.transform_slices(x, y)
}

fn coord_1d(ds: &Dataset, name: &str) -> ProjectionResult<Vec<f64>> {
    let var = ds.coord(name)?;
    if var.dims.len() != 1 {
        return Err(GeoError::Array(format!("coordinate '{}' must be 1-d", name)).into());
    }
    Ok(var.as_float(name)?.iter().copied().collect())
}

/// Attach 2-D `latitude`/`longitude` coordinates over `(y, x)` to a projected dataset.
///
/// Points the projection cannot invert, and infinite results, become NaN.
pub fn calc_latlon(ds: &Dataset, crs: &Crs) -> ProjectionResult<Dataset> {
    let xs = coord_1d(ds, "x")?;
    let ys = coord_1d(ds, "y")?;
    let transformer = CoordTransformer::to_lonlat_from(crs)?;

    let shape = (ys.len(), xs.len());
    let mut lons = Array2::from_elem(shape, f64::NAN);
    let mut lats = Array2::from_elem(shape, f64::NAN);
    let mut failed = 0usize;

    for (j, &y) in ys.iter().enumerate() {
        for (i, &x) in xs.iter().enumerate() {
            match transformer.transform(x, y) {
                Ok((lon, lat)) => {
                    lons[[j, i]] = if lon.is_infinite() { f64::NAN } else { lon };
                    lats[[j, i]] = if lat.is_infinite() { f64::NAN } else { lat };
                }
                Err(_) => failed += 1,
            }
        }
    }
    if failed > 0 {
        warn!(failed, total = xs.len() * ys.len(), crs = %crs, "Points outside projection domain set to NaN");
    }

    let latitude = Variable::new(vec!["y", "x"], VarData::Float(lats.into_dyn()))?
        .with_attr("units", "degrees_north");
    let longitude = Variable::new(vec!["y", "x"], VarData::Float(lons.into_dyn()))?
        .with_attr("units", "degrees_east");

    let mut out = ds.clone();
    out.assign_coord("latitude", latitude)?;
    out.assign_coord("longitude", longitude)?;
    debug!(ny = shape.0, nx = shape.1, "Computed lon/lat for projected grid");
    Ok(out)
}
