//! Regular lon-lat and lon-lat-time target grids.

use chrono::{DateTime, Utc};
use geo_common::{validate_latitude, validate_longitude, BoundingBox, Dataset, Period, TimeUnit, Variable};
use tracing::debug;

use crate::binning::{Axis, Binning2D};
use crate::error::{GridProcessorError, Result};

/// A north-up regular grid in WGS84 degrees.
///
/// Longitude centres ascend from the west edge, latitude centres descend from
/// the north edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularLonLat {
    pub bbox: BoundingBox,
    pub resolution: f64,
    coordinates: Dataset,
}

impl RegularLonLat {
    /// Build a grid covering `lon_bnds` x `lat_bnds`, snapped outward to `resolution`.
    pub fn init_from_bounds(
        lon_bnds: (f64, f64),
        lat_bnds: (f64, f64),
        resolution: f64,
    ) -> Result<Self> {
        if !(resolution > 0.0) || !resolution.is_finite() {
            return Err(GridProcessorError::invalid_grid(format!(
                "resolution must be > 0, got {}",
                resolution
            )));
        }
        let bbox = BoundingBox::from_xy(lon_bnds, lat_bnds)
            .map_err(|e| GridProcessorError::invalid_grid(e.to_string()))?;

        let snapped = bbox.snap_to_resolution(resolution);
        let nx = (snapped.width() / resolution).round().max(1.0) as usize;
        let ny = (snapped.height() / resolution).round().max(1.0) as usize;

        let lon: Vec<f64> = (0..nx)
            .map(|i| snapped.min_x + (i as f64 + 0.5) * resolution)
            .collect();
        let lat: Vec<f64> = (0..ny)
            .map(|j| snapped.max_y - (j as f64 + 0.5) * resolution)
            .collect();

        let mut coords = Dataset::new();
        coords.assign_coord("lon", Variable::float1("lon", lon))?;
        coords.assign_coord("lat", Variable::float1("lat", lat))?;
        let coords = validate_longitude(&validate_latitude(&coords)?)?;

        debug!(nx, ny, resolution, bbox = ?snapped, "Created regular lon-lat grid");
        Ok(Self {
            bbox: snapped,
            resolution,
            coordinates: coords,
        })
    }

    /// Dataset holding the `lon` and `lat` coordinates.
    pub fn coordinates(&self) -> &Dataset {
        &self.coordinates
    }

    /// `(n_lat, n_lon)`
    pub fn shape(&self) -> (usize, usize) {
        let dims = self.coordinates.dims();
        (
            dims.get("lat").copied().unwrap_or(0),
            dims.get("lon").copied().unwrap_or(0),
        )
    }

    pub fn lon(&self) -> Result<Vec<f64>> {
        Ok(self.coordinates.coord_f64("lon")?.iter().copied().collect())
    }

    pub fn lat(&self) -> Result<Vec<f64>> {
        Ok(self.coordinates.coord_f64("lat")?.iter().copied().collect())
    }

    /// A fresh binning engine over this grid's cell centres.
    ///
    /// Longitude is circular, so observations in either the [-180, 180) or
    /// [0, 360) convention land in the same cells.
    pub fn binning(&self) -> Result<Binning2D> {
        let (ny, nx) = self.shape();
        let x = Axis::regular(
            self.bbox.min_x + 0.5 * self.resolution,
            self.resolution,
            nx,
            true,
        )?;
        let y = Axis::regular(
            self.bbox.max_y - 0.5 * self.resolution,
            -self.resolution,
            ny,
            false,
        )?;
        Ok(Binning2D::new(x, y))
    }
}

/// A [`RegularLonLat`] grid with a regular time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularLonLatTime {
    pub grid: RegularLonLat,
    pub period: Period,
    times: Vec<DateTime<Utc>>,
    coordinates: Dataset,
}

impl RegularLonLatTime {
    #[allow(clippy::too_many_arguments)]
    pub fn init_from_bounds(
        lon_bnds: (f64, f64),
        lat_bnds: (f64, f64),
        resolution: f64,
        time_min: &str,
        time_max: &str,
        time_step: f64,
        time_unit: &str,
    ) -> Result<Self> {
        let grid = RegularLonLat::init_from_bounds(lon_bnds, lat_bnds, resolution)?;
        let unit = TimeUnit::parse(time_unit)?;
        let period = Period::new(time_min, time_max, time_step, unit);
        Self::init_from_grid_and_period(grid, period)
    }

    pub fn init_from_grid_and_period(grid: RegularLonLat, period: Period) -> Result<Self> {
        let times = period.date_range()?;
        let mut coordinates = grid.coordinates().clone();
        coordinates.assign_coord("time", Variable::time1("time", times.clone()))?;
        debug!(n_time = times.len(), freq = %period.freq(), "Added time axis to grid");
        Ok(Self {
            grid,
            period,
            times,
            coordinates,
        })
    }

    /// Dataset holding the `lon`, `lat` and `time` coordinates.
    pub fn coordinates(&self) -> &Dataset {
        &self.coordinates
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    /// `(n_time, n_lat, n_lon)`
    pub fn shape(&self) -> (usize, usize, usize) {
        let (ny, nx) = self.grid.shape();
        (self.times.len(), ny, nx)
    }

    pub fn binning(&self) -> Result<Binning2D> {
        self.grid.binning()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_coordinates() {
        let grid = RegularLonLat::init_from_bounds((-10.0, 10.0), (-5.0, 5.0), 1.0).unwrap();
        assert_eq!(grid.shape(), (10, 20));

        let lon = grid.lon().unwrap();
        assert_eq!(lon[0], -9.5);
        assert_eq!(lon[19], 9.5);
        assert!(lon.windows(2).all(|w| w[1] > w[0]));

        let lat = grid.lat().unwrap();
        assert_eq!(lat[0], 4.5);
        assert_eq!(lat[9], -4.5);
        assert!(lat.windows(2).all(|w| w[1] < w[0]));

        let lon_attrs = &grid.coordinates().coords["lon"].attrs;
        assert_eq!(lon_attrs["units"], "degrees_east");
    }

    #[test]
    fn test_binning_keeps_dateline_points() {
        let grid = RegularLonLat::init_from_bounds((-180.0, 180.0), (-90.0, 90.0), 1.0).unwrap();
        let mut binning = grid.binning().unwrap();
        let binned = binning
            .push(&[-180.0, 180.0, -179.9], &[0.5, 0.5, 0.5], &[1.0, 2.0, 3.0])
            .unwrap();
        assert_eq!(binned, 3);

        let grid = RegularLonLat::init_from_bounds((0.0, 360.0), (-90.0, 90.0), 0.25).unwrap();
        let mut binning = grid.binning().unwrap();
        let binned = binning.push(&[0.0, 0.1], &[0.1, 0.1], &[1.0, 2.0]).unwrap();
        assert_eq!(binned, 2);
    }

    #[test]
    fn test_grid_snaps_outward() {
        let grid = RegularLonLat::init_from_bounds((0.3, 1.7), (0.1, 0.9), 0.5).unwrap();
        assert_eq!(grid.bbox.min_x, 0.0);
        assert_eq!(grid.bbox.max_x, 2.0);
        assert_eq!(grid.shape(), (2, 4));
    }

    #[test]
    fn test_grid_wraps_longitudes() {
        let grid = RegularLonLat::init_from_bounds((0.0, 360.0), (-90.0, 90.0), 90.0).unwrap();
        assert_eq!(grid.lon().unwrap(), vec![45.0, 135.0, -135.0, -45.0]);
    }

    #[test]
    fn test_invalid_grid() {
        assert!(RegularLonLat::init_from_bounds((0.0, 10.0), (0.0, 10.0), 0.0).is_err());
        assert!(RegularLonLat::init_from_bounds((10.0, 0.0), (0.0, 10.0), 1.0).is_err());
        assert!(RegularLonLat::init_from_bounds((0.0, 10.0), (0.0, 10.0), f64::NAN).is_err());
    }

    #[test]
    fn test_grid_with_time() {
        let grid = RegularLonLatTime::init_from_bounds(
            (-10.0, 10.0),
            (-5.0, 5.0),
            2.0,
            "2020-01-01",
            "2020-01-10",
            1.0,
            "D",
        )
        .unwrap();
        assert_eq!(grid.shape(), (10, 5, 10));
        assert_eq!(grid.coordinates().dim_size("time").unwrap(), 10);
        assert_eq!(grid.period.freq(), "1D");
    }

    #[test]
    fn test_binning_matches_shape() {
        let grid = RegularLonLat::init_from_bounds((-10.0, 10.0), (-5.0, 5.0), 0.25).unwrap();
        let binning = grid.binning().unwrap();
        assert_eq!(binning.shape(), grid.shape());
    }
}
