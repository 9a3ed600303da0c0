//! Synthetic data generators for creating predictable geospatial test data.
//!
//! The generators build [`DataArray`]/[`Dataset`] values whose statistics are
//! known in closed form, so results can be verified exactly.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use geo_common::{DataArray, Dataset, Variable};
use ndarray::{Array1, Array3};

/// `n` consecutive days starting at midnight UTC on `year-01-01`.
pub fn daily_times(year: i32, n: usize) -> Vec<DateTime<Utc>> {
    let start = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .expect("valid start date");
    (0..n).map(|i| start + Duration::days(i as i64)).collect()
}

/// Evenly spaced values `start, start + step, ...` (`n` of them).
pub fn linspace(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Value of a pure annual cycle for a day of year.
pub fn seasonal_value(day_of_year: u32) -> f64 {
    10.0 * (2.0 * std::f64::consts::PI * day_of_year as f64 / 366.0).sin()
}

/// Daily gridded `(time, lat, lon)` array with values from `f(time, lat, lon)`.
pub fn gridded_daily<F>(year: i32, n_days: usize, lat: &[f64], lon: &[f64], f: F) -> DataArray
where
    F: Fn(DateTime<Utc>, f64, f64) -> f64,
{
    let times = daily_times(year, n_days);
    let data = Array3::from_shape_fn((n_days, lat.len(), lon.len()), |(t, j, i)| {
        f(times[t], lat[j], lon[i])
    });
    DataArray::new(vec!["time", "lat", "lon"], data.into_dyn())
        .and_then(|da| da.with_coord("time", Variable::time1("time", times)))
        .and_then(|da| da.with_coord("lat", Variable::float1("lat", lat.to_vec())))
        .and_then(|da| da.with_coord("lon", Variable::float1("lon", lon.to_vec())))
        .expect("consistent generated grid")
        .with_name("sst")
}

/// Multi-year daily series on a small grid that depends only on day of year.
///
/// Its day-of-year climatology equals [`seasonal_value`] and its anomalies are zero.
pub fn seasonal_cycle_series(years: usize) -> DataArray {
    let n_days = (years as f64 * 365.25).floor() as usize;
    gridded_daily(2001, n_days, &[10.0, 20.0], &[0.0, 5.0, 10.0], |t, _, _| {
        seasonal_value(t.ordinal())
    })
}

/// Single-location daily series `0, 1, 2, ...` along `time`.
pub fn ramp_series(n_days: usize) -> DataArray {
    let times = daily_times(2020, n_days);
    let values = Array1::from_iter((0..n_days).map(|i| i as f64));
    DataArray::new(vec!["time"], values.into_dyn())
        .and_then(|da| da.with_coord("time", Variable::time1("time", times)))
        .expect("consistent generated series")
        .with_name("ramp")
}

/// Along-track altimetry-like dataset with `n` observations along `time`.
///
/// Longitudes sweep 0..360 (so some are in the [180, 360) convention), latitudes
/// oscillate between -60 and 60. Data variables: `sla_filtered`, `mdt`, `lwe`.
pub fn along_track_dataset(n: usize) -> Dataset {
    let start = Utc
        .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .single()
        .expect("valid start date");
    let times: Vec<DateTime<Utc>> = (0..n)
        .map(|i| start + Duration::hours(6 * i as i64))
        .collect();
    let lon: Vec<f64> = (0..n).map(|i| (i as f64 * 7.3) % 360.0).collect();
    let lat: Vec<f64> = (0..n)
        .map(|i| 60.0 * (i as f64 * 0.1).sin())
        .collect();

    let mut ds = Dataset::new();
    let build = |ds: &mut Dataset| -> geo_common::GeoResult<()> {
        ds.assign_coord("time", Variable::time1("time", times.clone()))?;
        ds.assign_coord("lon", Variable::float1("time", lon.clone()))?;
        ds.assign_coord("lat", Variable::float1("time", lat.clone()))?;
        ds.insert_var(
            "sla_filtered",
            Variable::float1("time", (0..n).map(|i| 0.01 * i as f64).collect()),
        )?;
        ds.insert_var("mdt", Variable::float1("time", vec![0.5; n]))?;
        ds.insert_var("lwe", Variable::float1("time", vec![0.1; n]))?;
        Ok(())
    };
    build(&mut ds).expect("consistent along-track dataset");
    ds
}

/// Creates a grid with predictable values: `col * 1000 + row`, row-major.
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_times() {
        let times = daily_times(2020, 366);
        assert_eq!(times.len(), 366);
        assert_eq!(times[365].ordinal(), 366);
    }

    #[test]
    fn test_gridded_daily_shape() {
        let da = gridded_daily(2020, 4, &[0.0, 1.0], &[0.0, 1.0, 2.0], |_, lat, lon| lat + lon);
        assert_eq!(da.shape(), &[4, 2, 3]);
        assert_eq!(da.data[[3, 1, 2]], 3.0);
    }

    #[test]
    fn test_along_track_dataset() {
        let ds = along_track_dataset(50);
        assert_eq!(ds.dim_size("time").unwrap(), 50);
        assert!(ds.coord_f64("lon").unwrap().iter().any(|&x| x > 180.0));
    }

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(10, 5);
        assert_eq!(grid.len(), 50);
        assert_eq!(grid[1], 1000.0);
        assert_eq!(grid[10], 1.0);
    }
}
