//! Deviations from a climatology.

use chrono::{DateTime, Utc};
use geo_common::{DataArray, GeoError, Variable};
use ndarray::Axis;
use std::collections::HashMap;
use tracing::debug;

use crate::climatology::{calculate_climatology, calculate_daily_climatology_smoothed, ClimatologyFreq};
use crate::error::Result;

/// Each observation minus the `freq` climatology at its key.
///
/// The result keeps the shape and coordinates of `da` and gains a key
/// coordinate (e.g. `dayofyear`) along time.
pub fn calculate_anomaly(da: &DataArray, freq: ClimatologyFreq) -> Result<DataArray> {
    let clim = calculate_climatology(da, freq)?;
    subtract_climatology(da, &clim, freq.key(), |t| freq.key_of(t))
}

/// Each observation minus the smoothed day-of-year climatology.
pub fn calculate_anomaly_daily_smoothed(da: &DataArray) -> Result<DataArray> {
    let clim = calculate_daily_climatology_smoothed(da)?;
    let freq = ClimatologyFreq::Day;
    subtract_climatology(da, &clim, freq.key(), |t| freq.key_of(t))
}

fn subtract_climatology<K>(da: &DataArray, clim: &DataArray, key: &str, key_of: K) -> Result<DataArray>
where
    K: Fn(&DateTime<Utc>) -> i64,
{
    let time_dim = da.time_dim()?.to_string();
    let ax = da.axis(&time_dim)?;
    let key_ax = clim.axis(key)?;
    let positions: HashMap<i64, usize> = clim
        .coord_f64(key)?
        .iter()
        .enumerate()
        .map(|(i, &v)| (v as i64, i))
        .collect();

    let times = da.time_values()?;
    let mut out = da.clone();
    let mut key_values = Vec::with_capacity(times.len());
    for (i, t) in times.iter().enumerate() {
        let k = key_of(t);
        let j = *positions
            .get(&k)
            .ok_or_else(|| GeoError::MissingCoordinate(format!("{} = {}", key, k)))?;
        let clim_slice = clim.data.index_axis(Axis(key_ax), j);
        let mut slice = out.data.index_axis_mut(Axis(ax), i);
        slice -= &clim_slice;
        key_values.push(k as f64);
    }
    out.assign_coord(key, Variable::float1(&time_dim, key_values))?;

    debug!(
        name = da.name.as_deref().unwrap_or(""),
        key,
        steps = times.len(),
        "Computed anomalies"
    );
    Ok(out)
}
