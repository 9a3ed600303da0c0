//! Regridding scattered or gridded observations onto regular target grids.

use chrono::{DateTime, Utc};
use geo_common::time::to_epoch_nanos;
use geo_common::{
    validate_latitude, validate_longitude, DataArray, Dataset, GeoError, Variable,
};
use tracing::{debug, info};

use crate::binning::{Binning2D, Statistic};
use crate::error::{GridProcessorError, Result};
use crate::grid::{RegularLonLat, RegularLonLatTime};

/// Bin `da` onto `target_grid` with a fresh binning engine.
pub fn da_binning_2d(
    da: &DataArray,
    target_grid: &RegularLonLat,
    statistic: Statistic,
) -> Result<DataArray> {
    let mut binning = target_grid.binning()?;
    apply_binning_2d(da, &mut binning, statistic)
}

/// Bin every finite value of `da` at its `lon`/`lat` into `binning`.
///
/// The binning is cleared first. The result has dims `(lat, lon)` and keeps
/// the name and attributes of `da`.
pub fn apply_binning_2d(
    da: &DataArray,
    binning: &mut Binning2D,
    statistic: Statistic,
) -> Result<DataArray> {
    binning.clear();

    let lons = da.broadcast_coord("lon")?;
    let lats = da.broadcast_coord("lat")?;

    let n = da.data.len();
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    let mut z = Vec::with_capacity(n);
    for ((&v, &lon), &lat) in da.data.iter().zip(lons.iter()).zip(lats.iter()) {
        if v.is_finite() {
            x.push(lon);
            y.push(lat);
            z.push(v);
        }
    }
    let binned = binning.push(&x, &y, &z)?;
    debug!(
        name = da.name.as_deref().unwrap_or(""),
        finite = z.len(),
        binned,
        statistic = %statistic,
        "Binned values"
    );

    let grid = binning.variable(statistic);
    let mut out = DataArray::new(vec!["lat", "lon"], grid.into_dyn())?
        .with_coord("lon", Variable::float1("lon", binning.x().values().to_vec()))?
        .with_coord("lat", Variable::float1("lat", binning.y().values().to_vec()))?
        .with_attrs(da.attrs.clone());
    out.name = da.name.clone();

    Ok(validate_longitude(&validate_latitude(&out)?)?)
}

/// Half-open selection windows `(t - t_res/2, t + t_res/2]` around each target time.
fn time_windows(target: &[DateTime<Utc>]) -> Result<Vec<(i64, i64)>> {
    if target.len() < 2 {
        return Err(GridProcessorError::invalid_grid(
            "time binning needs at least two target time steps",
        ));
    }
    let nanos = target
        .iter()
        .map(to_epoch_nanos)
        .collect::<std::result::Result<Vec<_>, GeoError>>()?;
    let total = nanos[nanos.len() - 1] - nanos[0];
    let half = total / (2 * (nanos.len() as i64 - 1));
    Ok(nanos.iter().map(|&t| (t - half, t + half)).collect())
}

fn window_mask(times: &[i64], (lo, hi): (i64, i64)) -> Vec<bool> {
    times.iter().map(|&t| t > lo && t <= hi).collect()
}

fn epoch_times(times: &[DateTime<Utc>]) -> Result<Vec<i64>> {
    Ok(times
        .iter()
        .map(to_epoch_nanos)
        .collect::<std::result::Result<Vec<_>, GeoError>>()?)
}

/// Bin `da` separately for every time step of `target_grid`.
///
/// Output dims are `(time, lat, lon)`. Windows without observations hold the
/// empty-cell value of the statistic.
pub fn da_binning_2d_time(
    da: &DataArray,
    target_grid: &RegularLonLatTime,
    statistic: Statistic,
) -> Result<DataArray> {
    let windows = time_windows(target_grid.times())?;
    let time_dim = da.time_dim()?.to_string();
    let times = epoch_times(&da.time_values()?)?;
    let mut binning = target_grid.binning()?;

    let mut grids = Vec::with_capacity(windows.len());
    for (k, window) in windows.iter().enumerate() {
        let subset = da.isel_mask(&time_dim, &window_mask(&times, *window))?;
        debug!(
            step = k,
            time = %target_grid.times()[k],
            n_obs = subset.dim_size(&time_dim)?,
            "Binning time window"
        );
        grids.push(apply_binning_2d(&subset, &mut binning, statistic)?);
    }

    let time_coord = Variable::time1("time", target_grid.times().to_vec());
    let out = DataArray::concat(&grids, "time", Some(time_coord))?;
    info!(
        name = da.name.as_deref().unwrap_or(""),
        n_time = windows.len(),
        statistic = %statistic,
        "Completed time binning"
    );
    Ok(out)
}

/// Dataset form of [`da_binning_2d_time`].
///
/// `data_vars` defaults to every data variable other than `time`, `lat` and `lon`.
pub fn ds_binning_2d_time(
    ds: &Dataset,
    target_grid: &RegularLonLatTime,
    statistic: Statistic,
    data_vars: Option<&[&str]>,
) -> Result<Dataset> {
    let names: Vec<String> = match data_vars {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => ds
            .data_var_names()
            .into_iter()
            .filter(|n| !matches!(n.as_str(), "time" | "lat" | "lon"))
            .collect(),
    };
    let windows = time_windows(target_grid.times())?;
    let time_var = ds.coord("time")?;
    let time_dim = match time_var.dims.as_slice() {
        [d] => d.clone(),
        other => {
            return Err(GeoError::Array(format!("time coordinate must be 1-d, found {:?}", other)).into())
        }
    };
    let times = epoch_times(&ds.time_values()?)?;
    let mut binning = target_grid.binning()?;

    let mut grids = Vec::with_capacity(windows.len());
    for (k, window) in windows.iter().enumerate() {
        let subset = ds.isel_mask(&time_dim, &window_mask(&times, *window))?;
        debug!(
            step = k,
            time = %target_grid.times()[k],
            n_obs = subset.dim_size(&time_dim)?,
            "Binning time window"
        );
        let mut step = Dataset::new();
        for name in &names {
            let binned = apply_binning_2d(&subset.data_array(name)?, &mut binning, statistic)?;
            step.insert_array(name, binned)?;
        }
        grids.push(step);
    }

    let time_coord = Variable::time1("time", target_grid.times().to_vec());
    let out = Dataset::concat(&grids, "time", Some(time_coord))?;
    info!(
        n_vars = names.len(),
        n_time = windows.len(),
        statistic = %statistic,
        "Completed dataset time binning"
    );
    Ok(out)
}

/// Make the 1-d variable `v` a dimension by swapping it with the dimension it spans.
pub fn to_dim(ds: &Dataset, v: &str) -> Result<Dataset> {
    if ds.dims().contains_key(v) {
        return Ok(ds.clone());
    }
    let mut out = ds.clone();
    if let Some(var) = out.data_vars.remove(v) {
        out.coords.insert(v.to_string(), var);
    }
    let var = out.coord(v)?;
    let [dim] = var.dims.as_slice() else {
        return Err(GeoError::Array(format!(
            "'{}' must be 1-d to become a dimension, found dims {:?}",
            v, var.dims
        ))
        .into());
    };
    let dim = dim.clone();
    Ok(out.swap_dims(&dim, v)?)
}
