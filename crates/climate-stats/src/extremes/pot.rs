use geo_common::DataArray;
use ndarray::{Axis, Zip};
use tracing::debug;

use super::block_maxima::calculate_block_maxima_ts;
use super::blocks::{broadcast_field, Boundary, Side};
use crate::error::{Result, StatsError};
use crate::reduce::nan_quantile;

/// Default exceedance quantile.
pub const DEFAULT_QUANTILE: f64 = 0.98;

/// Per-location quantile `q` over time (linear interpolation, NaN skipped).
///
/// The time dimension is removed; the quantile is recorded in the attrs.
pub fn calculate_pot_quantile(da: &DataArray, q: f64) -> Result<DataArray> {
    if !(0.0..=1.0).contains(&q) {
        return Err(StatsError::InvalidQuantile(q));
    }
    let time_dim = da.time_dim()?.to_string();
    let mut out = da.reduce(&time_dim, |lane| nan_quantile(lane.iter().copied(), q))?;
    out.attrs.insert("quantile".to_string(), q.into());
    Ok(out)
}

/// Peaks-over-threshold series: values at or above the `q` quantile.
///
/// Other values become NaN. Without declustering, time steps with no
/// exceedance anywhere are dropped. With `decluster_freq`, block maxima over
/// that many steps are taken and blocks containing any NaN are dropped.
pub fn calculate_pot_ts(da: &DataArray, q: f64, decluster_freq: Option<usize>) -> Result<DataArray> {
    let threshold = calculate_pot_quantile(da, q)?;
    let thresholds = broadcast_field(da, &threshold)?;

    let mut peaks = da.clone();
    Zip::from(&mut peaks.data).and(&thresholds).for_each(|v, &t| {
        if !(*v >= t) {
            *v = f64::NAN;
        }
    });

    let (series, keep): (DataArray, Vec<bool>) = match decluster_freq {
        None => {
            let ax = peaks.axis(peaks.time_dim()?)?;
            let keep = peaks
                .data
                .axis_iter(Axis(ax))
                .map(|step| step.iter().any(|v| !v.is_nan()))
                .collect();
            (peaks, keep)
        }
        Some(freq) => {
            let maxima = calculate_block_maxima_ts(&peaks, freq, Boundary::Trim, Side::Right)?;
            let ax = maxima.axis(maxima.time_dim()?)?;
            let keep = maxima
                .data
                .axis_iter(Axis(ax))
                .map(|step| step.iter().all(|v| !v.is_nan()))
                .collect();
            (maxima, keep)
        }
    };

    let time_dim = series.time_dim()?.to_string();
    let out = series.isel_mask(&time_dim, &keep)?;
    debug!(
        name = da.name.as_deref().unwrap_or(""),
        quantile = q,
        decluster = ?decluster_freq,
        kept = out.dim_size(&time_dim)?,
        "Computed peaks over threshold"
    );
    Ok(out)
}
