use geo_common::DataArray;
use tracing::debug;

use super::blocks::{blocked_array, broadcast_field, reduce_blocks, Blocks, Boundary, Side};
use super::pot::calculate_pot_quantile;
use crate::error::Result;

/// Default point-process block length in time steps.
pub const DEFAULT_PP_BLOCK_SIZE: usize = 5;

/// Number of values strictly above the `q` quantile in each block.
///
/// Blocks are labeled by the time at their centre slot `(time_freq - 1) / 2`.
pub fn calculate_pp_counts_ts(
    da: &DataArray,
    q: f64,
    time_freq: usize,
    boundary: Boundary,
    side: Side,
) -> Result<DataArray> {
    calculate_pp_stats_ts(da, |exceedances| exceedances.len() as f64, q, time_freq, boundary, side)
}

/// `f` applied to the values strictly above the `q` quantile in each block.
///
/// `f` receives an empty slice for blocks without exceedances.
pub fn calculate_pp_stats_ts<F>(
    da: &DataArray,
    f: F,
    q: f64,
    time_freq: usize,
    boundary: Boundary,
    side: Side,
) -> Result<DataArray>
where
    F: Fn(&[f64]) -> f64,
{
    let threshold = calculate_pot_quantile(da, q)?;
    let thresholds = broadcast_field(da, &threshold)?;
    let time_dim = da.time_dim()?.to_string();
    let times = da.time_values()?;
    let blocks = Blocks::new(times.len(), time_freq, boundary, side)?;

    let mut exceedances = Vec::with_capacity(time_freq);
    let data = reduce_blocks(da, &time_dim, &blocks, Some(&thresholds), |values, t| {
        exceedances.clear();
        exceedances.extend(values.iter().copied().filter(|&v| v > t));
        f(&exceedances)
    })?;
    let out = blocked_array(da, &time_dim, data, blocks.centre_times(&times)?)?;

    debug!(
        name = da.name.as_deref().unwrap_or(""),
        quantile = q,
        block = time_freq,
        blocks = blocks.len(),
        "Computed point-process series"
    );
    Ok(out)
}
