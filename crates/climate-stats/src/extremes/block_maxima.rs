use geo_common::DataArray;
use tracing::debug;

use super::blocks::{blocked_array, reduce_blocks, Blocks, Boundary, Side};
use crate::error::Result;
use crate::reduce::nan_max;

/// Default block length in time steps (one year of daily data).
pub const DEFAULT_BLOCK_SIZE: usize = 365;

/// NaN-skipping maximum over non-overlapping blocks of `time_freq` steps.
///
/// Each block is labeled by the mean of its time stamps.
pub fn calculate_block_maxima_ts(
    da: &DataArray,
    time_freq: usize,
    boundary: Boundary,
    side: Side,
) -> Result<DataArray> {
    let time_dim = da.time_dim()?.to_string();
    let times = da.time_values()?;
    let blocks = Blocks::new(times.len(), time_freq, boundary, side)?;

    let data = reduce_blocks(da, &time_dim, &blocks, None, |values, _| {
        nan_max(values.iter().copied())
    })?;
    let out = blocked_array(da, &time_dim, data, blocks.mean_times(&times)?)?;

    debug!(
        name = da.name.as_deref().unwrap_or(""),
        steps = times.len(),
        block = time_freq,
        blocks = blocks.len(),
        "Computed block maxima"
    );
    Ok(out)
}
