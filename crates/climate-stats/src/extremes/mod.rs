//! Extreme-value statistics over non-overlapping time blocks.
//!
//! - **Block maxima**: largest value per block
//! - **Peaks over threshold**: values above a per-location quantile
//! - **Point process**: exceedance counts or statistics per block

mod block_maxima;
mod blocks;
mod point_process;
mod pot;

pub use block_maxima::{calculate_block_maxima_ts, DEFAULT_BLOCK_SIZE};
pub use blocks::{Boundary, Side};
pub use point_process::{calculate_pp_counts_ts, calculate_pp_stats_ts, DEFAULT_PP_BLOCK_SIZE};
pub use pot::{calculate_pot_quantile, calculate_pot_ts, DEFAULT_QUANTILE};
