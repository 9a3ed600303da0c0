//! Climatologies, anomalies and extreme-value statistics.
//!
//! All functions take [`DataArray`](geo_common::DataArray) values with a
//! one-dimensional datetime `time` coordinate and reduce along its dimension:
//!
//! - **Climatology**: NaN-skipping means grouped by day of year, month, year
//!   or meteorological season
//! - **Anomalies**: deviations from a climatology
//! - **Extremes**: block maxima, peaks over threshold and point-process
//!   counts over fixed-size time blocks
//! - **Ocean**: along-track sea surface height
//!
//! # Example
//!
//! ```ignore
//! use climate_stats::{calculate_anomaly, calculate_block_maxima_ts, Boundary, ClimatologyFreq, Side};
//!
//! let anomalies = calculate_anomaly(&sst, ClimatologyFreq::Day)?;
//! let annual_max = calculate_block_maxima_ts(&anomalies, 365, Boundary::Trim, Side::Right)?;
//! ```

pub mod anomalies;
pub mod climatology;
pub mod error;
pub mod extremes;
pub mod ocean;
pub mod reduce;

pub use anomalies::{calculate_anomaly, calculate_anomaly_daily_smoothed};
pub use climatology::{
    calculate_climatology, calculate_climatology_season, calculate_daily_climatology_smoothed,
    season_of, ClimatologyFreq, SEASONS,
};
pub use error::{Result, StatsError};
pub use extremes::{
    calculate_block_maxima_ts, calculate_pot_quantile, calculate_pot_ts, calculate_pp_counts_ts,
    calculate_pp_stats_ts, Boundary, Side, DEFAULT_BLOCK_SIZE, DEFAULT_PP_BLOCK_SIZE,
    DEFAULT_QUANTILE,
};
pub use ocean::{calculate_ssh_alongtrack, validate_ssh};
