//! Climatologies grouped by a cyclical time key.

use chrono::{DateTime, Datelike, Utc};
use geo_common::{Attrs, DataArray, VarData, Variable};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::reduce::nan_mean;

/// Days of circular padding on each side of the smoothed daily climatology.
pub const SMOOTHING_PAD: usize = 30;

/// Width of the centred rolling mean of the smoothed daily climatology.
pub const SMOOTHING_WINDOW: usize = 60;

/// Season labels by code: December-February is 0.
pub const SEASONS: [&str; 4] = ["DJF", "MAM", "JJA", "SON"];

/// Time key a climatology is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClimatologyFreq {
    #[default]
    Day,
    Month,
    Year,
}

impl ClimatologyFreq {
    /// Name of the grouping dimension in the result.
    pub fn key(&self) -> &'static str {
        match self {
            ClimatologyFreq::Day => "dayofyear",
            ClimatologyFreq::Month => "month",
            ClimatologyFreq::Year => "year",
        }
    }

    /// Group label of an instant.
    pub fn key_of(&self, t: &DateTime<Utc>) -> i64 {
        match self {
            ClimatologyFreq::Day => t.ordinal() as i64,
            ClimatologyFreq::Month => t.month() as i64,
            ClimatologyFreq::Year => t.year() as i64,
        }
    }
}

impl FromStr for ClimatologyFreq {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "dayofyear" => Ok(ClimatologyFreq::Day),
            "month" => Ok(ClimatologyFreq::Month),
            "year" => Ok(ClimatologyFreq::Year),
            _ => Err(StatsError::unknown_option("climatology frequency", s)),
        }
    }
}

impl fmt::Display for ClimatologyFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClimatologyFreq::Day => "day",
            ClimatologyFreq::Month => "month",
            ClimatologyFreq::Year => "year",
        };
        f.write_str(name)
    }
}

/// Season code of an instant (0 = DJF, 1 = MAM, 2 = JJA, 3 = SON).
pub fn season_of(t: &DateTime<Utc>) -> i16 {
    ((t.month() % 12) / 3) as i16
}

/// Mean over time of every group of equal `keys`, in ascending key order.
fn group_mean<C>(da: &DataArray, keys: &[i64], key_dim: &str, coord: C) -> Result<DataArray>
where
    C: FnOnce(&[i64]) -> Variable,
{
    let time_dim = da.time_dim()?.to_string();
    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, &k) in keys.iter().enumerate() {
        groups.entry(k).or_default().push(i);
    }
    let labels: Vec<i64> = groups.keys().copied().collect();
    let members: Vec<Vec<usize>> = groups.into_values().collect();

    let out = da.map_along(
        &time_dim,
        key_dim,
        labels.len(),
        Some(coord(&labels)),
        |lane, mut out| {
            for (o, idx) in out.iter_mut().zip(&members) {
                *o = nan_mean(idx.iter().map(|&i| lane[i]));
            }
        },
    )?;
    debug!(
        name = da.name.as_deref().unwrap_or(""),
        key = key_dim,
        groups = labels.len(),
        "Computed group means"
    );
    Ok(out)
}

/// NaN-skipping mean over `time` for each value of the `freq` key.
///
/// The time dimension is replaced by the key dimension, labeled by the sorted
/// key values that occur in the data.
pub fn calculate_climatology(da: &DataArray, freq: ClimatologyFreq) -> Result<DataArray> {
    let keys: Vec<i64> = da.time_values()?.iter().map(|t| freq.key_of(t)).collect();
    let key = freq.key();
    group_mean(da, &keys, key, |labels| {
        Variable::float1(key, labels.iter().map(|&k| k as f64).collect())
    })
}

/// Day-of-year climatology smoothed by a centred circular rolling mean.
///
/// The climatology is padded with 30 days wrapped from the opposite end, a
/// 60-day window `[i - 30, i + 29]` is averaged (at least one value needed),
/// and the padding is removed again.
pub fn calculate_daily_climatology_smoothed(da: &DataArray) -> Result<DataArray> {
    let clim = calculate_climatology(da, ClimatologyFreq::Day)?;
    let key = ClimatologyFreq::Day.key();
    let n = clim.dim_size(key)?;
    if n == 0 {
        return Ok(clim);
    }
    let coord = clim.coord(key)?.clone();

    let out = clim.map_along(key, key, n, Some(coord), |lane, mut out| {
        let padded: Vec<f64> = (0..n + 2 * SMOOTHING_PAD)
            .map(|k| lane[(k as isize - SMOOTHING_PAD as isize).rem_euclid(n as isize) as usize])
            .collect();
        for (i, o) in out.iter_mut().enumerate() {
            *o = nan_mean(padded[i..i + SMOOTHING_WINDOW].iter().copied());
        }
    })?;
    debug!(days = n, window = SMOOTHING_WINDOW, "Smoothed daily climatology");
    Ok(out)
}

fn season_coord(codes: &[i64]) -> Variable {
    let data = Array1::from_iter(codes.iter().map(|&c| c as i16)).into_dyn();
    Variable {
        dims: vec!["season".to_string()],
        data: VarData::Int16(data),
        attrs: Attrs::new(),
    }
    .with_attr("long_name", "Season")
    .with_attr("flag_values", vec![0, 1, 2, 3])
    .with_attr("flag_meanings", SEASONS.join(" "))
}

/// Mean per meteorological season.
///
/// The `season` coordinate holds integer codes with CF `flag_values` and
/// `flag_meanings` attributes naming them.
pub fn calculate_climatology_season(da: &DataArray) -> Result<DataArray> {
    let keys: Vec<i64> = da
        .time_values()?
        .iter()
        .map(|t| season_of(t) as i64)
        .collect();
    group_mean(da, &keys, "season", season_coord)
}
