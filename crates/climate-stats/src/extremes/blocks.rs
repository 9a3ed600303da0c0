//! Partitioning a time axis into fixed-size blocks.

use chrono::{DateTime, Utc};
use geo_common::array::broadcast_to;
use geo_common::time::mean_datetime;
use geo_common::{DataArray, GeoError, Variable};
use ndarray::{ArrayD, Axis, IxDyn, Zip};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, StatsError};

/// Handling of a time axis whose length is not a multiple of the block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Fail unless the length divides evenly.
    Exact,
    /// Drop the leftover steps.
    #[default]
    Trim,
    /// Complete the last block with missing steps.
    Pad,
}

impl FromStr for Boundary {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(Boundary::Exact),
            "trim" => Ok(Boundary::Trim),
            "pad" => Ok(Boundary::Pad),
            _ => Err(StatsError::unknown_option("boundary", s)),
        }
    }
}

/// End of the axis that keeps full blocks when trimming or padding.
///
/// `Left` trims or pads at the end; `Right` at the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    #[serde(alias = "center")]
    Right,
}

impl FromStr for Side {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" | "center" => Ok(Side::Right),
            _ => Err(StatsError::unknown_option("side", s)),
        }
    }
}

/// Time indices of each block; `None` marks a padded slot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Blocks {
    size: usize,
    slots: Vec<Vec<Option<usize>>>,
}

impl Blocks {
    pub(crate) fn new(n: usize, size: usize, boundary: Boundary, side: Side) -> Result<Self> {
        if size == 0 {
            return Err(StatsError::InvalidBlockSize(size));
        }
        let rem = n % size;
        let (n_blocks, start) = match boundary {
            Boundary::Exact if rem != 0 => {
                return Err(StatsError::InexactBoundary { len: n, block: size })
            }
            Boundary::Exact => (n / size, 0),
            Boundary::Trim => match side {
                Side::Left => (n / size, 0),
                Side::Right => (n / size, rem as isize),
            },
            Boundary::Pad => {
                let n_blocks = n.div_ceil(size);
                let pad = n_blocks * size - n;
                match side {
                    Side::Left => (n_blocks, 0),
                    Side::Right => (n_blocks, -(pad as isize)),
                }
            }
        };
        let slots = (0..n_blocks)
            .map(|b| {
                (0..size)
                    .map(|k| {
                        let i = start + (b * size + k) as isize;
                        (i >= 0 && (i as usize) < n).then_some(i as usize)
                    })
                    .collect()
            })
            .collect();
        Ok(Self { size, slots })
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    fn members(&self, block: usize) -> impl Iterator<Item = usize> + '_ {
        self.slots[block].iter().flatten().copied()
    }

    /// Mean instant of each block.
    pub(crate) fn mean_times(&self, times: &[DateTime<Utc>]) -> Result<Vec<DateTime<Utc>>> {
        (0..self.len())
            .map(|b| -> Result<DateTime<Utc>> {
                let members: Vec<DateTime<Utc>> = self.members(b).map(|i| times[i]).collect();
                mean_datetime(&members)?
                    .ok_or_else(|| GeoError::InvalidTime(format!("block {} has no time steps", b)).into())
            })
            .collect()
    }

    /// Instant at the centre slot `(size - 1) / 2` of each block.
    ///
    /// A padded centre slot falls back to the block's mean instant.
    pub(crate) fn centre_times(&self, times: &[DateTime<Utc>]) -> Result<Vec<DateTime<Utc>>> {
        let centre = (self.size - 1) / 2;
        let means = self.mean_times(times)?;
        Ok(self
            .slots
            .iter()
            .zip(means)
            .map(|(slots, mean)| slots[centre].map(|i| times[i]).unwrap_or(mean))
            .collect())
    }
}

/// Reduce every block of every time lane with `f(block_values, threshold)`.
///
/// `thresholds` has the shape of `da`; without it the threshold passed is NaN.
pub(crate) fn reduce_blocks<F>(
    da: &DataArray,
    time_dim: &str,
    blocks: &Blocks,
    thresholds: Option<&ArrayD<f64>>,
    mut f: F,
) -> Result<ArrayD<f64>>
where
    F: FnMut(&[f64], f64) -> f64,
{
    let ax = da.axis(time_dim)?;
    let mut shape = da.shape().to_vec();
    shape[ax] = blocks.len();
    let mut out = ArrayD::from_elem(IxDyn(&shape), f64::NAN);

    let no_threshold;
    let thresholds = match thresholds {
        Some(t) => t,
        None => {
            no_threshold = ArrayD::from_elem(IxDyn(da.shape()), f64::NAN);
            &no_threshold
        }
    };

    let mut values = Vec::with_capacity(blocks.size);
    Zip::from(out.lanes_mut(Axis(ax)))
        .and(da.data.lanes(Axis(ax)))
        .and(thresholds.lanes(Axis(ax)))
        .for_each(|mut o, x, t| {
            let threshold = t.first().copied().unwrap_or(f64::NAN);
            for b in 0..blocks.len() {
                values.clear();
                values.extend(blocks.members(b).map(|i| x[i]));
                o[b] = f(&values, threshold);
            }
        });
    Ok(out)
}

/// Wrap blocked data as a DataArray labeled by `times` along `time_dim`.
///
/// Coordinates spanning the time dimension are replaced by the block times.
pub(crate) fn blocked_array(
    da: &DataArray,
    time_dim: &str,
    data: ArrayD<f64>,
    times: Vec<DateTime<Utc>>,
) -> Result<DataArray> {
    let mut out = DataArray::new(da.dims.clone(), data)?.with_attrs(da.attrs.clone());
    out.name = da.name.clone();
    for (name, coord) in &da.coords {
        if !coord.dims.iter().any(|d| d == time_dim) {
            out.assign_coord(name, coord.clone())?;
        }
    }
    out.assign_coord("time", Variable::time1(time_dim, times))?;
    Ok(out)
}

/// `field` (without the time dimension) broadcast to the full shape of `da`.
pub(crate) fn broadcast_field(da: &DataArray, field: &DataArray) -> Result<ArrayD<f64>> {
    Ok(broadcast_to(field.data.view(), &field.dims, &da.dims, da.shape())?)
}
