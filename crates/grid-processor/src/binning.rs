//! Two-dimensional binning of scattered values onto a grid of cell centres.
//!
//! Every pushed value is assigned to the nearest cell centre along each axis.
//! Each cell keeps running moments so any [`Statistic`] can be read back
//! without a second pass over the data.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GridProcessorError, Result};

/// Reduction applied to the values that fall into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Count,
    Sum,
    #[default]
    Mean,
    Min,
    Max,
    /// Population variance.
    Variance,
    Skewness,
    /// Excess kurtosis.
    Kurtosis,
    SumOfWeights,
}

impl Statistic {
    pub const ALL: [Statistic; 9] = [
        Statistic::Count,
        Statistic::Sum,
        Statistic::Mean,
        Statistic::Min,
        Statistic::Max,
        Statistic::Variance,
        Statistic::Skewness,
        Statistic::Kurtosis,
        Statistic::SumOfWeights,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Count => "count",
            Statistic::Sum => "sum",
            Statistic::Mean => "mean",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Variance => "variance",
            Statistic::Skewness => "skewness",
            Statistic::Kurtosis => "kurtosis",
            Statistic::SumOfWeights => "sum_of_weights",
        }
    }
}

impl FromStr for Statistic {
    type Err = GridProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.as_str() == lower)
            .ok_or_else(|| GridProcessorError::UnknownStatistic(s.to_string()))
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running moments of the values in one cell (unit weights).
#[derive(Debug, Clone, Copy)]
struct Moments {
    count: u64,
    sum: f64,
    mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
    min: f64,
    max: f64,
}

impl Default for Moments {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            mean: 0.0,
            m2: 0.0,
            m3: 0.0,
            m4: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Moments {
    fn push(&mut self, value: f64) {
        let n1 = self.count as f64;
        self.count += 1;
        let n = self.count as f64;

        let delta = value - self.mean;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        let term1 = delta * delta_n * n1;

        self.mean += delta_n;
        self.m4 += term1 * delta_n2 * (n * n - 3.0 * n + 3.0) + 6.0 * delta_n2 * self.m2
            - 4.0 * delta_n * self.m3;
        self.m3 += term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        self.m2 += term1;

        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn get(&self, statistic: Statistic) -> f64 {
        let n = self.count as f64;
        match statistic {
            Statistic::Count | Statistic::SumOfWeights => n,
            Statistic::Sum => self.sum,
            _ if self.count == 0 => f64::NAN,
            Statistic::Mean => self.mean,
            Statistic::Min => self.min,
            Statistic::Max => self.max,
            Statistic::Variance => self.m2 / n,
            Statistic::Skewness => n.sqrt() * self.m3 / self.m2.powf(1.5),
            Statistic::Kurtosis => n * self.m4 / (self.m2 * self.m2) - 3.0,
        }
    }
}

/// Coordinate axis made of monotonic cell centres.
///
/// Regular axes locate values by arithmetic; irregular axes by binary search
/// on the midpoints between centres. Values more than half a cell beyond the
/// end centres are outside the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    values: Vec<f64>,
    regular: Option<f64>,
    circle: bool,
}

impl Axis {
    /// Regular axis `first, first + step, ...` with `n` centres.
    ///
    /// With `circle`, positions are compared modulo 360 degrees.
    pub fn regular(first: f64, step: f64, n: usize, circle: bool) -> Result<Self> {
        if n == 0 || !first.is_finite() || !step.is_finite() || step == 0.0 {
            return Err(GridProcessorError::invalid_grid(format!(
                "regular axis needs n > 0 and a finite non-zero step (first={}, step={}, n={})",
                first, step, n
            )));
        }
        if circle && step < 0.0 {
            return Err(GridProcessorError::invalid_grid(
                "circular axis must be ascending",
            ));
        }
        Ok(Self {
            values: (0..n).map(|i| first + step * i as f64).collect(),
            regular: Some(step),
            circle,
        })
    }

    /// Axis from explicit centres; regular spacing is detected.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.len() < 2 {
            return Err(GridProcessorError::invalid_grid(
                "an axis built from values needs at least two centres",
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GridProcessorError::invalid_grid("axis values must be finite"));
        }
        let step = values[1] - values[0];
        let monotonic = values
            .windows(2)
            .all(|w| (w[1] - w[0]) * step.signum() > 0.0);
        if !monotonic {
            return Err(GridProcessorError::invalid_grid(
                "axis values must be strictly monotonic",
            ));
        }
        let tolerance = step.abs() * 1e-9;
        let is_regular = values
            .windows(2)
            .all(|w| ((w[1] - w[0]) - step).abs() <= tolerance);
        Ok(Self {
            values,
            regular: is_regular.then_some(step),
            circle: false,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_regular(&self) -> bool {
        self.regular.is_some()
    }

    pub fn is_circle(&self) -> bool {
        self.circle
    }

    /// Index of the centre nearest to `x`, or `None` outside the axis.
    pub fn find_index(&self, x: f64) -> Option<usize> {
        if !x.is_finite() {
            return None;
        }
        let first = self.values[0];
        let n = self.values.len();
        match self.regular {
            Some(step) => {
                let idx = if self.circle {
                    // Cells are [centre - step/2, centre + step/2); a full
                    // circle has no west edge to fall off.
                    let idx = ((x - first + step / 2.0).rem_euclid(360.0) / step).floor();
                    if n as f64 * step >= 360.0 - step * 1e-9 {
                        idx % n as f64
                    } else {
                        idx
                    }
                } else {
                    ((x - first) / step).round()
                };
                (idx >= 0.0 && idx < n as f64).then_some(idx as usize)
            }
            None => self.find_irregular(x),
        }
    }

    fn find_irregular(&self, x: f64) -> Option<usize> {
        let n = self.values.len();
        let ascending = self.values[1] > self.values[0];
        // Work in ascending space.
        let key = |v: f64| if ascending { v } else { -v };
        let target = key(x);
        let lo = key(self.values[0]);
        let hi = key(self.values[n - 1]);
        let lo_edge = lo - (key(self.values[1]) - lo) / 2.0;
        let hi_edge = hi + (hi - key(self.values[n - 2])) / 2.0;
        if target < lo_edge || target > hi_edge {
            return None;
        }
        let k = self.values.partition_point(|&v| key(v) < target);
        if k == 0 {
            return Some(0);
        }
        if k == n {
            return Some(n - 1);
        }
        let below = target - key(self.values[k - 1]);
        let above = key(self.values[k]) - target;
        Some(if below < above { k - 1 } else { k })
    }
}

/// Accumulates values into `(y, x)` cells.
#[derive(Debug, Clone)]
pub struct Binning2D {
    x: Axis,
    y: Axis,
    cells: Vec<Moments>,
}

impl Binning2D {
    pub fn new(x: Axis, y: Axis) -> Self {
        let cells = vec![Moments::default(); x.len() * y.len()];
        Self { x, y, cells }
    }

    pub fn x(&self) -> &Axis {
        &self.x
    }

    pub fn y(&self) -> &Axis {
        &self.y
    }

    /// `(ny, nx)`
    pub fn shape(&self) -> (usize, usize) {
        (self.y.len(), self.x.len())
    }

    /// Reset every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Moments::default());
    }

    /// Add values at `(x, y)`. Non-finite values and positions outside the
    /// axes are skipped. Returns how many values were binned.
    pub fn push(&mut self, x: &[f64], y: &[f64], z: &[f64]) -> Result<usize> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(GridProcessorError::LengthMismatch {
                x: x.len(),
                y: y.len(),
                z: z.len(),
            });
        }
        let nx = self.x.len();
        let mut binned = 0;
        for ((&xi, &yi), &zi) in x.iter().zip(y).zip(z) {
            if !zi.is_finite() {
                continue;
            }
            let (Some(i), Some(j)) = (self.x.find_index(xi), self.y.find_index(yi)) else {
                continue;
            };
            self.cells[j * nx + i].push(zi);
            binned += 1;
        }
        Ok(binned)
    }

    /// Grid of `statistic`, shaped `(ny, nx)`.
    pub fn variable(&self, statistic: Statistic) -> Array2<f64> {
        let (ny, nx) = self.shape();
        Array2::from_shape_fn((ny, nx), |(j, i)| self.cells[j * nx + i].get(statistic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_binning() -> Binning2D {
        let x = Axis::regular(0.5, 1.0, 4, false).unwrap();
        let y = Axis::regular(2.5, -1.0, 3, false).unwrap();
        Binning2D::new(x, y)
    }

    #[test]
    fn test_statistic_parse() {
        assert_eq!("mean".parse::<Statistic>().unwrap(), Statistic::Mean);
        assert_eq!("SUM_OF_WEIGHTS".parse::<Statistic>().unwrap(), Statistic::SumOfWeights);
        assert!(matches!(
            "median".parse::<Statistic>(),
            Err(GridProcessorError::UnknownStatistic(_))
        ));
    }

    #[test]
    fn test_regular_find_index() {
        let axis = Axis::regular(0.5, 1.0, 4, false).unwrap();
        assert_eq!(axis.find_index(0.1), Some(0));
        assert_eq!(axis.find_index(0.9), Some(0));
        assert_eq!(axis.find_index(1.1), Some(1));
        assert_eq!(axis.find_index(3.9), Some(3));
        assert_eq!(axis.find_index(4.1), None);
        assert_eq!(axis.find_index(-0.1), None);
    }

    #[test]
    fn test_descending_find_index() {
        let axis = Axis::regular(2.5, -1.0, 3, false).unwrap();
        assert_eq!(axis.find_index(2.9), Some(0));
        assert_eq!(axis.find_index(0.2), Some(2));
        assert_eq!(axis.find_index(3.1), None);
    }

    #[test]
    fn test_circular_find_index() {
        let axis = Axis::regular(-179.5, 1.0, 360, true).unwrap();
        assert_eq!(axis.find_index(-179.5), Some(0));
        assert_eq!(axis.find_index(180.5), Some(0));
        assert_eq!(axis.find_index(359.6), Some(179));
        assert_eq!(axis.find_index(179.6), Some(359));
        assert_eq!(axis.find_index(0.5), Some(180));
    }

    #[test]
    fn test_circular_west_edge() {
        let global = Axis::regular(-179.5, 1.0, 360, true).unwrap();
        assert_eq!(global.find_index(-180.0), Some(0));
        assert_eq!(global.find_index(180.0), Some(0));
        assert_eq!(global.find_index(179.99), Some(359));

        let east = Axis::regular(0.125, 0.25, 1440, true).unwrap();
        assert_eq!(east.find_index(0.0), Some(0));
        assert_eq!(east.find_index(360.0), Some(0));
        assert_eq!(east.find_index(-0.01), Some(1439));

        // A regional circular axis still has edges.
        let regional = Axis::regular(0.5, 1.0, 10, true).unwrap();
        assert_eq!(regional.find_index(0.0), Some(0));
        assert_eq!(regional.find_index(360.0), Some(0));
        assert_eq!(regional.find_index(-0.5), None);
        assert_eq!(regional.find_index(10.0), None);
    }

    #[test]
    fn test_irregular_axis() {
        let axis = Axis::new(vec![0.0, 1.0, 3.0, 7.0]).unwrap();
        assert!(!axis.is_regular());
        assert_eq!(axis.find_index(-0.4), Some(0));
        assert_eq!(axis.find_index(1.9), Some(1));
        assert_eq!(axis.find_index(2.1), Some(2));
        assert_eq!(axis.find_index(5.5), Some(3));
        assert_eq!(axis.find_index(9.1), None);

        let descending = Axis::new(vec![7.0, 3.0, 1.0, 0.0]).unwrap();
        assert_eq!(descending.find_index(5.5), Some(0));
        assert_eq!(descending.find_index(-0.4), Some(3));

        assert!(Axis::new(vec![0.0, 2.0, 1.0]).is_err());
        assert!(Axis::new(vec![0.0]).is_err());
    }

    #[test]
    fn test_detects_regular_spacing() {
        let axis = Axis::new(vec![10.0, 20.0, 30.0]).unwrap();
        assert!(axis.is_regular());
    }

    #[test]
    fn test_push_and_statistics() {
        let mut b = unit_binning();
        let n = b
            .push(
                &[0.5, 0.6, 0.4, 3.5, 10.0, 1.5],
                &[2.5, 2.5, 2.5, 0.5, 0.5, 1.5],
                &[1.0, 2.0, 3.0, 5.0, 7.0, f64::NAN],
            )
            .unwrap();
        assert_eq!(n, 4);

        let mean = b.variable(Statistic::Mean);
        assert_eq!(mean.dim(), (3, 4));
        assert_eq!(mean[[0, 0]], 2.0);
        assert_eq!(mean[[2, 3]], 5.0);
        assert!(mean[[1, 1]].is_nan());

        let count = b.variable(Statistic::Count);
        assert_eq!(count[[0, 0]], 3.0);
        assert_eq!(count[[1, 1]], 0.0);

        let sum = b.variable(Statistic::Sum);
        assert_eq!(sum[[0, 0]], 6.0);
        assert_eq!(sum[[1, 1]], 0.0);

        let var = b.variable(Statistic::Variance);
        assert!((var[[0, 0]] - 2.0 / 3.0).abs() < 1e-12);

        assert_eq!(b.variable(Statistic::Min)[[0, 0]], 1.0);
        assert_eq!(b.variable(Statistic::Max)[[0, 0]], 3.0);
        assert!(b.variable(Statistic::Max)[[1, 1]].is_nan());
    }

    #[test]
    fn test_higher_moments() {
        let mut b = Binning2D::new(
            Axis::regular(0.0, 1.0, 1, false).unwrap(),
            Axis::regular(0.0, 1.0, 1, false).unwrap(),
        );
        let values = [1.0, 2.0, 3.0, 4.0, 10.0];
        b.push(&[0.0; 5], &[0.0; 5], &values).unwrap();

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let m2: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let m3: f64 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / n;
        let m4: f64 = values.iter().map(|v| (v - mean).powi(4)).sum::<f64>() / n;

        let skew = b.variable(Statistic::Skewness)[[0, 0]];
        let kurt = b.variable(Statistic::Kurtosis)[[0, 0]];
        assert!((skew - m3 / m2.powf(1.5)).abs() < 1e-12);
        assert!((kurt - (m4 / (m2 * m2) - 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_clear() {
        let mut b = unit_binning();
        b.push(&[0.5], &[2.5], &[1.0]).unwrap();
        b.clear();
        assert_eq!(b.variable(Statistic::Count).sum(), 0.0);
    }

    #[test]
    fn test_push_length_mismatch() {
        let mut b = unit_binning();
        assert!(b.push(&[0.5, 1.5], &[2.5], &[1.0]).is_err());
    }
}
