//! Labeled N-dimensional arrays.
//!
//! [`Variable`] is a named-dimension array of floats, 16-bit integers or
//! timestamps. [`DataArray`] is a float variable together with the
//! coordinate variables that label its dimensions. Missing values are NaN.

use chrono::{DateTime, Utc};
use ndarray::{ArrayD, ArrayView1, ArrayViewD, ArrayViewMut1, Axis, IxDyn, Zip};
use std::collections::BTreeMap;

use crate::error::{GeoError, GeoResult};

/// Free-form metadata attached to variables and datasets.
pub type Attrs = BTreeMap<String, serde_json::Value>;

/// Coordinate variables keyed by name.
pub type Coords = BTreeMap<String, Variable>;

/// Storage of a [`Variable`].
#[derive(Debug, Clone, PartialEq)]
pub enum VarData {
    Float(ArrayD<f64>),
    Int16(ArrayD<i16>),
    Time(ArrayD<DateTime<Utc>>),
}

impl VarData {
    pub fn shape(&self) -> &[usize] {
        match self {
            VarData::Float(a) => a.shape(),
            VarData::Int16(a) => a.shape(),
            VarData::Time(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Name of the element kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            VarData::Float(_) => "float",
            VarData::Int16(_) => "int16",
            VarData::Time(_) => "time",
        }
    }

    /// Select `indices` along `axis`.
    pub fn select(&self, axis: usize, indices: &[usize]) -> VarData {
        match self {
            VarData::Float(a) => VarData::Float(a.select(Axis(axis), indices)),
            VarData::Int16(a) => VarData::Int16(a.select(Axis(axis), indices)),
            VarData::Time(a) => VarData::Time(a.select(Axis(axis), indices)),
        }
    }

    /// Float values, converting integers. Timestamps are rejected.
    pub fn to_float(&self) -> Option<ArrayD<f64>> {
        match self {
            VarData::Float(a) => Some(a.clone()),
            VarData::Int16(a) => Some(a.mapv(f64::from)),
            VarData::Time(_) => None,
        }
    }
}

/// A named-dimension array with attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub dims: Vec<String>,
    pub data: VarData,
    pub attrs: Attrs,
}

impl Variable {
    /// Create a variable, checking that one name is given per axis.
    pub fn new<S: Into<String>>(dims: Vec<S>, data: VarData) -> GeoResult<Self> {
        let dims = check_dims(dims, data.ndim())?;
        Ok(Self {
            dims,
            data,
            attrs: Attrs::new(),
        })
    }

    /// One-dimensional float variable along `dim`.
    pub fn float1(dim: &str, values: Vec<f64>) -> Self {
        let data = ndarray::Array1::from_vec(values).into_dyn();
        Self {
            dims: vec![dim.to_string()],
            data: VarData::Float(data),
            attrs: Attrs::new(),
        }
    }

    /// One-dimensional time variable along `dim`.
    pub fn time1(dim: &str, values: Vec<DateTime<Utc>>) -> Self {
        let data = ndarray::Array1::from_vec(values).into_dyn();
        Self {
            dims: vec![dim.to_string()],
            data: VarData::Time(data),
            attrs: Attrs::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Position of `dim` among this variable's dimensions.
    pub fn axis(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    pub fn dim_size(&self, dim: &str) -> Option<usize> {
        self.axis(dim).map(|ax| self.shape()[ax])
    }

    pub fn as_float(&self, name: &str) -> GeoResult<&ArrayD<f64>> {
        match &self.data {
            VarData::Float(a) => Ok(a),
            _ => Err(GeoError::WrongKind {
                name: name.to_string(),
                expected: "float",
            }),
        }
    }

    pub fn as_time(&self, name: &str) -> GeoResult<&ArrayD<DateTime<Utc>>> {
        match &self.data {
            VarData::Time(a) => Ok(a),
            _ => Err(GeoError::WrongKind {
                name: name.to_string(),
                expected: "time",
            }),
        }
    }

    /// Select `indices` along `dim`. Variables without `dim` are returned unchanged.
    pub fn isel(&self, dim: &str, indices: &[usize]) -> GeoResult<Variable> {
        let Some(ax) = self.axis(dim) else {
            return Ok(self.clone());
        };
        let size = self.shape()[ax];
        if let Some(&bad) = indices.iter().find(|&&i| i >= size) {
            return Err(GeoError::IndexOutOfBounds {
                dim: dim.to_string(),
                index: bad,
                size,
            });
        }
        Ok(Variable {
            dims: self.dims.clone(),
            data: self.data.select(ax, indices),
            attrs: self.attrs.clone(),
        })
    }

    /// Rename a dimension in place. Returns whether the dimension was present.
    pub fn rename_dim(&mut self, old: &str, new: &str) -> bool {
        let mut changed = false;
        for d in self.dims.iter_mut().filter(|d| d.as_str() == old) {
            *d = new.to_string();
            changed = true;
        }
        changed
    }
}

/// A float array with named dimensions, coordinates and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    pub name: Option<String>,
    pub dims: Vec<String>,
    pub data: ArrayD<f64>,
    pub coords: Coords,
    pub attrs: Attrs,
}

impl DataArray {
    /// Create an array without coordinates.
    pub fn new<S: Into<String>>(dims: Vec<S>, data: ArrayD<f64>) -> GeoResult<Self> {
        let dims = check_dims(dims, data.ndim())?;
        Ok(Self {
            name: None,
            dims,
            data,
            coords: Coords::new(),
            attrs: Attrs::new(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Builder form of [`DataArray::assign_coord`].
    pub fn with_coord(mut self, name: &str, coord: Variable) -> GeoResult<Self> {
        self.assign_coord(name, coord)?;
        Ok(self)
    }

    /// Attach a coordinate whose dimensions are a subset of the array's.
    pub fn assign_coord(&mut self, name: &str, coord: Variable) -> GeoResult<()> {
        for (d, &n) in coord.dims.iter().zip(coord.shape()) {
            let Some(ax) = self.dims.iter().position(|x| x == d) else {
                return Err(GeoError::MissingDimension(format!(
                    "{} (required by coordinate '{}')",
                    d, name
                )));
            };
            let expected = self.data.shape()[ax];
            if expected != n {
                return Err(GeoError::DimensionConflict {
                    dim: d.clone(),
                    existing: expected,
                    new: n,
                });
            }
        }
        self.coords.insert(name.to_string(), coord);
        Ok(())
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn axis(&self, dim: &str) -> GeoResult<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .ok_or_else(|| GeoError::MissingDimension(dim.to_string()))
    }

    pub fn dim_size(&self, dim: &str) -> GeoResult<usize> {
        Ok(self.shape()[self.axis(dim)?])
    }

    pub fn coord(&self, name: &str) -> GeoResult<&Variable> {
        self.coords
            .get(name)
            .ok_or_else(|| GeoError::MissingCoordinate(name.to_string()))
    }

    pub fn coord_f64(&self, name: &str) -> GeoResult<&ArrayD<f64>> {
        self.coord(name)?.as_float(name)
    }

    /// Values of the one-dimensional `time` coordinate.
    pub fn time_values(&self) -> GeoResult<Vec<DateTime<Utc>>> {
        let var = self.coord("time")?;
        if var.dims.len() != 1 {
            return Err(GeoError::Array(format!(
                "time coordinate must be 1-d, found dims {:?}",
                var.dims
            )));
        }
        Ok(var.as_time("time")?.iter().copied().collect())
    }

    /// Dimension spanned by the one-dimensional `time` coordinate.
    pub fn time_dim(&self) -> GeoResult<&str> {
        let var = self.coord("time")?;
        match var.dims.as_slice() {
            [d] => Ok(d.as_str()),
            other => Err(GeoError::Array(format!(
                "time coordinate must be 1-d, found dims {:?}",
                other
            ))),
        }
    }

    /// Select `indices` along `dim`, subsetting coordinates that span it.
    pub fn isel(&self, dim: &str, indices: &[usize]) -> GeoResult<DataArray> {
        let ax = self.axis(dim)?;
        let size = self.shape()[ax];
        if let Some(&bad) = indices.iter().find(|&&i| i >= size) {
            return Err(GeoError::IndexOutOfBounds {
                dim: dim.to_string(),
                index: bad,
                size,
            });
        }
        let mut coords = Coords::new();
        for (name, var) in &self.coords {
            coords.insert(name.clone(), var.isel(dim, indices)?);
        }
        Ok(DataArray {
            name: self.name.clone(),
            dims: self.dims.clone(),
            data: self.data.select(Axis(ax), indices),
            coords,
            attrs: self.attrs.clone(),
        })
    }

    /// Keep the positions along `dim` where `mask` is true.
    pub fn isel_mask(&self, dim: &str, mask: &[bool]) -> GeoResult<DataArray> {
        let size = self.dim_size(dim)?;
        if mask.len() != size {
            return Err(GeoError::shape_mismatch(dim, &[size], &[mask.len()]));
        }
        self.isel(dim, &mask_indices(mask))
    }

    /// Float coordinate `name` broadcast to the array's full shape.
    pub fn broadcast_coord(&self, name: &str) -> GeoResult<ArrayD<f64>> {
        let var = self.coord(name)?;
        let values = var.as_float(name)?;
        broadcast_to(values.view(), &var.dims, &self.dims, self.shape())
    }

    /// Apply `f` to every 1-d lane along `dim`, writing lanes of length `new_len`.
    ///
    /// The dimension keeps its position and is renamed to `new_dim`; coordinates
    /// spanning the old dimension are dropped and `new_coord` is attached.
    pub fn map_along<F>(
        &self,
        dim: &str,
        new_dim: &str,
        new_len: usize,
        new_coord: Option<Variable>,
        f: F,
    ) -> GeoResult<DataArray>
    where
        F: FnMut(ArrayView1<'_, f64>, ArrayViewMut1<'_, f64>),
    {
        let ax = self.axis(dim)?;
        let data = map_lanes(&self.data, ax, new_len, f);

        let mut dims = self.dims.clone();
        dims[ax] = new_dim.to_string();

        let coords = self
            .coords
            .iter()
            .filter(|(_, v)| !v.dims.iter().any(|d| d == dim))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut out = DataArray {
            name: self.name.clone(),
            dims,
            data,
            coords,
            attrs: self.attrs.clone(),
        };
        if let Some(coord) = new_coord {
            out.assign_coord(new_dim, coord)?;
        }
        Ok(out)
    }

    /// Reduce every lane along `dim` to a scalar, removing the dimension.
    pub fn reduce<F>(&self, dim: &str, mut f: F) -> GeoResult<DataArray>
    where
        F: FnMut(ArrayView1<'_, f64>) -> f64,
    {
        let ax = self.axis(dim)?;
        let reduced = self.map_along(dim, dim, 1, None, |lane, mut out| {
            out[0] = f(lane);
        })?;
        let mut dims = reduced.dims.clone();
        dims.remove(ax);
        Ok(DataArray {
            name: reduced.name,
            dims,
            data: reduced.data.index_axis_move(Axis(ax), 0),
            coords: reduced.coords,
            attrs: reduced.attrs,
        })
    }

    /// Stack arrays of identical shape along a new leading dimension.
    ///
    /// Coordinates are taken from the first array; `coord` labels the new dimension.
    pub fn concat(arrays: &[DataArray], dim: &str, coord: Option<Variable>) -> GeoResult<DataArray> {
        let first = arrays
            .first()
            .ok_or_else(|| GeoError::Array("cannot concatenate zero arrays".to_string()))?;
        for a in arrays.iter().skip(1) {
            if a.dims != first.dims || a.shape() != first.shape() {
                return Err(GeoError::shape_mismatch(
                    first.name.as_deref().unwrap_or(dim),
                    first.shape(),
                    a.shape(),
                ));
            }
        }
        let views: Vec<ArrayViewD<'_, f64>> = arrays.iter().map(|a| a.data.view()).collect();
        let data = ndarray::stack(Axis(0), &views)?;

        let mut dims = Vec::with_capacity(first.dims.len() + 1);
        dims.push(dim.to_string());
        dims.extend(first.dims.iter().cloned());

        let mut out = DataArray {
            name: first.name.clone(),
            dims,
            data,
            coords: first.coords.clone(),
            attrs: first.attrs.clone(),
        };
        if let Some(coord) = coord {
            out.assign_coord(dim, coord)?;
        }
        Ok(out)
    }

    /// Convert into a standalone variable (coordinates are discarded).
    pub fn to_variable(&self) -> Variable {
        Variable {
            dims: self.dims.clone(),
            data: VarData::Float(self.data.clone()),
            attrs: self.attrs.clone(),
        }
    }
}

fn check_dims<S: Into<String>>(dims: Vec<S>, ndim: usize) -> GeoResult<Vec<String>> {
    let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
    if dims.len() != ndim {
        return Err(GeoError::Array(format!(
            "{} dimension names for a {}-d array",
            dims.len(),
            ndim
        )));
    }
    for (i, d) in dims.iter().enumerate() {
        if dims[..i].contains(d) {
            return Err(GeoError::Array(format!("duplicate dimension '{}'", d)));
        }
    }
    Ok(dims)
}

/// Indices of the true entries of `mask`.
pub fn mask_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &keep)| keep.then_some(i))
        .collect()
}

/// Apply `f` lane by lane along `axis`, producing lanes of length `new_len`.
pub fn map_lanes<F>(data: &ArrayD<f64>, axis: usize, new_len: usize, mut f: F) -> ArrayD<f64>
where
    F: FnMut(ArrayView1<'_, f64>, ArrayViewMut1<'_, f64>),
{
    let mut shape = data.shape().to_vec();
    shape[axis] = new_len;
    let mut out = ArrayD::from_elem(IxDyn(&shape), f64::NAN);
    Zip::from(out.lanes_mut(Axis(axis)))
        .and(data.lanes(Axis(axis)))
        .for_each(|o, i| f(i, o));
    out
}

/// Broadcast `src` (labeled by `src_dims`) onto `target_dims` / `target_shape`.
///
/// Every source dimension must appear in the target with the same size.
pub fn broadcast_to<T: Clone>(
    src: ArrayViewD<'_, T>,
    src_dims: &[String],
    target_dims: &[String],
    target_shape: &[usize],
) -> GeoResult<ArrayD<T>> {
    let src_shape = src.shape().to_vec();
    let mut positions = Vec::with_capacity(src_dims.len());
    for (d, &n) in src_dims.iter().zip(&src_shape) {
        let pos = target_dims
            .iter()
            .position(|t| t == d)
            .ok_or_else(|| GeoError::MissingDimension(d.clone()))?;
        if target_shape[pos] != n {
            return Err(GeoError::DimensionConflict {
                dim: d.clone(),
                existing: target_shape[pos],
                new: n,
            });
        }
        positions.push(pos);
    }

    // Reorder source axes to follow the target order.
    let mut order: Vec<usize> = (0..src_dims.len()).collect();
    order.sort_by_key(|&i| positions[i]);
    let mut view = src.permuted_axes(order);

    for (k, d) in target_dims.iter().enumerate() {
        if !src_dims.contains(d) {
            view = view.insert_axis(Axis(k));
        }
    }

    view.broadcast(IxDyn(target_shape))
        .map(|v| v.to_owned())
        .ok_or_else(|| GeoError::shape_mismatch("broadcast", target_shape, &src_shape))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn grid() -> DataArray {
        let data = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn();
        DataArray::new(vec!["lat", "lon"], data)
            .unwrap()
            .with_coord("lat", Variable::float1("lat", vec![10.0, 20.0]))
            .unwrap()
            .with_coord("lon", Variable::float1("lon", vec![0.0, 1.0, 2.0]))
            .unwrap()
    }

    #[test]
    fn test_new_rejects_dim_count_mismatch() {
        let data = array![1.0, 2.0].into_dyn();
        assert!(DataArray::new(vec!["a", "b"], data.clone()).is_err());
        assert!(DataArray::new(vec!["a"], data).is_ok());
    }

    #[test]
    fn test_assign_coord_checks_size() {
        let mut da = grid();
        let err = da.assign_coord("lon", Variable::float1("lon", vec![0.0, 1.0]));
        assert!(err.is_err());
        let err = da.assign_coord("depth", Variable::float1("depth", vec![0.0]));
        assert!(err.is_err());
    }

    #[test]
    fn test_isel_subsets_coords() {
        let da = grid().isel("lon", &[0, 2]).unwrap();
        assert_eq!(da.shape(), &[2, 2]);
        assert_eq!(da.data[[1, 1]], 6.0);
        let lon = da.coord_f64("lon").unwrap();
        assert_eq!(lon.as_slice().unwrap(), &[0.0, 2.0]);
        // lat untouched
        assert_eq!(da.coord_f64("lat").unwrap().len(), 2);
    }

    #[test]
    fn test_isel_out_of_bounds() {
        assert!(grid().isel("lat", &[5]).is_err());
    }

    #[test]
    fn test_broadcast_coord() {
        let da = grid();
        let lon = da.broadcast_coord("lon").unwrap();
        assert_eq!(lon.shape(), &[2, 3]);
        assert_eq!(lon[[1, 2]], 2.0);
        let lat = da.broadcast_coord("lat").unwrap();
        assert_eq!(lat[[1, 0]], 20.0);
        assert_eq!(lat[[1, 2]], 20.0);
    }

    #[test]
    fn test_broadcast_transposed_source() {
        let src = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]].into_dyn(); // (lon, lat)
        let out = broadcast_to(
            src.view(),
            &["lon".to_string(), "lat".to_string()],
            &["time".to_string(), "lat".to_string(), "lon".to_string()],
            &[2, 2, 3],
        )
        .unwrap();
        assert_eq!(out.shape(), &[2, 2, 3]);
        assert_eq!(out[[1, 0, 2]], 5.0);
        assert_eq!(out[[0, 1, 0]], 2.0);
    }

    #[test]
    fn test_reduce_removes_dim() {
        let da = grid();
        let sums = da.reduce("lon", |lane| lane.sum()).unwrap();
        assert_eq!(sums.dims, vec!["lat".to_string()]);
        assert_eq!(sums.data.as_slice().unwrap(), &[6.0, 15.0]);
        assert!(sums.coords.contains_key("lat"));
        assert!(!sums.coords.contains_key("lon"));
    }

    #[test]
    fn test_concat_new_leading_dim() {
        let a = grid();
        let b = grid();
        let stacked = DataArray::concat(&[a, b], "time", None).unwrap();
        assert_eq!(stacked.shape(), &[2, 2, 3]);
        assert_eq!(stacked.dims[0], "time");
    }

    #[test]
    fn test_mask_indices() {
        assert_eq!(mask_indices(&[true, false, true]), vec![0, 2]);
    }
}
