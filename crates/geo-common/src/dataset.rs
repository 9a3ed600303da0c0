//! Collections of labeled variables sharing dimensions.

use chrono::{DateTime, Utc};
use ndarray::{ArrayD, ArrayViewD, Axis};
use std::collections::BTreeMap;

use crate::array::{mask_indices, Attrs, Coords, DataArray, VarData, Variable};
use crate::error::{GeoError, GeoResult};

/// Data variables and coordinates over a shared set of dimensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub data_vars: BTreeMap<String, Variable>,
    pub coords: Coords,
    pub attrs: Attrs,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of every dimension used by a variable or coordinate.
    pub fn dims(&self) -> BTreeMap<String, usize> {
        let mut dims = BTreeMap::new();
        for var in self.data_vars.values().chain(self.coords.values()) {
            for (d, &n) in var.dims.iter().zip(var.shape()) {
                dims.entry(d.clone()).or_insert(n);
            }
        }
        dims
    }

    pub fn dim_size(&self, dim: &str) -> GeoResult<usize> {
        self.dims()
            .get(dim)
            .copied()
            .ok_or_else(|| GeoError::MissingDimension(dim.to_string()))
    }

    fn check_conforms(&self, var: &Variable) -> GeoResult<()> {
        let dims = self.dims();
        for (d, &n) in var.dims.iter().zip(var.shape()) {
            if let Some(&existing) = dims.get(d) {
                if existing != n {
                    return Err(GeoError::DimensionConflict {
                        dim: d.clone(),
                        existing,
                        new: n,
                    });
                }
            }
        }
        Ok(())
    }

    /// Insert or replace a data variable.
    pub fn insert_var(&mut self, name: &str, var: Variable) -> GeoResult<()> {
        // A replaced variable may be the only user of a dimension.
        let previous = self.data_vars.remove(name);
        if let Err(e) = self.check_conforms(&var) {
            if let Some(prev) = previous {
                self.data_vars.insert(name.to_string(), prev);
            }
            return Err(e);
        }
        self.data_vars.insert(name.to_string(), var);
        Ok(())
    }

    /// Insert or replace a coordinate.
    pub fn assign_coord(&mut self, name: &str, var: Variable) -> GeoResult<()> {
        let previous = self.coords.remove(name);
        if let Err(e) = self.check_conforms(&var) {
            if let Some(prev) = previous {
                self.coords.insert(name.to_string(), prev);
            }
            return Err(e);
        }
        self.coords.insert(name.to_string(), var);
        Ok(())
    }

    /// Insert an array as data variable `name`, merging its coordinates.
    pub fn insert_array(&mut self, name: &str, array: DataArray) -> GeoResult<()> {
        for (cname, coord) in &array.coords {
            self.assign_coord(cname, coord.clone())?;
        }
        self.insert_var(name, array.to_variable())
    }

    /// Data variable or coordinate by name.
    pub fn variable(&self, name: &str) -> GeoResult<&Variable> {
        self.data_vars
            .get(name)
            .or_else(|| self.coords.get(name))
            .ok_or_else(|| GeoError::MissingVariable(name.to_string()))
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
        Ok(var.as_time("time")?.iter().copied().collect())
    }

    /// Names of the data variables, in sorted order.
    pub fn data_var_names(&self) -> Vec<String> {
        self.data_vars.keys().cloned().collect()
    }

    /// Extract a data variable as a float array with the coordinates it spans.
    pub fn data_array(&self, name: &str) -> GeoResult<DataArray> {
        let var = self
            .data_vars
            .get(name)
            .ok_or_else(|| GeoError::MissingVariable(name.to_string()))?;
        let data = var.data.to_float().ok_or_else(|| GeoError::WrongKind {
            name: name.to_string(),
            expected: "float",
        })?;
        let coords = self
            .coords
            .iter()
            .filter(|(_, c)| c.dims.iter().all(|d| var.dims.contains(d)))
            .map(|(k, c)| (k.clone(), c.clone()))
            .collect();
        Ok(DataArray {
            name: Some(name.to_string()),
            dims: var.dims.clone(),
            data,
            coords,
            attrs: var.attrs.clone(),
        })
    }

    /// Remove the named data variables or coordinates. Unknown names are ignored.
    pub fn drop_vars(&mut self, names: &[&str]) {
        for name in names {
            self.data_vars.remove(*name);
            self.coords.remove(*name);
        }
    }

    /// Select `indices` along `dim` in every variable.
    pub fn isel(&self, dim: &str, indices: &[usize]) -> GeoResult<Dataset> {
        self.dim_size(dim)?;
        let mut out = Dataset {
            data_vars: BTreeMap::new(),
            coords: Coords::new(),
            attrs: self.attrs.clone(),
        };
        for (k, v) in &self.data_vars {
            out.data_vars.insert(k.clone(), v.isel(dim, indices)?);
        }
        for (k, v) in &self.coords {
            out.coords.insert(k.clone(), v.isel(dim, indices)?);
        }
        Ok(out)
    }

    /// Keep the positions along `dim` where `mask` is true.
    pub fn isel_mask(&self, dim: &str, mask: &[bool]) -> GeoResult<Dataset> {
        let size = self.dim_size(dim)?;
        if mask.len() != size {
            return Err(GeoError::shape_mismatch(dim, &[size], &[mask.len()]));
        }
        self.isel(dim, &mask_indices(mask))
    }

    /// Replace dimension `old` by `new`, where `new` is a 1-d coordinate along `old`.
    pub fn swap_dims(&self, old: &str, new: &str) -> GeoResult<Dataset> {
        let coord = self.coord(new)?;
        if coord.dims.len() != 1 || coord.dims[0] != old {
            return Err(GeoError::Array(format!(
                "cannot swap '{}' for '{}': coordinate spans {:?}",
                old, new, coord.dims
            )));
        }
        let mut out = self.clone();
        for var in out.data_vars.values_mut().chain(out.coords.values_mut()) {
            var.rename_dim(old, new);
        }
        Ok(out)
    }

    /// Stack datasets with identical layout along a new leading dimension.
    ///
    /// Coordinates are taken from the first dataset; `coord` labels the new dimension.
    pub fn concat(datasets: &[Dataset], dim: &str, coord: Option<Variable>) -> GeoResult<Dataset> {
        let first = datasets
            .first()
            .ok_or_else(|| GeoError::Array("cannot concatenate zero datasets".to_string()))?;

        let mut out = Dataset {
            data_vars: BTreeMap::new(),
            coords: first.coords.clone(),
            attrs: first.attrs.clone(),
        };
        for (name, var) in &first.data_vars {
            let mut parts = Vec::with_capacity(datasets.len());
            for ds in datasets {
                let part = ds
                    .data_vars
                    .get(name)
                    .ok_or_else(|| GeoError::MissingVariable(name.clone()))?;
                if part.dims != var.dims || part.shape() != var.shape() {
                    return Err(GeoError::shape_mismatch(name.clone(), var.shape(), part.shape()));
                }
                parts.push(part);
            }
            let mut dims = Vec::with_capacity(var.dims.len() + 1);
            dims.push(dim.to_string());
            dims.extend(var.dims.iter().cloned());
            let mut stacked = Variable::new(dims, stack_data(name, &parts)?)?;
            stacked.attrs = var.attrs.clone();
            out.data_vars.insert(name.clone(), stacked);
        }
        if let Some(coord) = coord {
            out.assign_coord(dim, coord)?;
        }
        Ok(out)
    }
}

fn stack_data(name: &str, parts: &[&Variable]) -> GeoResult<VarData> {
    let kind_error = || GeoError::Array(format!("cannot stack mixed kinds for '{}'", name));
    match parts.first().map(|v| &v.data) {
        Some(VarData::Float(_)) => {
            let views = parts
                .iter()
                .map(|v| match &v.data {
                    VarData::Float(a) => Ok(a.view()),
                    _ => Err(kind_error()),
                })
                .collect::<GeoResult<Vec<ArrayViewD<'_, f64>>>>()?;
            Ok(VarData::Float(ndarray::stack(Axis(0), &views)?))
        }
        Some(VarData::Int16(_)) => {
            let views = parts
                .iter()
                .map(|v| match &v.data {
                    VarData::Int16(a) => Ok(a.view()),
                    _ => Err(kind_error()),
                })
                .collect::<GeoResult<Vec<ArrayViewD<'_, i16>>>>()?;
            Ok(VarData::Int16(ndarray::stack(Axis(0), &views)?))
        }
        Some(VarData::Time(_)) => Err(GeoError::WrongKind {
            name: name.to_string(),
            expected: "float or int16",
        }),
        None => Err(GeoError::Array("cannot stack zero variables".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> Dataset {
        let mut ds = Dataset::new();
        ds.assign_coord("lat", Variable::float1("lat", vec![0.0, 1.0]))
            .unwrap();
        ds.assign_coord("lon", Variable::float1("lon", vec![10.0, 11.0, 12.0]))
            .unwrap();
        let sst = Variable::new(
            vec!["lat", "lon"],
            VarData::Float(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn()),
        )
        .unwrap();
        ds.insert_var("sst", sst).unwrap();
        ds
    }

    #[test]
    fn test_dims_collected() {
        let dims = sample().dims();
        assert_eq!(dims["lat"], 2);
        assert_eq!(dims["lon"], 3);
    }

    #[test]
    fn test_insert_var_rejects_conflict() {
        let mut ds = sample();
        let bad = Variable::float1("lon", vec![0.0; 4]);
        assert!(ds.insert_var("bad", bad).is_err());
        assert!(!ds.data_vars.contains_key("bad"));
    }

    #[test]
    fn test_data_array_roundtrip() {
        let ds = sample();
        let da = ds.data_array("sst").unwrap();
        assert_eq!(da.name.as_deref(), Some("sst"));
        assert!(da.coords.contains_key("lat"));
        assert!(da.coords.contains_key("lon"));

        let mut other = Dataset::new();
        other.insert_array("sst", da).unwrap();
        assert_eq!(other.dims(), ds.dims());
    }

    #[test]
    fn test_swap_dims() {
        let mut ds = Dataset::new();
        ds.assign_coord("time", Variable::float1("obs", vec![1.0, 2.0, 3.0]))
            .unwrap();
        ds.insert_var("sla", Variable::float1("obs", vec![0.1, 0.2, 0.3]))
            .unwrap();
        let swapped = ds.swap_dims("obs", "time").unwrap();
        assert_eq!(swapped.data_vars["sla"].dims, vec!["time".to_string()]);
        assert!(swapped.dims().contains_key("time"));
        assert!(ds.swap_dims("obs", "missing").is_err());
    }

    #[test]
    fn test_concat_adds_leading_dim() {
        let ds = sample();
        let stacked = Dataset::concat(
            &[ds.clone(), ds],
            "time",
            Some(Variable::float1("time", vec![0.0, 1.0])),
        )
        .unwrap();
        assert_eq!(stacked.data_vars["sst"].shape(), &[2, 2, 3]);
        assert_eq!(stacked.dim_size("time").unwrap(), 2);
    }

    #[test]
    fn test_isel_mask() {
        let ds = sample().isel_mask("lon", &[false, true, true]).unwrap();
        assert_eq!(ds.dim_size("lon").unwrap(), 2);
        assert!(sample().isel_mask("lon", &[true]).is_err());
    }
}
