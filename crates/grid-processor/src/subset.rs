//! Value and bounding-box subsetting of datasets.

use geo_common::array::broadcast_to;
use geo_common::{BoundingBox, Dataset, GeoError, VarData, Variable};
use ndarray::{ArrayD, Axis, IxDyn, Zip};
use tracing::debug;

use crate::error::Result;

/// Keep values where `min <= ds[variable] <= max`.
///
/// Every data variable spanning the dims of `variable` is set to NaN where the
/// condition fails (integer variables become float). With `drop`, labels along
/// the condition dims where the condition never holds are removed.
pub fn where_slice(
    ds: &Dataset,
    variable: &str,
    min: f64,
    max: f64,
    drop: bool,
) -> Result<Dataset> {
    let var = ds.variable(variable)?;
    let values = var.data.to_float().ok_or_else(|| GeoError::WrongKind {
        name: variable.to_string(),
        expected: "float",
    })?;
    let cond = values.mapv(|v| v >= min && v <= max);
    debug!(variable, min, max, drop, "Slicing by value");
    apply_condition(ds, &cond, &var.dims, drop)
}

/// Keep the points whose `lon`/`lat` fall inside `bbox` (edges included).
///
/// Labels outside the box are always dropped.
pub fn where_slice_bbox(ds: &Dataset, bbox: &BoundingBox) -> Result<Dataset> {
    let lon = ds.coord("lon")?;
    let lat = ds.coord("lat")?;

    let mut dims = lon.dims.clone();
    for d in &lat.dims {
        if !dims.contains(d) {
            dims.push(d.clone());
        }
    }
    let sizes = ds.dims();
    let shape: Vec<usize> = dims.iter().map(|d| sizes[d]).collect();

    let lon_b = broadcast_to(lon.as_float("lon")?.view(), &lon.dims, &dims, &shape)?;
    let lat_b = broadcast_to(lat.as_float("lat")?.view(), &lat.dims, &dims, &shape)?;

    let mut cond = ArrayD::from_elem(IxDyn(&shape), false);
    Zip::from(&mut cond)
        .and(&lon_b)
        .and(&lat_b)
        .for_each(|c, &x, &y| *c = bbox.contains_point(x, y));

    debug!(bbox = ?bbox, dims = ?dims, "Slicing by bounding box");
    apply_condition(ds, &cond, &dims, true)
}

fn apply_condition(
    ds: &Dataset,
    cond: &ArrayD<bool>,
    cond_dims: &[String],
    drop: bool,
) -> Result<Dataset> {
    let mut out = ds.clone();
    for (name, var) in &ds.data_vars {
        if !cond_dims.iter().all(|d| var.dims.contains(d)) {
            continue;
        }
        let Some(mut data) = var.data.to_float() else {
            continue;
        };
        let mask = broadcast_to(cond.view(), cond_dims, &var.dims, var.shape())?;
        Zip::from(&mut data).and(&mask).for_each(|v, &keep| {
            if !keep {
                *v = f64::NAN;
            }
        });
        let masked = Variable::new(var.dims.clone(), VarData::Float(data))?.with_attrs(var.attrs.clone());
        out.data_vars.insert(name.clone(), masked);
    }

    if drop {
        for (ax, dim) in cond_dims.iter().enumerate() {
            let keep: Vec<bool> = cond
                .axis_iter(Axis(ax))
                .map(|slice| slice.iter().any(|&c| c))
                .collect();
            let kept = keep.iter().filter(|&&k| k).count();
            debug!(dim = %dim, kept, total = keep.len(), "Dropping labels");
            out = out.isel_mask(dim, &keep)?;
        }
    }
    Ok(out)
}
