//! Sea surface height from along-track altimetry products.

use geo_common::array::broadcast_to;
use geo_common::{Dataset, GeoError, VarData, Variable};
use ndarray::Zip;
use tracing::debug;

use crate::error::Result;

/// Add `ssh = sla_filtered + mdt - lwe`.
///
/// `mdt` and `lwe` are broadcast onto the dimensions of `sla_filtered`.
pub fn calculate_ssh_alongtrack(ds: &Dataset) -> Result<Dataset> {
    let sla = ds.data_array("sla_filtered")?;
    let mdt = ds.data_array("mdt")?;
    let lwe = ds.data_array("lwe")?;
    let mdt = broadcast_to(mdt.data.view(), &mdt.dims, &sla.dims, sla.shape())?;
    let lwe = broadcast_to(lwe.data.view(), &lwe.dims, &sla.dims, sla.shape())?;

    let mut ssh = sla.data.clone();
    Zip::from(&mut ssh)
        .and(&mdt)
        .and(&lwe)
        .for_each(|s, &m, &l| *s = *s + m - l);

    let mut out = ds.clone();
    out.insert_var("ssh", Variable::new(sla.dims.clone(), VarData::Float(ssh))?)?;
    debug!(points = sla.data.len(), "Computed along-track SSH");
    Ok(out)
}

/// Set the CF attributes of a sea surface height variable.
pub fn validate_ssh(ds: &Dataset, variable: &str) -> Result<Dataset> {
    let mut out = ds.clone();
    let var = out
        .data_vars
        .get_mut(variable)
        .ok_or_else(|| GeoError::MissingVariable(variable.to_string()))?;
    var.attrs.insert("units".to_string(), "m".into());
    var.attrs
        .insert("standard_name".to_string(), "sea_surface_height".into());
    var.attrs
        .insert("long_name".to_string(), "Sea Surface Height".into());
    Ok(out)
}
