//! Region masks over the lon/lat points of a dataset.

use geo_common::array::broadcast_to;
use geo_common::{Dataset, VarData, Variable};
use ndarray::{Array3, ArrayD, IxDyn, Zip};
use tracing::{debug, info};

use crate::error::MaskResult;
use crate::region::{Region, RegionSet};

/// Boolean `(region, lat, lon)` mask of the grid points inside each region.
pub fn mask_3d(regions: &RegionSet, lon: &[f64], lat: &[f64]) -> Array3<bool> {
    let mut mask = Array3::from_elem((regions.len(), lat.len(), lon.len()), false);
    for (region, mut plane) in regions.regions().iter().zip(mask.outer_iter_mut()) {
        for ((j, i), inside) in plane.indexed_iter_mut() {
            *inside = region.contains(lon[i], lat[j]);
        }
    }
    debug!(
        regions = regions.len(),
        n_lat = lat.len(),
        n_lon = lon.len(),
        "Built 3-d region mask"
    );
    mask
}

/// Dims and values of the dataset's lon/lat points.
///
/// Separate 1-d `lat` and `lon` axes give a `(lat, lon)` grid; coordinates
/// that share dims (along-track or curvilinear) keep those dims.
fn points(ds: &Dataset) -> MaskResult<(Vec<String>, ArrayD<f64>, ArrayD<f64>)> {
    let lon = ds.coord("lon")?;
    let lat = ds.coord("lat")?;

    let mut dims = lat.dims.clone();
    for d in &lon.dims {
        if !dims.contains(d) {
            dims.push(d.clone());
        }
    }
    let sizes = ds.dims();
    let shape: Vec<usize> = dims.iter().map(|d| sizes[d]).collect();

    let lon_b = broadcast_to(lon.as_float("lon")?.view(), &lon.dims, &dims, &shape)?;
    let lat_b = broadcast_to(lat.as_float("lat")?.view(), &lat.dims, &dims, &shape)?;
    Ok((dims, lon_b, lat_b))
}

fn region_mask<'a>(
    ds: &Dataset,
    regions: impl Iterator<Item = &'a Region> + Clone,
) -> MaskResult<Variable> {
    let (dims, lon, lat) = points(ds)?;
    let mut mask = ArrayD::<i16>::zeros(IxDyn(lon.shape()));
    Zip::from(&mut mask).and(&lon).and(&lat).for_each(|m, &x, &y| {
        if x.is_finite() && y.is_finite() && regions.clone().any(|r| r.contains(x, y)) {
            *m = 1;
        }
    });
    let inside = mask.iter().filter(|&&m| m == 1).count();
    debug!(dims = ?dims, points = mask.len(), inside, "Evaluated region mask");
    Ok(Variable::new(dims, VarData::Int16(mask))?)
}

/// Add `land_mask`, 1 where a point lies in any land region.
pub fn add_land_mask(ds: &Dataset, land: &RegionSet) -> MaskResult<Dataset> {
    let mask = region_mask(ds, land.regions().iter())?;
    let mut out = ds.clone();
    out.insert_var("land_mask", mask)?;
    info!(regions = land.len(), "Added land mask");
    Ok(out)
}

/// Add the `ocean_mask` coordinate for the basin named `ocean`.
pub fn add_ocean_mask(ds: &Dataset, basins: &RegionSet, ocean: &str) -> MaskResult<Dataset> {
    let basin = basins.find(ocean)?;
    let mask = region_mask(ds, std::iter::once(basin))?
        .with_attr("region", basin.number)
        .with_attr("abbrevs", basin.abbrev.clone())
        .with_attr("standard_name", "ocean_mask")
        .with_attr("full_name", "Ocean Mask");
    let mut out = ds.clone();
    out.assign_coord("ocean_mask", mask)?;
    info!(ocean = %basin.name, region = basin.number, "Added ocean mask");
    Ok(out)
}

/// Add the `<country>_mask` coordinate for `country`.
pub fn add_country_mask(ds: &Dataset, countries: &RegionSet, country: &str) -> MaskResult<Dataset> {
    let region = countries.find(country)?;
    let lower = country.to_lowercase();
    let name = format!("{}_mask", lower);
    let mask = region_mask(ds, std::iter::once(region))?
        .with_attr("region", region.number)
        .with_attr("abbrevs", region.abbrev.clone())
        .with_attr("standard_name", lower)
        .with_attr("full_name", capitalize(country));
    let mut out = ds.clone();
    out.assign_coord(&name, mask)?;
    info!(country = %region.name, abbrev = %region.abbrev, "Added country mask");
    Ok(out)
}

/// First character upper case, the rest lower case.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
