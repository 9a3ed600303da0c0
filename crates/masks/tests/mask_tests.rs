//! Integration tests for region masks built from GeoJSON fixtures.

use geo_common::{Dataset, VarData, Variable};
use grid_processor::GeoToolzConfig;
use masks::{
    add_country_mask, add_land_mask, add_ocean_mask, mask_3d, MaskError, NaturalEarth,
    RegionKeys, RegionSet,
};
use test_utils::{
    init_tracing, require_test_file, temp_test_dir, write_test_file, COUNTRIES_GEOJSON,
    LAND_GEOJSON, OCEAN_BASINS_GEOJSON,
};

const LATS: [f64; 4] = [1.0, 22.0, 30.0, 45.0];
const LONS: [f64; 5] = [-7.0, 2.0, 5.0, 110.0, 250.0];

fn grid() -> Dataset {
    let mut ds = Dataset::new();
    ds.assign_coord("lat", Variable::float1("lat", LATS.to_vec())).unwrap();
    ds.assign_coord("lon", Variable::float1("lon", LONS.to_vec())).unwrap();
    ds
}

fn int16_values(var: &Variable) -> Vec<i16> {
    match &var.data {
        VarData::Int16(a) => a.iter().copied().collect(),
        other => panic!("expected int16 mask, found {}", other.kind()),
    }
}

fn land() -> RegionSet {
    RegionSet::from_geojson_str(LAND_GEOJSON, &NaturalEarth::Land110.keys()).unwrap()
}

#[test]
fn test_land_mask_union_with_hole() {
    init_tracing();
    let out = add_land_mask(&grid(), &land()).unwrap();
    let mask = &out.data_vars["land_mask"];
    assert_eq!(mask.dims, vec!["lat", "lon"]);
    #[rustfmt::skip]
    let expected = vec![
        1, 1, 1, 0, 0,
        0, 0, 0, 1, 0,
        0, 0, 0, 0, 0,
        0, 0, 0, 0, 0,
    ];
    assert_eq!(int16_values(mask), expected);
}

#[test]
fn test_mask_3d_per_region() {
    let mask = mask_3d(&land(), &LONS, &LATS);
    assert_eq!(mask.dim(), (2, 4, 5));
    assert_eq!(mask.iter().filter(|&&m| m).count(), 4);
    assert!(mask[[0, 0, 0]]);
    assert!(mask[[1, 1, 3]]);
    assert!(!mask[[1, 2, 3]]);
}

#[test]
fn test_ocean_mask_attrs() {
    let basins =
        RegionSet::from_geojson_str(OCEAN_BASINS_GEOJSON, &NaturalEarth::OceanBasins50.keys())
            .unwrap();
    let out = add_ocean_mask(&grid(), &basins, "north atlantic ocean").unwrap();

    assert!(!out.data_vars.contains_key("ocean_mask"));
    let mask = &out.coords["ocean_mask"];
    assert_eq!(
        int16_values(mask),
        [1, 0, 0, 0, 0].repeat(LATS.len())
    );
    assert_eq!(mask.attrs["region"], 0);
    assert_eq!(mask.attrs["abbrevs"], "0");
    assert_eq!(mask.attrs["standard_name"], "ocean_mask");
    assert_eq!(mask.attrs["full_name"], "Ocean Mask");
}

#[test]
fn test_ocean_mask_other_convention() {
    let basins =
        RegionSet::from_geojson_str(OCEAN_BASINS_GEOJSON, &NaturalEarth::OceanBasins50.keys())
            .unwrap();
    let mut ds = Dataset::new();
    ds.assign_coord("lat", Variable::float1("lat", vec![-30.0])).unwrap();
    ds.assign_coord("lon", Variable::float1("lon", vec![250.0, 300.0])).unwrap();
    let out = add_ocean_mask(&ds, &basins, "South Pacific Ocean").unwrap();
    assert_eq!(out.coords["ocean_mask"].attrs["region"], 1);
    assert_eq!(int16_values(&out.coords["ocean_mask"]), vec![1, 0]);
}

#[test]
fn test_country_mask_naming() {
    let countries =
        RegionSet::from_geojson_str(COUNTRIES_GEOJSON, &NaturalEarth::Countries110.keys())
            .unwrap();
    let out = add_country_mask(&grid(), &countries, "FRANCE").unwrap();
    let mask = &out.coords["france_mask"];
    assert_eq!(int16_values(mask)[15..], [0, 1, 1, 0, 0]);
    assert_eq!(mask.attrs["region"], 0);
    assert_eq!(mask.attrs["abbrevs"], "FRA");
    assert_eq!(mask.attrs["standard_name"], "france");
    assert_eq!(mask.attrs["full_name"], "France");
}

#[test]
fn test_unknown_region() {
    let countries =
        RegionSet::from_geojson_str(COUNTRIES_GEOJSON, &NaturalEarth::Countries110.keys())
            .unwrap();
    let result = add_country_mask(&grid(), &countries, "Atlantis");
    assert!(matches!(result, Err(MaskError::UnknownRegion(name)) if name == "Atlantis"));
}

#[test]
fn test_load_from_file() {
    let dir = temp_test_dir();
    write_test_file(&dir, NaturalEarth::Countries110.file_name(), COUNTRIES_GEOJSON);

    let countries = NaturalEarth::Countries110.load(dir.path()).unwrap();
    assert_eq!(countries.names(), vec!["France", "Spain"]);
    assert_eq!(countries.abbrevs(), vec!["FRA", "ESP"]);

    let missing = NaturalEarth::Land110.load(dir.path());
    assert!(matches!(missing, Err(MaskError::Io(_))));
}

#[test]
fn test_load_from_configured_dir() {
    let dir = temp_test_dir();
    write_test_file(&dir, NaturalEarth::OceanBasins50.file_name(), OCEAN_BASINS_GEOJSON);
    let config = GeoToolzConfig {
        natural_earth_dir: Some(dir.path().to_path_buf()),
        ..GeoToolzConfig::default()
    };

    let basins = NaturalEarth::OceanBasins50.load_configured(&config).unwrap();
    assert_eq!(basins.names(), vec!["North Atlantic Ocean", "South Pacific Ocean"]);
}

#[test]
fn test_custom_keys_fall_back_to_number() {
    let set = RegionSet::from_geojson_str(LAND_GEOJSON, &RegionKeys::new("missing", None)).unwrap();
    assert_eq!(set.names(), vec!["0", "1"]);
}

#[test]
fn test_natural_earth_land() {
    let path = require_test_file!("ne_110m_land.geojson");
    let land = RegionSet::from_geojson_file(&path, &NaturalEarth::Land110.keys()).unwrap();
    assert!(!land.is_empty());

    let mut ds = Dataset::new();
    // central Africa, mid Pacific
    ds.assign_coord("lat", Variable::float1("lat", vec![5.0])).unwrap();
    ds.assign_coord("lon", Variable::float1("lon", vec![20.0, 200.0])).unwrap();
    let out = add_land_mask(&ds, &land).unwrap();
    assert_eq!(int16_values(&out.data_vars["land_mask"]), vec![1, 0]);
}
