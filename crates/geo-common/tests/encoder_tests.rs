//! Range conversions and coordinate validation across the public API.

use geo_common::encoders::{
    transform_180_to_360, transform_180_to_90, transform_360_to_180, transform_90_to_180,
};
use geo_common::{validate_latitude, validate_longitude, DataArray, Labeled, Variable};
use ndarray::{Array1, Array2};
use proptest::prelude::*;

// ============================================================================
// Round-trip properties
// ============================================================================

proptest! {
    #[test]
    fn prop_360_to_180_roundtrip(lon in 0.0f64..360.0) {
        let back = transform_180_to_360(transform_360_to_180(lon));
        prop_assert!((back - lon).abs() < 1e-9);
    }

    #[test]
    fn prop_180_to_360_roundtrip(lon in -180.0f64..180.0) {
        let back = transform_360_to_180(transform_180_to_360(lon));
        prop_assert!((back - lon).abs() < 1e-9);
    }

    #[test]
    fn prop_360_to_180_in_range(lon in -1000.0f64..1000.0) {
        let out = transform_360_to_180(lon);
        prop_assert!((-180.0..180.0).contains(&out));
    }

    #[test]
    fn prop_latitude_roundtrip(lat in -90.0f64..90.0) {
        let back = transform_180_to_90(transform_90_to_180(lat));
        prop_assert!((back - lat).abs() < 1e-9);
    }
}

// ============================================================================
// Validation on DataArray
// ============================================================================

fn model_field() -> DataArray {
    let data = Array2::<f64>::zeros((2, 4)).into_dyn();
    DataArray::new(vec!["latitude", "longitude"], data)
        .unwrap()
        .with_coord(
            "longitude",
            Variable::float1("longitude", vec![0.0, 90.0, 180.0, 270.0]),
        )
        .unwrap()
        .with_coord("latitude", Variable::float1("latitude", vec![-45.0, 45.0]))
        .unwrap()
}

#[test]
fn test_validate_data_array_coords() {
    let da = validate_latitude(&validate_longitude(&model_field()).unwrap()).unwrap();

    assert_eq!(da.dims, vec!["lat".to_string(), "lon".to_string()]);
    assert!(da.has_variable("lon"));
    assert!(da.has_variable("lat"));
    assert!(!da.has_variable("longitude"));

    let lon = da.coord_f64("lon").unwrap();
    assert_eq!(lon.as_slice().unwrap(), &[0.0, 90.0, -180.0, -90.0]);
    assert_eq!(da.coords["lat"].attrs["units"], "degrees_north");
}

#[test]
fn test_validate_is_idempotent() {
    let once = validate_longitude(&model_field()).unwrap();
    let twice = validate_longitude(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_validate_leaves_input_untouched() {
    let da = model_field();
    let _ = validate_longitude(&da).unwrap();
    assert!(da.has_variable("longitude"));
    let lon = da.coord_f64("longitude").unwrap();
    assert_eq!(lon, &Array1::from(vec![0.0, 90.0, 180.0, 270.0]).into_dyn());
}
