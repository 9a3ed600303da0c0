//! Normalisation of longitude/latitude coordinate names, ranges and attributes.

use crate::encoders::{transform_180_to_90, transform_360_to_180};
use crate::error::{GeoError, GeoResult};
use crate::labeled::Labeled;

fn validate_axis<T, F>(
    x: &T,
    long_name: &str,
    short_name: &str,
    wrap: F,
    attrs: [(&str, &str); 3],
) -> GeoResult<T>
where
    T: Labeled + Clone,
    F: Fn(f64) -> f64,
{
    let mut out = x.clone();
    if out.has_variable(long_name) {
        out.rename(long_name, short_name);
    }
    let var = out
        .variable_mut(short_name)
        .ok_or_else(|| GeoError::MissingCoordinate(short_name.to_string()))?;
    let wrapped = var.as_float(short_name)?.mapv(wrap);
    var.data = crate::array::VarData::Float(wrapped);
    for (key, value) in attrs {
        var.attrs.insert(key.to_string(), value.into());
    }
    Ok(out)
}

/// Rename `longitude` to `lon`, wrap to [-180, 180) and set CF attributes.
pub fn validate_longitude<T: Labeled + Clone>(x: &T) -> GeoResult<T> {
    validate_axis(
        x,
        "longitude",
        "lon",
        transform_360_to_180,
        [
            ("units", "degrees_east"),
            ("standard_name", "longitude"),
            ("long_name", "Longitude"),
        ],
    )
}

/// Rename `latitude` to `lat`, wrap to [-90, 90) and set CF attributes.
///
/// The range is half-open, so a latitude of exactly 90 (the north pole)
/// becomes -90. Grids that include the pole row should keep cell centres
/// strictly inside (-90, 90).
pub fn validate_latitude<T: Labeled + Clone>(x: &T) -> GeoResult<T> {
    validate_axis(
        x,
        "latitude",
        "lat",
        transform_180_to_90,
        [
            ("units", "degrees_north"),
            ("standard_name", "latitude"),
            ("long_name", "Latitude"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Variable;
    use crate::dataset::Dataset;

    #[test]
    fn test_validate_longitude_renames_and_wraps() {
        let mut ds = Dataset::new();
        let lon = Variable::float1("longitude", vec![0.0, 90.0, 270.0])
            .with_attr("comment", "from model output");
        ds.assign_coord("longitude", lon).unwrap();

        let out = validate_longitude(&ds).unwrap();
        let lon = &out.coords["lon"];
        assert_eq!(lon.dims, vec!["lon".to_string()]);
        assert_eq!(
            lon.as_float("lon").unwrap().as_slice().unwrap(),
            &[0.0, 90.0, -90.0]
        );
        assert_eq!(lon.attrs["units"], "degrees_east");
        assert_eq!(lon.attrs["standard_name"], "longitude");
        assert_eq!(lon.attrs["comment"], "from model output");
    }

    #[test]
    fn test_validate_latitude() {
        let mut ds = Dataset::new();
        ds.assign_coord("lat", Variable::float1("lat", vec![-30.0, 0.0, 60.0]))
            .unwrap();
        let out = validate_latitude(&ds).unwrap();
        let lat = &out.coords["lat"];
        assert_eq!(
            lat.as_float("lat").unwrap().as_slice().unwrap(),
            &[-30.0, 0.0, 60.0]
        );
        assert_eq!(lat.attrs["long_name"], "Latitude");
    }

    #[test]
    fn test_validate_latitude_north_pole_wraps() {
        let mut ds = Dataset::new();
        ds.assign_coord("lat", Variable::float1("lat", vec![89.5, 90.0]))
            .unwrap();
        let out = validate_latitude(&ds).unwrap();
        let lat = out.coords["lat"].as_float("lat").unwrap();
        assert_eq!(lat.as_slice().unwrap(), &[89.5, -90.0]);
    }

    #[test]
    fn test_missing_coordinate() {
        let ds = Dataset::new();
        assert!(matches!(
            validate_longitude(&ds),
            Err(GeoError::MissingCoordinate(_))
        ));
    }
}
