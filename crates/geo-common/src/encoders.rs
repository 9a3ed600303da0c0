//! Coordinate encoders: longitude/latitude range conversions and time rescaling.

use chrono::{DateTime, SecondsFormat, Utc};
use ndarray::ArrayD;
use tracing::debug;

use crate::array::{Attrs, VarData};
use crate::error::{GeoError, GeoResult};
use crate::labeled::Labeled;
use crate::time::{parse_datetime, to_epoch_nanos, TimeUnit};

/// Map longitudes in [0, 360) to [-180, 180).
pub fn transform_360_to_180(x: f64) -> f64 {
    (x + 180.0).rem_euclid(360.0) - 180.0
}

/// Map longitudes in [-180, 180) to [0, 360).
pub fn transform_180_to_360(x: f64) -> f64 {
    x.rem_euclid(360.0)
}

/// Map latitudes in [0, 180) to [-90, 90).
pub fn transform_180_to_90(x: f64) -> f64 {
    (x + 90.0).rem_euclid(180.0) - 90.0
}

/// Map latitudes in [-90, 90) to [0, 180).
pub fn transform_90_to_180(x: f64) -> f64 {
    x.rem_euclid(180.0)
}

pub fn transform_360_to_180_array(a: &ArrayD<f64>) -> ArrayD<f64> {
    a.mapv(transform_360_to_180)
}

pub fn transform_180_to_360_array(a: &ArrayD<f64>) -> ArrayD<f64> {
    a.mapv(transform_180_to_360)
}

pub fn transform_180_to_90_array(a: &ArrayD<f64>) -> ArrayD<f64> {
    a.mapv(transform_180_to_90)
}

pub fn transform_90_to_180_array(a: &ArrayD<f64>) -> ArrayD<f64> {
    a.mapv(transform_90_to_180)
}

/// Replace the datetime `time` coordinate by `(t - t0) / (freq_dt * unit)`.
///
/// `t0` defaults to the earliest time. The attributes `units`, `freq` and `t0`
/// record what [`time_unrescale`] needs to invert the encoding.
pub fn time_rescale<T: Labeled + Clone>(
    x: &T,
    freq_dt: f64,
    freq_unit: TimeUnit,
    t0: Option<DateTime<Utc>>,
) -> GeoResult<T> {
    let mut out = x.clone();
    let var = out
        .variable_mut("time")
        .ok_or_else(|| GeoError::MissingCoordinate("time".to_string()))?;
    let times = var.as_time("time")?;

    let t0 = match t0.or_else(|| times.iter().min().copied()) {
        Some(t) => t,
        None => return Err(GeoError::InvalidTime("empty time coordinate".to_string())),
    };
    let step = freq_unit.duration(freq_dt)?;
    let step_nanos = step
        .num_nanoseconds()
        .filter(|n| *n != 0)
        .ok_or_else(|| GeoError::InvalidTime(format!("invalid frequency {}{}", freq_dt, freq_unit.alias())))?
        as f64;
    let origin = to_epoch_nanos(&t0)?;

    let mut scaled = Vec::with_capacity(times.len());
    for t in times.iter() {
        scaled.push((to_epoch_nanos(t)? - origin) as f64 / step_nanos);
    }
    let data = ArrayD::from_shape_vec(times.raw_dim(), scaled)?;

    var.data = VarData::Float(data);
    var.attrs.insert("units".to_string(), freq_unit.to_string().into());
    var.attrs.insert("freq".to_string(), freq_dt.into());
    var.attrs.insert(
        "t0".to_string(),
        t0.to_rfc3339_opts(SecondsFormat::AutoSi, true).into(),
    );
    debug!(t0 = %t0, freq = freq_dt, unit = %freq_unit, "Rescaled time coordinate");
    Ok(out)
}

/// Invert [`time_rescale`] using the attributes it wrote. Attributes are cleared.
pub fn time_unrescale<T: Labeled + Clone>(x: &T) -> GeoResult<T> {
    let mut out = x.clone();
    let var = out
        .variable_mut("time")
        .ok_or_else(|| GeoError::MissingCoordinate("time".to_string()))?;

    let unit = TimeUnit::parse(attr_str(&var.attrs, "units")?)?;
    let freq = var
        .attrs
        .get("freq")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| GeoError::invalid_attribute("freq", "missing or not a number"))?;
    let t0 = parse_datetime(attr_str(&var.attrs, "t0")?)?;

    let values = var.as_float("time")?;
    let mut times = Vec::with_capacity(values.len());
    for &v in values.iter() {
        if !v.is_finite() {
            return Err(GeoError::InvalidTime(format!("cannot decode time value {}", v)));
        }
        times.push(t0 + unit.duration(v * freq)?);
    }
    let data = ArrayD::from_shape_vec(values.raw_dim(), times)?;

    var.data = VarData::Time(data);
    var.attrs = Attrs::new();
    Ok(out)
}

fn attr_str<'a>(attrs: &'a Attrs, key: &str) -> GeoResult<&'a str> {
    attrs
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| GeoError::invalid_attribute(key, "missing or not a string"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Variable;
    use crate::dataset::Dataset;
    use crate::time::parse_datetime;
    use ndarray::array;

    #[test]
    fn test_longitude_transforms() {
        assert_eq!(transform_360_to_180(270.0), -90.0);
        assert_eq!(transform_360_to_180(180.0), -180.0);
        assert_eq!(transform_360_to_180(0.0), 0.0);
        assert_eq!(transform_180_to_360(-90.0), 270.0);
        assert_eq!(transform_180_to_360(-180.0), 180.0);
        assert_eq!(transform_180_to_360(45.0), 45.0);
    }

    #[test]
    fn test_latitude_transforms() {
        assert_eq!(transform_180_to_90(135.0), -45.0);
        assert_eq!(transform_180_to_90(45.0), 45.0);
        assert_eq!(transform_90_to_180(-45.0), 135.0);
    }

    #[test]
    fn test_array_variants() {
        let lon = array![0.0, 90.0, 270.0, 359.0].into_dyn();
        let out = transform_360_to_180_array(&lon);
        assert_eq!(out.as_slice().unwrap(), &[0.0, 90.0, -90.0, -1.0]);
    }

    fn daily_dataset() -> Dataset {
        let times = vec![
            parse_datetime("2020-01-01").unwrap(),
            parse_datetime("2020-01-02").unwrap(),
            parse_datetime("2020-01-04").unwrap(),
        ];
        let mut ds = Dataset::new();
        ds.assign_coord("time", Variable::time1("time", times)).unwrap();
        ds
    }

    #[test]
    fn test_time_rescale_days() {
        let ds = daily_dataset();
        let scaled = time_rescale(&ds, 1.0, TimeUnit::Days, None).unwrap();
        let time = scaled.coord_f64("time").unwrap();
        assert_eq!(time.as_slice().unwrap(), &[0.0, 1.0, 3.0]);
        assert_eq!(scaled.coords["time"].attrs["units"], "days");
        assert_eq!(scaled.coords["time"].attrs["freq"], 1.0);
    }

    #[test]
    fn test_time_rescale_with_origin() {
        let ds = daily_dataset();
        let t0 = parse_datetime("2019-12-31").unwrap();
        let scaled = time_rescale(&ds, 12.0, TimeUnit::Hours, Some(t0)).unwrap();
        let time = scaled.coord_f64("time").unwrap();
        assert_eq!(time.as_slice().unwrap(), &[2.0, 4.0, 8.0]);
    }

    #[test]
    fn test_time_unrescale_inverts() {
        let ds = daily_dataset();
        let scaled = time_rescale(&ds, 1.0, TimeUnit::Seconds, None).unwrap();
        let restored = time_unrescale(&scaled).unwrap();
        assert_eq!(restored.time_values().unwrap(), ds.time_values().unwrap());
        assert!(restored.coords["time"].attrs.is_empty());
    }

    #[test]
    fn test_time_unrescale_requires_attrs() {
        let mut ds = Dataset::new();
        ds.assign_coord("time", Variable::float1("time", vec![0.0]))
            .unwrap();
        assert!(time_unrescale(&ds).is_err());
    }
}
