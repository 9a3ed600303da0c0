//! Spherical Web Mercator (EPSG:3857) in closed form.

use std::f64::consts::PI;

/// Earth radius used by Web Mercator, in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the projected extent of the world (pi * R).
pub const HALF_EARTH: f64 = PI * EARTH_RADIUS;

/// Latitude limit beyond which Web Mercator is undefined in practice.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Longitude/latitude in degrees to Web Mercator meters.
///
/// Latitudes are clamped to [`MAX_LATITUDE`].
#[inline]
pub fn lonlat_to_merc(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = lon * HALF_EARTH / 180.0;
    let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;
    (x, y)
}

/// Web Mercator meters to longitude/latitude in degrees.
#[inline]
pub fn merc_to_lonlat(x: f64, y: f64) -> (f64, f64) {
    let lon = x * 180.0 / HALF_EARTH;
    let y_rad = y * PI / HALF_EARTH;
    let lat = (2.0 * y_rad.exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let (x, y) = lonlat_to_merc(0.0, 0.0);
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian() {
        let (x, _) = lonlat_to_merc(180.0, 0.0);
        assert!((x - 20_037_508.342_789_244).abs() < 1e-6);
    }

    #[test]
    fn test_inverse() {
        let (x, y) = lonlat_to_merc(-122.4, 37.8);
        let (lon, lat) = merc_to_lonlat(x, y);
        assert!((lon - -122.4).abs() < 1e-9);
        assert!((lat - 37.8).abs() < 1e-9);
    }
}
