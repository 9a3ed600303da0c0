//! Common test fixtures for geotoolz tests.
//!
//! Region boundary collections are small hand-made GeoJSON documents shaped
//! like the Natural Earth layers (same property keys), with rectangles whose
//! membership is easy to reason about.

/// Common bounding box definitions for testing, as `(min_x, min_y, max_x, max_y)`.
pub mod bbox {
    /// Global bounding box (-180 to 180, -90 to 90)
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);

    /// Europe bounding box
    pub const EUROPE: (f64, f64, f64, f64) = (-15.0, 35.0, 45.0, 72.0);

    /// Gulf Stream region
    pub const GULF_STREAM: (f64, f64, f64, f64) = (-75.0, 30.0, -50.0, 45.0);
}

/// Land polygons: a square around the origin and a square with a lake.
///
/// - lon [-10, 10] x lat [-10, 10]
/// - lon [100, 120] x lat [20, 40] minus the hole lon [105, 115] x lat [25, 35]
pub const LAND_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {"featurecla": "Land", "scalerank": 0},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-10, -10], [10, -10], [10, 10], [-10, 10], [-10, -10]]]
      }
    },
    {
      "type": "Feature",
      "properties": {"featurecla": "Land", "scalerank": 1},
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
          [
            [[100, 20], [120, 20], [120, 40], [100, 40], [100, 20]],
            [[105, 25], [105, 35], [115, 35], [115, 25], [105, 25]]
          ]
        ]
      }
    }
  ]
}"#;

/// Ocean basins keyed by `name`.
///
/// - "North Atlantic Ocean": lon [-80, 0] x lat [0, 60]
/// - "South Pacific Ocean": lon [-180, -80] x lat [-60, 0]
pub const OCEAN_BASINS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {"name": "North Atlantic Ocean", "featurecla": "ocean"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-80, 0], [0, 0], [0, 60], [-80, 60], [-80, 0]]]
      }
    },
    {
      "type": "Feature",
      "properties": {"name": "South Pacific Ocean", "featurecla": "ocean"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-180, -60], [-80, -60], [-80, 0], [-180, 0], [-180, -60]]]
      }
    }
  ]
}"#;

/// Countries keyed by `NAME` with `ADM0_A3` abbreviations.
///
/// - "France" (FRA): lon [-5, 8] x lat [42, 51]
/// - "Spain" (ESP): lon [-10, 3] x lat [36, 42]
pub const COUNTRIES_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {"NAME": "France", "ADM0_A3": "FRA"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-5, 42], [8, 42], [8, 51], [-5, 51], [-5, 42]]]
      }
    },
    {
      "type": "Feature",
      "properties": {"NAME": "Spain", "ADM0_A3": "ESP"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-10, 36], [3, 36], [3, 42], [-10, 42], [-10, 36]]]
      }
    }
  ]
}"#;

/// Configuration naming a statistic that does not exist.
pub const INVALID_CONFIG_YAML: &str = r#"
statistic: median
"#;

/// Valid configuration file contents.
pub const VALID_CONFIG_YAML: &str = r#"
statistic: max
fill:
  max_iterations: 500
  epsilon: 0.001
  first_guess: zonal_average
  is_circle: false
natural_earth_dir: /data/natural_earth
"#;
