//! Numbered regions loaded from GeoJSON boundary collections.

use geo_common::encoders::{transform_180_to_360, transform_360_to_180};
use grid_processor::GeoToolzConfig;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{MaskError, MaskResult};
use crate::polygon::Polygon;

/// Environment variable naming the Natural Earth directory.
pub const NATURAL_EARTH_DIR_ENV: &str = "GEOTOOLZ_NATURAL_EARTH_DIR";

/// A GeoJSON FeatureCollection, as far as region boundaries need it.
#[derive(Debug, Clone, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<Geometry>,
}

/// Positions are `[lon, lat, ...]`; extra ordinates are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

fn ring(feature: usize, positions: &[Vec<f64>]) -> MaskResult<Vec<(f64, f64)>> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] => Ok((*lon, *lat)),
            _ => Err(MaskError::unsupported_geometry(
                feature,
                format!("position with {} ordinates", p.len()),
            )),
        })
        .collect()
}

fn polygon(feature: usize, rings: &[Vec<Vec<f64>>]) -> MaskResult<Polygon> {
    let Some((exterior, holes)) = rings.split_first() else {
        return Err(MaskError::unsupported_geometry(feature, "polygon without rings"));
    };
    let holes = holes
        .iter()
        .map(|h| ring(feature, h))
        .collect::<MaskResult<Vec<_>>>()?;
    Ok(Polygon::new(ring(feature, exterior)?, holes))
}

/// Property keys holding a region's name and abbreviation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionKeys {
    pub name: String,
    /// Without an abbreviation key the region number is used.
    pub abbrev: Option<String>,
}

impl RegionKeys {
    pub fn new(name: impl Into<String>, abbrev: Option<&str>) -> Self {
        Self {
            name: name.into(),
            abbrev: abbrev.map(str::to_string),
        }
    }
}

/// One region: a name, an abbreviation and its polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub number: usize,
    pub name: String,
    pub abbrev: String,
    pub polygons: Vec<Polygon>,
}

impl Region {
    /// Whether the point lies in any polygon.
    ///
    /// The longitude is tried in both the [-180, 180) and [0, 360) conventions.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let west = transform_360_to_180(lon);
        let east = transform_180_to_360(lon);
        self.polygons
            .iter()
            .any(|p| p.contains_point(west, lat) || p.contains_point(east, lat))
    }
}

/// An ordered collection of regions numbered from zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Parse a FeatureCollection. Features without geometry are skipped.
    pub fn from_geojson_str(geojson: &str, keys: &RegionKeys) -> MaskResult<Self> {
        let collection: FeatureCollection = serde_json::from_str(geojson)?;
        let mut regions = Vec::with_capacity(collection.features.len());

        for (index, feature) in collection.features.iter().enumerate() {
            let polygons = match &feature.geometry {
                None => continue,
                Some(Geometry::Polygon { coordinates }) => vec![polygon(index, coordinates)?],
                Some(Geometry::MultiPolygon { coordinates }) => coordinates
                    .iter()
                    .map(|rings| polygon(index, rings))
                    .collect::<MaskResult<Vec<_>>>()?,
                Some(Geometry::Unsupported) => {
                    return Err(MaskError::unsupported_geometry(
                        index,
                        "only Polygon and MultiPolygon are supported",
                    ))
                }
            };

            let number = regions.len();
            let property = |key: &str| {
                feature
                    .properties
                    .as_ref()
                    .and_then(|p| p.get(key))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            };
            let name = property(&keys.name).unwrap_or_else(|| number.to_string());
            let abbrev = keys
                .abbrev
                .as_deref()
                .and_then(property)
                .unwrap_or_else(|| number.to_string());

            regions.push(Region {
                number,
                name,
                abbrev,
                polygons,
            });
        }

        debug!(regions = regions.len(), name_key = %keys.name, "Parsed region boundaries");
        Ok(Self { regions })
    }

    pub fn from_geojson_file(path: impl AsRef<Path>, keys: &RegionKeys) -> MaskResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let set = Self::from_geojson_str(&contents, keys)?;
        info!(path = %path.display(), regions = set.len(), "Loaded region boundaries");
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn names(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn abbrevs(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.abbrev.as_str()).collect()
    }

    /// Region by name, ignoring case.
    pub fn find(&self, name: &str) -> MaskResult<&Region> {
        self.regions
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| MaskError::UnknownRegion(name.to_string()))
    }
}

/// Natural Earth layers used for the standard masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaturalEarth {
    /// 1:110m land polygons.
    Land110,
    /// 1:50m marine polygons (ocean basins).
    OceanBasins50,
    /// 1:110m admin-0 countries.
    Countries110,
}

impl NaturalEarth {
    pub fn file_name(&self) -> &'static str {
        match self {
            NaturalEarth::Land110 => "ne_110m_land.geojson",
            NaturalEarth::OceanBasins50 => "ne_50m_geography_marine_polys.geojson",
            NaturalEarth::Countries110 => "ne_110m_admin_0_countries.geojson",
        }
    }

    pub fn keys(&self) -> RegionKeys {
        match self {
            NaturalEarth::Land110 => RegionKeys::new("featurecla", None),
            NaturalEarth::OceanBasins50 => RegionKeys::new("name", None),
            NaturalEarth::Countries110 => RegionKeys::new("NAME", Some("ADM0_A3")),
        }
    }

    /// Directory from `GEOTOOLZ_NATURAL_EARTH_DIR`.
    pub fn default_dir() -> Option<PathBuf> {
        std::env::var_os(NATURAL_EARTH_DIR_ENV).map(PathBuf::from)
    }

    /// Load the layer from `dir`.
    pub fn load(&self, dir: impl AsRef<Path>) -> MaskResult<RegionSet> {
        RegionSet::from_geojson_file(dir.as_ref().join(self.file_name()), &self.keys())
    }

    /// Load the layer from the directory named by the environment.
    pub fn load_default(&self) -> MaskResult<RegionSet> {
        let dir = Self::default_dir().ok_or(MaskError::MissingDataDir)?;
        self.load(dir)
    }

    /// Load the layer from `natural_earth_dir` of `config`, falling back to
    /// the environment.
    pub fn load_configured(&self, config: &GeoToolzConfig) -> MaskResult<RegionSet> {
        match &config.natural_earth_dir {
            Some(dir) => self.load(dir),
            None => self.load_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SQUARES: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature", "properties": {"n": "West", "a": "W"},
         "geometry": {"type": "Polygon", "coordinates": [[[-20, 0], [-10, 0], [-10, 10], [-20, 10]]]}},
        {"type": "Feature", "properties": {"n": "Nowhere"}, "geometry": null},
        {"type": "Feature", "properties": {"n": "Dateline"},
         "geometry": {"type": "Polygon", "coordinates": [[[170, 0, 5], [190, 0, 5], [190, 10, 5], [170, 10, 5]]]}}
      ]
    }"#;

    #[test]
    fn test_parse_regions() {
        let set = RegionSet::from_geojson_str(TWO_SQUARES, &RegionKeys::new("n", Some("a"))).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), vec!["West", "Dateline"]);
        assert_eq!(set.abbrevs(), vec!["W", "1"]);
        assert_eq!(set.find("west").unwrap().number, 0);
        assert!(matches!(set.find("east"), Err(MaskError::UnknownRegion(_))));
    }

    #[test]
    fn test_region_contains_both_conventions() {
        let set = RegionSet::from_geojson_str(TWO_SQUARES, &RegionKeys::new("n", None)).unwrap();
        let west = set.find("West").unwrap();
        assert!(west.contains(-15.0, 5.0));
        assert!(west.contains(345.0, 5.0));
        let dateline = set.find("Dateline").unwrap();
        assert!(dateline.contains(-175.0, 5.0));
        assert!(dateline.contains(175.0, 5.0));
        assert!(!dateline.contains(0.0, 5.0));
    }

    #[test]
    fn test_unsupported_geometry() {
        let doc = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [0, 0]}}
        ]}"#;
        let result = RegionSet::from_geojson_str(doc, &RegionKeys::new("name", None));
        assert!(matches!(result, Err(MaskError::UnsupportedGeometry { feature: 0, .. })));
    }

    #[test]
    fn test_invalid_json() {
        let result = RegionSet::from_geojson_str("{", &RegionKeys::new("name", None));
        assert!(matches!(result, Err(MaskError::Parse(_))));
    }

    #[test]
    fn test_natural_earth_names() {
        assert_eq!(NaturalEarth::Land110.file_name(), "ne_110m_land.geojson");
        assert_eq!(NaturalEarth::Countries110.keys().abbrev.as_deref(), Some("ADM0_A3"));
    }
}
