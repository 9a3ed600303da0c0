//! Reusable point transformer between two coordinate reference systems.

use geo_common::Crs;
use proj4rs::proj::Proj;
use tracing::debug;

use crate::epsg::proj_string;
use crate::error::{ProjectionError, ProjectionResult};
use crate::mercator::{lonlat_to_merc, merc_to_lonlat};

/// How a [`CoordTransformer`] moves points between its CRSs.
enum Strategy {
    /// Source and target are the same CRS.
    Identity,
    /// Closed-form EPSG:4326 to EPSG:3857.
    LonLatToMerc,
    /// Closed-form EPSG:3857 to EPSG:4326.
    MercToLonLat,
    /// Generic proj4rs transform.
    Proj4rs {
        source: Box<Proj>,
        target: Box<Proj>,
        source_is_geographic: bool,
        target_is_geographic: bool,
    },
}

/// Transforms `(x, y)` points from a source CRS to a target CRS.
///
/// Geographic coordinates are always given and returned in degrees as
/// `(lon, lat)`; projected coordinates in the CRS's native units.
pub struct CoordTransformer {
    source: Crs,
    target: Crs,
    strategy: Strategy,
}

impl std::fmt::Debug for CoordTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strategy = match self.strategy {
            Strategy::Identity => "identity",
            Strategy::LonLatToMerc => "lonlat->merc",
            Strategy::MercToLonLat => "merc->lonlat",
            Strategy::Proj4rs { .. } => "proj4rs",
        };
        f.debug_struct("CoordTransformer")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("strategy", &strategy)
            .finish()
    }
}

impl CoordTransformer {
    /// Create a transformer between two CRSs.
    ///
    /// Uses closed-form math for WGS84 <-> Web Mercator and proj4rs otherwise.
    pub fn new(source: &Crs, target: &Crs) -> ProjectionResult<Self> {
        let strategy = match (source.epsg(), target.epsg()) {
            _ if source == target => Strategy::Identity,
            (Some(4326), Some(3857)) => Strategy::LonLatToMerc,
            (Some(3857), Some(4326)) => Strategy::MercToLonLat,
            _ => {
                let source_def = proj_string(source)
                    .ok_or_else(|| ProjectionError::UnsupportedCrs(source.to_string()))?;
                let target_def = proj_string(target)
                    .ok_or_else(|| ProjectionError::UnsupportedCrs(target.to_string()))?;
                let source_proj = Proj::from_proj_string(&source_def)
                    .map_err(|e| ProjectionError::proj_init(source, format!("{:?}", e)))?;
                let target_proj = Proj::from_proj_string(&target_def)
                    .map_err(|e| ProjectionError::proj_init(target, format!("{:?}", e)))?;
                Strategy::Proj4rs {
                    source: Box::new(source_proj),
                    target: Box::new(target_proj),
                    source_is_geographic: source.is_geographic(),
                    target_is_geographic: target.is_geographic(),
                }
            }
        };
        debug!(source = %source, target = %target, "Created coordinate transformer");
        Ok(Self {
            source: source.clone(),
            target: target.clone(),
            strategy,
        })
    }

    /// Transformer from WGS84 lon/lat to `target`.
    pub fn from_lonlat_to(target: &Crs) -> ProjectionResult<Self> {
        Self::new(&Crs::wgs84(), target)
    }

    /// Transformer from `source` to WGS84 lon/lat.
    pub fn to_lonlat_from(source: &Crs) -> ProjectionResult<Self> {
        Self::new(source, &Crs::wgs84())
    }

    pub fn source(&self) -> &Crs {
        &self.source
    }

    pub fn target(&self) -> &Crs {
        &self.target
    }

    /// Transform a single point.
    #[inline]
    pub fn transform(&self, x: f64, y: f64) -> ProjectionResult<(f64, f64)> {
        match &self.strategy {
            Strategy::Identity => Ok((x, y)),
            Strategy::LonLatToMerc => Ok(lonlat_to_merc(x, y)),
            Strategy::MercToLonLat => Ok(merc_to_lonlat(x, y)),
            Strategy::Proj4rs {
                source,
                target,
                source_is_geographic,
                target_is_geographic,
            } => {
                let mut point = if *source_is_geographic {
                    (x.to_radians(), y.to_radians(), 0.0)
                } else {
                    (x, y, 0.0)
                };
                proj4rs::transform::transform(source, target, &mut point).map_err(|e| {
                    ProjectionError::TransformFailed {
                        x,
                        y,
                        message: format!("{:?}", e),
                    }
                })?;
                if *target_is_geographic {
                    Ok((point.0.to_degrees(), point.1.to_degrees()))
                } else {
                    Ok((point.0, point.1))
                }
            }
        }
    }

    /// Transform paired coordinate slices.
    pub fn transform_slices(&self, xs: &[f64], ys: &[f64]) -> ProjectionResult<(Vec<f64>, Vec<f64>)> {
        if xs.len() != ys.len() {
            return Err(ProjectionError::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        let mut out_x = Vec::with_capacity(xs.len());
        let mut out_y = Vec::with_capacity(ys.len());
        for (&x, &y) in xs.iter().zip(ys) {
            let (tx, ty) = self.transform(x, y)?;
            out_x.push(tx);
            out_y.push(ty);
        }
        Ok((out_x, out_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = CoordTransformer::new(&Crs::Epsg(32633), &Crs::Epsg(32633)).unwrap();
        assert_eq!(t.transform(1.0, 2.0).unwrap(), (1.0, 2.0));
    }

    #[test]
    fn test_fast_path_roundtrip() {
        let fwd = CoordTransformer::from_lonlat_to(&Crs::Epsg(3857)).unwrap();
        let inv = CoordTransformer::to_lonlat_from(&Crs::Epsg(3857)).unwrap();
        let (x, y) = fwd.transform(10.0, 45.0).unwrap();
        let (lon, lat) = inv.transform(x, y).unwrap();
        assert!((lon - 10.0).abs() < 1e-9);
        assert!((lat - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_crs() {
        let err = CoordTransformer::new(&Crs::Epsg(4326), &Crs::Epsg(2154)).unwrap_err();
        assert!(matches!(err, ProjectionError::UnsupportedCrs(_)));
    }

    #[test]
    fn test_utm_central_meridian() {
        // Zone 33 is centred on 15E, where the false easting is exact.
        let t = CoordTransformer::from_lonlat_to(&Crs::Epsg(32633)).unwrap();
        let (x, y) = t.transform(15.0, 52.0).unwrap();
        assert!((x - 500_000.0).abs() < 1e-3);
        assert!(y > 5_700_000.0 && y < 5_800_000.0);
    }

    #[test]
    fn test_length_mismatch() {
        let t = CoordTransformer::from_lonlat_to(&Crs::Epsg(3857)).unwrap();
        assert!(t.transform_slices(&[0.0, 1.0], &[0.0]).is_err());
    }
}
