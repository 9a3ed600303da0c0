//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For projected CRS (EPSG:3857, etc.), coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a bounding box from `(min, max)` ranges along each axis.
    ///
    /// Fails unless both ranges are finite and strictly increasing.
    pub fn from_xy(x: (f64, f64), y: (f64, f64)) -> GeoResult<Self> {
        let bbox = Self::new(x.0, y.0, x.1, y.1);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check that the box is finite and well-ordered.
    pub fn validate(&self) -> GeoResult<()> {
        let values = [self.min_x, self.min_y, self.max_x, self.max_y];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeoError::InvalidBbox(format!("non-finite bounds {:?}", self)));
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(GeoError::InvalidBbox(format!(
                "bounds not well-ordered: x=({}, {}), y=({}, {})",
                self.min_x, self.max_x, self.min_y, self.max_y
            )));
        }
        Ok(())
    }

    /// Range along the x axis as `(min, max)`.
    pub fn range_x(&self) -> (f64, f64) {
        (self.min_x, self.max_x)
    }

    /// Range along the y axis as `(min, max)`.
    pub fn range_y(&self) -> (f64, f64) {
        (self.min_y, self.max_y)
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Expand the box outward so every edge lies on a multiple of `resolution`.
    pub fn snap_to_resolution(&self, resolution: f64) -> Self {
        // Absorb float noise so 0.1-style steps do not grow an extra cell.
        let snap_down = |v: f64| ((v / resolution) + 1e-9).floor() * resolution;
        let snap_up = |v: f64| ((v / resolution) - 1e-9).ceil() * resolution;
        Self {
            min_x: snap_down(self.min_x),
            min_y: snap_down(self.min_y),
            max_x: snap_up(self.max_x),
            max_y: snap_up(self.max_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_xy_rejects_reversed_bounds() {
        assert!(BoundingBox::from_xy((10.0, 0.0), (0.0, 5.0)).is_err());
        assert!(BoundingBox::from_xy((0.0, 10.0), (5.0, 5.0)).is_err());
        assert!(BoundingBox::from_xy((0.0, f64::NAN), (0.0, 5.0)).is_err());
        assert!(BoundingBox::from_xy((0.0, 10.0), (0.0, 5.0)).is_ok());
    }

    #[test]
    fn test_snap_to_resolution() {
        let bbox = BoundingBox::new(-10.3, 20.1, 9.7, 29.95).snap_to_resolution(0.5);
        assert!((bbox.min_x - -10.5).abs() < 1e-9);
        assert!((bbox.max_x - 10.0).abs() < 1e-9);
        assert!((bbox.min_y - 20.0).abs() < 1e-9);
        assert!((bbox.max_y - 30.0).abs() < 1e-9);

        // Already aligned bounds stay put
        let aligned = BoundingBox::new(0.0, 0.0, 1.0, 1.0).snap_to_resolution(0.1);
        assert!((aligned.max_x - 1.0).abs() < 1e-9);
        assert!((aligned.min_x - 0.0).abs() < 1e-9);
    }
}
