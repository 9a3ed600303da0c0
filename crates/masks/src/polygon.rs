//! Point-in-polygon tests on lon/lat rings.

/// A polygon with one exterior ring and any number of holes.
///
/// Rings are lists of `(lon, lat)` vertices; closing the ring is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Vec<(f64, f64)>,
    holes: Vec<Vec<(f64, f64)>>,
    bounds: (f64, f64, f64, f64),
}

impl Polygon {
    pub fn new(exterior: Vec<(f64, f64)>, holes: Vec<Vec<(f64, f64)>>) -> Self {
        let bounds = exterior.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        );
        Self {
            exterior,
            holes,
            bounds,
        }
    }

    pub fn exterior(&self) -> &[(f64, f64)] {
        &self.exterior
    }

    pub fn holes(&self) -> &[Vec<(f64, f64)>] {
        &self.holes
    }

    /// `(min_lon, min_lat, max_lon, max_lat)` of the exterior ring.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.bounds
    }

    /// Whether `(lon, lat)` is inside the exterior ring and outside every hole.
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        let (x0, y0, x1, y1) = self.bounds;
        if lon < x0 || lon > x1 || lat < y0 || lat > y1 {
            return false;
        }
        ring_contains(&self.exterior, lon, lat)
            && !self.holes.iter().any(|hole| ring_contains(hole, lon, lat))
    }
}

/// Ray casting: count crossings of a ray towards +lon.
fn ring_contains(ring: &[(f64, f64)], lon: f64, lat: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}
