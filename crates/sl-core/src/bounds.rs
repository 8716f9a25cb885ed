//! City extents: axis-aligned bounding box and optional boundary polygon.
//!
//! When a `CityBoundary` polygon is available it overrides bounding-box
//! containment during dataset normalization. Holes and multi-polygons are
//! stored as a flat ring list; even-odd ray casting then handles holes
//! without distinguishing ring roles.

use crate::geo::{haversine_km, point_to_segment_m, LatLng, METERS_PER_DEGREE_LAT};

// ── CityBounds ────────────────────────────────────────────────────────────────

/// Axis-aligned city bounding box. Invariant: `south < north`, `west < east`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityBounds {
    pub south: f64,
    pub west:  f64,
    pub north: f64,
    pub east:  f64,
}

impl CityBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self { south, west, north, east }
    }

    #[inline]
    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lon >= self.west && p.lon <= self.east
    }

    #[inline]
    pub fn mid_lat(&self) -> f64 {
        (self.south + self.north) * 0.5
    }

    /// Expand each side by `meters`, with the longitude padding scaled by
    /// `cos(midLat)` so the padding is metric on both axes.
    pub fn padded(&self, meters: f64) -> CityBounds {
        let lat_pad = meters / METERS_PER_DEGREE_LAT;
        let cos_mid = self.mid_lat().to_radians().cos().max(1e-6);
        let lon_pad = meters / (METERS_PER_DEGREE_LAT * cos_mid);
        CityBounds {
            south: self.south - lat_pad,
            west:  self.west - lon_pad,
            north: self.north + lat_pad,
            east:  self.east + lon_pad,
        }
    }

    /// Corner-to-corner haversine span, used to size "around" queries.
    pub fn diagonal_km(&self) -> f64 {
        haversine_km(
            LatLng::new(self.south, self.west),
            LatLng::new(self.north, self.east),
        )
    }
}

// ── CityBoundary ──────────────────────────────────────────────────────────────

/// City boundary polygon set: outer rings and holes from one or more
/// polygons, flattened. Even-odd containment treats every ring identically.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityBoundary {
    pub rings: Vec<Vec<LatLng>>,
}

impl CityBoundary {
    pub fn new(rings: Vec<Vec<LatLng>>) -> Self {
        Self { rings }
    }

    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(|r| r.len() < 3)
    }

    /// Even-odd ray-cast containment over all rings. A point collinear with
    /// and on a boundary segment counts as inside.
    pub fn contains(&self, p: LatLng) -> bool {
        let mut inside = false;
        for ring in &self.rings {
            if ring.len() < 3 {
                continue;
            }
            let mut j = ring.len() - 1;
            for i in 0..ring.len() {
                let a = ring[j];
                let b = ring[i];
                if on_segment(p, a, b) {
                    return true;
                }
                if (b.lat > p.lat) != (a.lat > p.lat) {
                    let x = a.lon + (p.lat - a.lat) * (b.lon - a.lon) / (b.lat - a.lat);
                    if p.lon < x {
                        inside = !inside;
                    }
                }
                j = i;
            }
        }
        inside
    }

    /// Distance in metres from `p` to the nearest boundary segment. Rings
    /// are closed for this check: the last point connects back to the first.
    pub fn boundary_distance_m(&self, p: LatLng) -> f64 {
        let mut best = f64::INFINITY;
        for ring in &self.rings {
            if ring.len() < 2 {
                continue;
            }
            for i in 0..ring.len() {
                let a = ring[i];
                let b = ring[(i + 1) % ring.len()];
                let d = point_to_segment_m(p, a, b);
                if d < best {
                    best = d;
                }
            }
        }
        best
    }

    /// Containment with a metric tolerance: inside the polygon, or within
    /// `tolerance_m` of its boundary.
    pub fn within_m(&self, p: LatLng, tolerance_m: f64) -> bool {
        self.contains(p) || self.boundary_distance_m(p) <= tolerance_m
    }
}

/// `true` when `p` lies on the segment `a`-`b` (collinear and between the
/// endpoints, in degree space).
fn on_segment(p: LatLng, a: LatLng, b: LatLng) -> bool {
    const EPS: f64 = 1e-12;
    let cross = (b.lon - a.lon) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lon - a.lon);
    if cross.abs() > EPS {
        return false;
    }
    p.lat >= a.lat.min(b.lat) - EPS
        && p.lat <= a.lat.max(b.lat) + EPS
        && p.lon >= a.lon.min(b.lon) - EPS
        && p.lon <= a.lon.max(b.lon) + EPS
}
