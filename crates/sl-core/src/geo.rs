//! Geographic coordinate type and spatial utilities.
//!
//! `LatLng` uses `f64` latitude/longitude. Route points round-trip through
//! GPX at 6 decimal places (~0.11 m), which single precision cannot hold.

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Metres per degree of latitude in the local equirectangular frame.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// A WGS-84 geographic coordinate. Immutable by convention: construct a new
/// value rather than mutating in place.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Distances ─────────────────────────────────────────────────────────────────

/// Haversine great-circle distance in kilometres.
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Sum of haversine distances over consecutive pairs, in kilometres.
/// Zero for paths shorter than two points.
pub fn polyline_distance_km(path: &[LatLng]) -> f64 {
    path.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// Perpendicular distance in metres from `p` to the segment `a`-`b`,
/// clamped to the segment endpoints.
///
/// Projects all three points into a local equirectangular frame whose
/// origin is their centroid, so the metres-per-degree-longitude factor is
/// evaluated at a representative latitude.
pub fn point_to_segment_m(p: LatLng, a: LatLng, b: LatLng) -> f64 {
    let origin_lat = (p.lat + a.lat + b.lat) / 3.0;
    let m_per_lon = origin_lat.to_radians().cos() * METERS_PER_DEGREE_LAT;

    let px = (p.lon - a.lon) * m_per_lon;
    let py = (p.lat - a.lat) * METERS_PER_DEGREE_LAT;
    let bx = (b.lon - a.lon) * m_per_lon;
    let by = (b.lat - a.lat) * METERS_PER_DEGREE_LAT;

    let len2 = bx * bx + by * by;
    if len2 == 0.0 {
        return (px * px + py * py).sqrt();
    }

    let t = ((px * bx + py * by) / len2).clamp(0.0, 1.0);
    let dx = px - t * bx;
    let dy = py - t * by;
    (dx * dx + dy * dy).sqrt()
}

/// Minimum distance in metres from `p` to the polyline `path`.
/// Infinite when the path has fewer than two points.
pub fn point_to_path_m(p: LatLng, path: &[LatLng]) -> f64 {
    if path.len() < 2 {
        return f64::INFINITY;
    }
    let mut best = f64::INFINITY;
    for w in path.windows(2) {
        let d = point_to_segment_m(p, w[0], w[1]);
        if d < best {
            best = d;
        }
    }
    best
}
