//! Nominatim place model and candidate ranking.
//!
//! A city query returns up to eight loosely-typed places; scoring prefers
//! city-like address types near place rank 16 whose display name starts
//! with the query, and the best candidate must carry a valid bounding box.
//! The optional `polygon_geojson` geometry becomes the `CityBoundary` used
//! for containment.

use serde::Deserialize;

use sl_core::{CityBoundary, CityBounds, LatLng};

// ── Wire shape ────────────────────────────────────────────────────────────────

/// One `format=jsonv2` search result. All fields tolerate absence.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NominatimPlace {
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub addresstype: String,
    #[serde(default)]
    pub place_rank: i32,
    /// `[south, north, west, east]` as strings, per the Nominatim wire
    /// format.
    #[serde(default)]
    pub boundingbox: Vec<String>,
    #[serde(default)]
    pub geojson: Option<serde_json::Value>,
}

/// The outcome of city resolution: bounds always, polygon when Nominatim
/// returned one.
#[derive(Clone, Debug)]
pub struct ResolvedCity {
    pub display_name: String,
    pub bounds: CityBounds,
    pub boundary: Option<CityBoundary>,
}

// ── Ranking ───────────────────────────────────────────────────────────────────

const CITY_TYPES: [&str; 3] = ["city", "town", "municipality"];
const LOCALITY_TYPES: [&str; 4] = ["village", "borough", "suburb", "hamlet"];
const REGION_TYPES: [&str; 4] = ["county", "state", "region", "country"];

/// Score one place against the city query. Higher is better.
pub fn rank_place(city: &str, place: &NominatimPlace) -> i32 {
    let token = city
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let display = place.display_name.to_lowercase();

    let mut score = 0;
    if !token.is_empty() {
        if display.starts_with(&token) {
            score += 42;
        } else if display.contains(&token) {
            score += 12;
        }
    }

    let addresstype = place.addresstype.as_str();
    if CITY_TYPES.contains(&addresstype) {
        score += 120;
    } else if LOCALITY_TYPES.contains(&addresstype) {
        score += 72;
    } else if REGION_TYPES.contains(&addresstype) {
        score -= 130;
    }

    if CITY_TYPES.contains(&place.kind.as_str()) || place.kind == "administrative" {
        score += 55;
    }

    // Cities sit near place rank 16; drift in either direction costs.
    score += (22 - (16 - place.place_rank).abs() * 4).max(-24);

    score
}

/// Pick the highest-scoring place with a valid bounding box. Ties resolve
/// to the earliest candidate, matching Nominatim's own relevance order.
pub fn resolve_city(city: &str, places: &[NominatimPlace]) -> Option<ResolvedCity> {
    let mut best: Option<(i32, &NominatimPlace, CityBounds)> = None;
    for place in places {
        let Some(bounds) = parse_bounding_box(&place.boundingbox) else {
            continue;
        };
        let score = rank_place(city, place);
        if best.as_ref().is_none_or(|(s, _, _)| score > *s) {
            best = Some((score, place, bounds));
        }
    }

    best.map(|(_, place, bounds)| ResolvedCity {
        display_name: place.display_name.clone(),
        bounds,
        boundary: place.geojson.as_ref().and_then(boundary_from_geojson),
    })
}

/// `[south, north, west, east]` strings to `CityBounds`; rejects malformed
/// or inverted boxes.
fn parse_bounding_box(bbox: &[String]) -> Option<CityBounds> {
    if bbox.len() != 4 {
        return None;
    }
    let south: f64 = bbox[0].parse().ok()?;
    let north: f64 = bbox[1].parse().ok()?;
    let west: f64 = bbox[2].parse().ok()?;
    let east: f64 = bbox[3].parse().ok()?;
    if south >= north || west >= east {
        return None;
    }
    Some(CityBounds::new(south, west, north, east))
}

// ── GeoJSON boundary ──────────────────────────────────────────────────────────

/// Extract rings from a GeoJSON `Polygon` or `MultiPolygon` value.
/// Anything else (points, linestrings, malformed coordinates) yields
/// `None`; a boundary is optional everywhere downstream.
fn boundary_from_geojson(geojson: &serde_json::Value) -> Option<CityBoundary> {
    let kind = geojson.get("type")?.as_str()?;
    let coords = geojson.get("coordinates")?;

    let mut rings: Vec<Vec<LatLng>> = Vec::new();
    match kind {
        "Polygon" => collect_polygon(coords, &mut rings),
        "MultiPolygon" => {
            for poly in coords.as_array()? {
                collect_polygon(poly, &mut rings);
            }
        }
        _ => return None,
    }

    if rings.is_empty() {
        None
    } else {
        Some(CityBoundary::new(rings))
    }
}

fn collect_polygon(coords: &serde_json::Value, rings: &mut Vec<Vec<LatLng>>) {
    let Some(ring_values) = coords.as_array() else {
        return;
    };
    for ring_value in ring_values {
        let Some(points) = ring_value.as_array() else {
            continue;
        };
        let ring: Vec<LatLng> = points
            .iter()
            .filter_map(|pair| {
                let xy = pair.as_array()?;
                // GeoJSON order is [lon, lat].
                Some(LatLng::new(xy.get(1)?.as_f64()?, xy.get(0)?.as_f64()?))
            })
            .collect();
        if ring.len() >= 3 {
            rings.push(ring);
        }
    }
}
