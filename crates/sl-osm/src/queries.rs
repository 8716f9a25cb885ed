//! Overpass query templates, endpoint pool, and city-name variants.
//!
//! Three query shapes are tried in order of failure: resolve the city as a
//! named administrative area, fall back to the resolved bounding box, then
//! to a radius around the city center.

use sl_core::{CityBounds, LatLng};

/// Overpass interpreter endpoints, tried sequentially per query.
pub const OVERPASS_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://lz4.overpass-api.de/api/interpreter",
];

/// Nominatim search endpoint.
pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Area query: resolve the city by name against administrative boundaries.
pub fn overpass_area_query(city: &str) -> String {
    let escaped = city.replace('"', "\\\"");
    format!(
        "[out:json][timeout:120];\n\
         (area[\"name\"=\"{escaped}\"][\"boundary\"=\"administrative\"][\"admin_level\"~\"5|6|7|8|9\"];\n \
         relation[\"name\"=\"{escaped}\"][\"boundary\"=\"administrative\"];)->.searchArea;\n\
         (way[\"highway\"](area.searchArea););\n\
         out body; >; out skel qt;"
    )
}

/// BBox query over the resolved city bounds.
pub fn overpass_bbox_query(bounds: &CityBounds) -> String {
    format!(
        "[out:json][timeout:120];\n\
         (way[\"highway\"]({},{},{},{}););\n\
         out body; >; out skel qt;",
        bounds.south, bounds.west, bounds.north, bounds.east
    )
}

/// Around query: a radius around the city center sized from the bounds
/// diagonal, clamped to [5, 24] km and rounded up to whole metres.
pub fn overpass_around_query(center: LatLng, bounds: &CityBounds) -> String {
    let radius_km = (bounds.diagonal_km() * 0.32).clamp(5.0, 24.0);
    let radius_m = (radius_km * 1000.0).ceil() as u64;
    format!(
        "[out:json][timeout:120];\n\
         (way[\"highway\"](around:{radius_m},{:.6},{:.6}););\n\
         out body; >; out skel qt;",
        center.lat, center.lon
    )
}

/// Name variants tried against Nominatim and the area query: the raw
/// input, the first comma token, the first two tokens, and the raw input
/// with a ", USA" suffix. Duplicates collapse, order is preserved.
pub fn city_name_variants(city: &str) -> Vec<String> {
    let raw = city.trim();
    let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();

    let mut variants: Vec<String> = Vec::new();
    let mut push = |v: String| {
        if !v.is_empty() && !variants.contains(&v) {
            variants.push(v);
        }
    };

    push(raw.to_string());
    if let Some(first) = tokens.first() {
        push(first.to_string());
    }
    if tokens.len() >= 2 {
        push(format!("{}, {}", tokens[0], tokens[1]));
    }
    push(format!("{raw}, USA"));

    variants
}
