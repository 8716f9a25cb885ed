//! Dataset normalization: runnability filter, way splitting, dedup, and
//! city containment.
//!
//! # Pipeline
//!
//! ```text
//! Overpass elements
//!   → runnable ways (highway class + access + name)
//!   → split at shared nodes (one StreetSegment per piece)
//!   → dedup by (normalized name, unordered endpoint pair)
//!   → containment (polygon boundary, else padded bbox)
//! ```
//!
//! The graph's invariants depend on this stage: endpoint node ids minted
//! here decide which segments share graph nodes.

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use sl_core::street::is_displayable_name;
use sl_core::{
    normalize_street_name, CityBoundary, CityBounds, LatLng, SegmentSource, StreetSegment,
};

use crate::error::{OsmError, OsmResult};
use crate::model::{parse_payload, OsmElement, OsmWay};

// ── Tunables ──────────────────────────────────────────────────────────────────

/// `highway` values that count as runnable city streets.
pub const RUNNABLE_HIGHWAYS: [&str; 6] = [
    "residential",
    "unclassified",
    "tertiary",
    "secondary",
    "primary",
    "living_street",
];

/// Metric slack applied to segment endpoints during containment checks.
const ENDPOINT_TOLERANCE_M: f64 = 40.0;

/// Metric slack applied to interior path points near a polygon boundary.
const PATH_TOLERANCE_M: f64 = 22.0;

/// Minimum share of path points that must fall inside the city.
const MIN_INSIDE_SHARE: f64 = 0.72;

// ── Runnability ───────────────────────────────────────────────────────────────

/// A way is runnable when its road class admits pedestrians, access tags do
/// not forbid them, it is not an area, and it has a displayable name.
fn is_runnable(way: &OsmWay) -> bool {
    let Some(highway) = way.tag("highway") else {
        return false;
    };
    if !RUNNABLE_HIGHWAYS.contains(&highway) {
        return false;
    }
    for key in ["access", "foot"] {
        if matches!(way.tag(key), Some("private") | Some("no")) {
            return false;
        }
    }
    if way.tag("area") == Some("yes") {
        return false;
    }
    way.tag("name").is_some_and(is_displayable_name)
}

// ── Way splitting ─────────────────────────────────────────────────────────────

/// Convert payload elements into street segments, splitting ways at every
/// node shared with another retained way.
///
/// Node refs that resolve to no payload node are dropped per-way; a way
/// left with fewer than two resolvable refs is dropped entirely. When the
/// split pass yields nothing at all (a degenerate single-way graph), each
/// retained way becomes one whole segment instead.
pub fn segments_from_elements(elements: &[OsmElement]) -> Vec<StreetSegment> {
    let mut node_pos: FxHashMap<i64, LatLng> = FxHashMap::default();
    let mut ways: Vec<&OsmWay> = Vec::new();

    for el in elements {
        match el {
            OsmElement::Node(n) => {
                node_pos.insert(n.id, n.point);
            }
            OsmElement::Way(w) => {
                if is_runnable(w) {
                    ways.push(w);
                }
            }
        }
    }

    // Resolve refs now so usage counting and splitting see the same lists.
    let mut resolved: Vec<(&OsmWay, Vec<i64>)> = Vec::with_capacity(ways.len());
    for way in ways {
        let refs: Vec<i64> = way
            .nodes
            .iter()
            .copied()
            .filter(|id| node_pos.contains_key(id))
            .collect();
        if refs.len() != way.nodes.len() {
            log::warn!("way {} refers to nodes outside the payload", way.id);
        }
        if refs.len() >= 2 {
            resolved.push((way, refs));
        }
    }

    // Usage count across retained ways decides the split points.
    let mut usage: FxHashMap<i64, u32> = FxHashMap::default();
    for (_, refs) in &resolved {
        for id in refs {
            *usage.entry(*id).or_insert(0) += 1;
        }
    }

    let mut segments = Vec::new();
    let mut any_cut = false;
    for (way, refs) in &resolved {
        let name = way.tag("name").unwrap_or_default().trim().to_string();
        let last = refs.len() - 1;

        let mut cut_indices: Vec<usize> = vec![0];
        for (i, id) in refs.iter().enumerate().take(last).skip(1) {
            if usage.get(id).copied().unwrap_or(0) >= 2 {
                cut_indices.push(i);
            }
        }
        cut_indices.push(last);
        if cut_indices.len() > 2 {
            any_cut = true;
        }

        for (split_idx, pair) in cut_indices.windows(2).enumerate() {
            let (lo, hi) = (pair[0], pair[1]);
            let piece = &refs[lo..=hi];
            let path: Vec<LatLng> = piece.iter().map(|id| node_pos[id]).collect();
            segments.push(StreetSegment {
                id: format!("osm-{}-{}-{}-{}", way.id, piece[0], piece[hi - lo], split_idx),
                name: name.clone(),
                path,
                start_node_id: Some(format!("osm-node-{}", piece[0])),
                end_node_id: Some(format!("osm-node-{}", piece[hi - lo])),
                completed: false,
                source: SegmentSource::Osm,
            });
        }
    }

    // When splitting did nothing anywhere (a single-way graph, or ways that
    // only meet at endpoints), one whole segment per way with the plain way
    // id is the stable form.
    if !any_cut {
        segments.clear();
        for (way, refs) in &resolved {
            let name = way.tag("name").unwrap_or_default().trim().to_string();
            let path: Vec<LatLng> = refs.iter().map(|id| node_pos[id]).collect();
            segments.push(StreetSegment {
                id: format!("osm-{}", way.id),
                name,
                path,
                start_node_id: Some(format!("osm-node-{}", refs[0])),
                end_node_id: Some(format!("osm-node-{}", refs[refs.len() - 1])),
                completed: false,
                source: SegmentSource::Osm,
            });
        }
    }

    segments
}

// ── Dedup ─────────────────────────────────────────────────────────────────────

/// Drop the second occurrence of any `(normalized name, unordered endpoint
/// pair)` key. Idempotent; keeps first-seen order.
pub fn dedupe_segments(segments: Vec<StreetSegment>) -> Vec<StreetSegment> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        let (a, b) = (seg.start_key(), seg.end_key());
        let (lo, hi) = if a <= b { (&a, &b) } else { (&b, &a) };
        let key = format!("{}:{}:{}", normalize_street_name(&seg.name), lo, hi);
        if seen.insert(key) {
            out.push(seg);
        }
    }
    out
}

// ── Containment ───────────────────────────────────────────────────────────────

fn share_of_path_inside(seg: &StreetSegment, inside: impl Fn(LatLng) -> bool) -> f64 {
    let hits = seg.path.iter().filter(|&&p| inside(p)).count();
    hits as f64 / seg.path.len() as f64
}

/// Polygon containment: both endpoints inside the polygon or within 40 m
/// of it, and at least 72% of path points within 22 m.
pub fn filter_by_boundary(
    segments: Vec<StreetSegment>,
    boundary: &CityBoundary,
) -> Vec<StreetSegment> {
    segments
        .into_par_iter()
        .filter(|seg| {
            let start = seg.path[0];
            let end = seg.path[seg.path.len() - 1];
            if !boundary.within_m(start, ENDPOINT_TOLERANCE_M)
                || !boundary.within_m(end, ENDPOINT_TOLERANCE_M)
            {
                return false;
            }
            share_of_path_inside(seg, |p| boundary.within_m(p, PATH_TOLERANCE_M))
                >= MIN_INSIDE_SHARE
        })
        .collect()
}

/// Bounding-box containment with 40 m metric padding: endpoints inside and
/// at least 72% of path points inside.
pub fn filter_by_bounds(segments: Vec<StreetSegment>, bounds: &CityBounds) -> Vec<StreetSegment> {
    let padded = bounds.padded(ENDPOINT_TOLERANCE_M);
    segments
        .into_par_iter()
        .filter(|seg| {
            let start = seg.path[0];
            let end = seg.path[seg.path.len() - 1];
            if !padded.contains(start) || !padded.contains(end) {
                return false;
            }
            share_of_path_inside(seg, |p| padded.contains(p)) >= MIN_INSIDE_SHARE
        })
        .collect()
}

// ── Top-level pipeline ────────────────────────────────────────────────────────

/// Parse, split, dedup, and contain an Overpass payload in one call.
///
/// A polygon boundary overrides bounding-box containment. Returns
/// [`OsmError::NoStreetsInBoundary`] when nothing survives.
pub fn normalize_payload(
    text: &str,
    boundary: Option<&CityBoundary>,
    bounds: Option<&CityBounds>,
) -> OsmResult<Vec<StreetSegment>> {
    let elements = parse_payload(text)?;
    let split = segments_from_elements(&elements);
    let deduped = dedupe_segments(split);
    log::info!("normalized payload: {} segments after dedup", deduped.len());

    let contained = match (boundary, bounds) {
        (Some(poly), _) if !poly.is_empty() => filter_by_boundary(deduped, poly),
        (_, Some(bbox)) => filter_by_bounds(deduped, bbox),
        _ => deduped,
    };

    if contained.is_empty() {
        return Err(OsmError::NoStreetsInBoundary);
    }
    log::info!("containment kept {} segments", contained.len());
    Ok(contained)
}
