//! Candidate selection: the segment subset the graph is built from.
//!
//! Selection is geometric on purpose: segments are ranked by the haversine
//! distance from home to their nearer endpoint, and a target-scaled radius
//! plus count cap bound the graph size. Isolated clusters can slip in;
//! the planner's unreachable-distance guard skips them later.

use sl_core::{haversine_km, CityBounds, LatLng, StreetSegment};

/// Radius in km around home that candidates may come from.
fn candidate_radius_km(target_km: f64) -> f64 {
    (target_km * 1.45 + 1.3).clamp(2.2, 32.0)
}

/// Hard cap on the number of candidates fed to the graph.
fn candidate_cap(target_km: f64) -> usize {
    ((target_km * 168.0).round() as usize).clamp(320, 4200)
}

/// Below this count the radius filter is abandoned for a plain
/// nearest-first prefix.
fn fallback_threshold(target_km: f64) -> usize {
    ((target_km * 22.0).round() as usize).max(120)
}

fn fallback_cap(target_km: f64) -> usize {
    ((target_km * 72.0).round() as usize).max(320)
}

/// Select and order the candidate segments for one planning request.
///
/// `target_km` must already be clamped by the caller. Segments outside
/// `bounds` (when given) or with degenerate paths never qualify.
pub fn select_candidates<'a>(
    streets: &'a [StreetSegment],
    home: LatLng,
    target_km: f64,
    bounds: Option<&CityBounds>,
) -> Vec<&'a StreetSegment> {
    let mut ranked: Vec<(f64, &StreetSegment)> = streets
        .iter()
        .filter(|seg| seg.path.len() >= 2)
        .filter(|seg| match bounds {
            Some(b) => b.contains(seg.path[0]) && b.contains(seg.path[seg.path.len() - 1]),
            None => true,
        })
        .map(|seg| {
            let start = haversine_km(home, seg.path[0]);
            let end = haversine_km(home, seg.path[seg.path.len() - 1]);
            (start.min(end), seg)
        })
        .collect();

    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let radius = candidate_radius_km(target_km);
    let cap = candidate_cap(target_km);

    let within: Vec<&StreetSegment> = ranked
        .iter()
        .take_while(|(entry, _)| *entry <= radius)
        .take(cap)
        .map(|(_, seg)| *seg)
        .collect();

    if within.len() >= fallback_threshold(target_km) {
        log::debug!("candidates: {} within {radius:.1} km", within.len());
        return within;
    }

    // Sparse area: take the nearest segments regardless of radius.
    let n = ranked.len().min(fallback_cap(target_km));
    log::debug!(
        "candidates: only {} within {radius:.1} km, falling back to nearest {n}",
        within.len()
    );
    ranked[..n].iter().map(|(_, seg)| *seg).collect()
}
