//! Street segment model and naming rules.
//!
//! A `StreetSegment` is one runnable piece of a street: OSM ways are split
//! at shared nodes during normalization, so several segments may carry the
//! same street name. Segments are immutable after dataset load except for
//! the `completed` flag.

use crate::geo::{polyline_distance_km, LatLng};

/// Where a segment came from. Manual segments have no OSM node ids; their
/// endpoint keys are derived from quantized coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentSource {
    Osm,
    Manual,
}

/// One runnable piece of a street.
///
/// Invariants: `path.len() >= 2`; `path[0]` and `path[last]` correspond to
/// `start_node_id` and `end_node_id` when those are set.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetSegment {
    /// Stable id, e.g. `osm-<way>-<startNode>-<endNode>-<idx>`.
    pub id: String,
    /// Display name. Non-empty and never an "unnamed road/street" placeholder.
    pub name: String,
    /// Ordered polyline, at least two points.
    pub path: Vec<LatLng>,
    /// Graph endpoint key for `path[0]`, when sourced from OSM.
    pub start_node_id: Option<String>,
    /// Graph endpoint key for `path[last]`, when sourced from OSM.
    pub end_node_id: Option<String>,
    pub completed: bool,
    pub source: SegmentSource,
}

impl StreetSegment {
    /// Endpoint key for the start of the path: the OSM node id when known,
    /// otherwise the quantized start coordinate.
    pub fn start_key(&self) -> String {
        match &self.start_node_id {
            Some(id) => id.clone(),
            None => quantize_node_key(self.path[0]),
        }
    }

    /// Endpoint key for the end of the path.
    pub fn end_key(&self) -> String {
        match &self.end_node_id {
            Some(id) => id.clone(),
            None => quantize_node_key(*self.path.last().expect("segment path is non-empty")),
        }
    }

    /// Polyline length in kilometres.
    pub fn distance_km(&self) -> f64 {
        polyline_distance_km(&self.path)
    }
}

// ── Naming ────────────────────────────────────────────────────────────────────

/// Normalize a street name for dedup keys: lowercase, trim, periods
/// removed, whitespace collapsed. Idempotent.
pub fn normalize_street_name(name: &str) -> String {
    let lowered = name.to_lowercase().replace('.', "");
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `true` when a way's name tag is usable as a street name.
pub fn is_displayable_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    lowered != "unnamed road" && lowered != "unnamed street"
}

/// Derive a graph node key from a coordinate by quantizing to 5 decimal
/// places (~1.1 m). Segments without OSM node ids join the graph through
/// these keys, so nearby manual endpoints snap to the same node.
pub fn quantize_node_key(p: LatLng) -> String {
    format!("{:.5},{:.5}", p.lat, p.lon)
}
