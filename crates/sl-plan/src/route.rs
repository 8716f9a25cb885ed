//! The realized route and node-coverage accounting.

use sl_core::{point_to_path_m, LatLng};
use sl_graph::StreetGraph;

/// A graph node counts as covered when it lies within 20 ft of the route
/// polyline.
pub const NODE_CAPTURE_RADIUS_METERS: f64 = 6.096;

/// A realized coverage plan: a single continuous polyline plus the
/// street/node bookkeeping the host renders.
#[derive(Clone, Debug)]
pub struct SuggestedRoute {
    pub id: String,
    pub name: String,
    /// Continuous polyline; consecutive points from different edges never
    /// sit more than 18 m apart within one connected component.
    pub points: Vec<LatLng>,
    /// Street ids walked, in first-traversal order.
    pub street_ids: Vec<String>,
    /// Distinct street names walked, in first-traversal order.
    pub street_names: Vec<String>,
    /// Haversine length of `points` (within rounding of the per-edge sum).
    pub distance_km: f64,
    pub strategy: String,
    /// Node ids within [`NODE_CAPTURE_RADIUS_METERS`] of `points`, in
    /// `available_nodes` order.
    pub node_ids_covered: Vec<String>,
    /// Positions matching `node_ids_covered`.
    pub node_points: Vec<LatLng>,
    /// Every graph node id, in graph insertion order.
    pub available_nodes: Vec<String>,
}

/// Node-coverage accounting output.
pub struct NodeCoverage {
    pub covered_ids: Vec<String>,
    pub covered_points: Vec<LatLng>,
    pub available: Vec<String>,
}

/// Classify every graph node against the realized polyline. Output lists
/// preserve the graph's node insertion order.
pub fn node_coverage(graph: &StreetGraph, points: &[LatLng]) -> NodeCoverage {
    let mut covered_ids = Vec::new();
    let mut covered_points = Vec::new();
    let mut available = Vec::with_capacity(graph.node_count());

    for (_, node) in graph.nodes() {
        available.push(node.key.clone());
        if point_to_path_m(node.point, points) <= NODE_CAPTURE_RADIUS_METERS {
            covered_ids.push(node.key.clone());
            covered_points.push(node.point);
        }
    }

    NodeCoverage {
        covered_ids,
        covered_points,
        available,
    }
}
