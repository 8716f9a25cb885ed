//! Street graph representation and builder.
//!
//! # Data layout
//!
//! The graph is an **undirected multigraph**: nodes are segment endpoints
//! (keyed by their stable string id), edges carry one full segment polyline
//! each. Parallel edges between the same endpoint pair are permitted, and
//! completed segments become edges like any other; completion is consulted
//! only by the planner's reward function.
//!
//! Nodes and edges live in insertion-ordered `Vec`s indexed by `NodeId` /
//! `EdgeId`, so candidate enumeration is deterministic for a given segment
//! list. A `FxHashMap` interns string keys on the way in.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest node, used once
//! per planning request to snap the home location to a start node.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use sl_core::{EdgeId, LatLng, NodeId, StreetSegment};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space. Sufficient for
    /// nearest-node queries within a city (error < 0.1 % at ≤ 60° lat).
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Graph types ───────────────────────────────────────────────────────────────

/// A graph node: one shared segment endpoint.
#[derive(Clone, Debug)]
pub struct GraphNode {
    /// Stable string id: `osm-node-<raw>` or a quantized coordinate key.
    pub key: String,
    pub point: LatLng,
    /// Incident edges, one entry per edge end (a self-loop appears once).
    pub edges: Vec<EdgeId>,
}

/// An undirected graph edge: one street segment with its full geometry.
#[derive(Clone, Debug)]
pub struct GraphEdge {
    /// The segment id; doubles as the street id in coverage bookkeeping.
    pub segment_id: String,
    pub street_name: String,
    pub from: NodeId,
    pub to: NodeId,
    /// Segment polyline; `path[0]` sits at `from`, `path[last]` at `to`.
    pub path: Vec<LatLng>,
    /// Haversine polyline length in kilometres.
    pub distance_km: f64,
    pub completed: bool,
}

impl GraphEdge {
    /// The endpoint opposite `node`. For a self-loop both ends coincide.
    #[inline]
    pub fn other(&self, node: NodeId) -> NodeId {
        if node == self.from {
            self.to
        } else {
            self.from
        }
    }
}

/// Undirected street multigraph with interned node keys and a spatial
/// index. Do not construct directly; use [`StreetGraphBuilder`].
pub struct StreetGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_index: FxHashMap<String, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl StreetGraph {
    /// Build a graph from a segment slice in one pass. Segments with fewer
    /// than two path points are skipped.
    pub fn from_segments<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = &'a StreetSegment>,
    {
        let mut b = StreetGraphBuilder::new();
        for seg in segments {
            b.add_segment(seg);
        }
        b.build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    // ── Indexed access ────────────────────────────────────────────────────

    #[inline]
    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &GraphEdge {
        &self.edges[id.index()]
    }

    /// Number of incident edge ends at `node` (parallel edges count).
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.nodes[node.index()].edges.len()
    }

    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        self.node_index.get(key).copied()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Edges in insertion order; this order drives candidate enumeration.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &GraphEdge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over `(edge, neighbor)` pairs at `node`.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId)> + '_ {
        self.nodes[node.index()]
            .edges
            .iter()
            .map(move |&e| (e, self.edges[e.index()].other(node)))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `pos`, or `None` for an empty graph.
    pub fn nearest_node(&self, pos: LatLng) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }
}

// ── StreetGraphBuilder ────────────────────────────────────────────────────────

/// Construct a [`StreetGraph`] incrementally, then call [`build`](Self::build).
///
/// `build()` bulk-loads the R-tree; everything else is incremental so the
/// planner can feed it straight from the candidate list.
pub struct StreetGraphBuilder {
    nodes:      Vec<GraphNode>,
    edges:      Vec<GraphEdge>,
    node_index: FxHashMap<String, NodeId>,
}

impl StreetGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes:      Vec::new(),
            edges:      Vec::new(),
            node_index: FxHashMap::default(),
        }
    }

    /// Intern an endpoint key, creating the node on first sight.
    fn intern_node(&mut self, key: String, point: LatLng) -> NodeId {
        if let Some(&id) = self.node_index.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.node_index.insert(key.clone(), id);
        self.nodes.push(GraphNode {
            key,
            point,
            edges: Vec::new(),
        });
        id
    }

    /// Register one segment as an undirected edge. Returns the new edge id,
    /// or `None` when the segment's path is too short to form an edge.
    pub fn add_segment(&mut self, seg: &StreetSegment) -> Option<EdgeId> {
        if seg.path.len() < 2 {
            return None;
        }

        let from = self.intern_node(seg.start_key(), seg.path[0]);
        let to = self.intern_node(seg.end_key(), seg.path[seg.path.len() - 1]);

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(GraphEdge {
            segment_id:  seg.id.clone(),
            street_name: seg.name.clone(),
            from,
            to,
            path:        seg.path.clone(),
            distance_km: seg.distance_km(),
            completed:   seg.completed,
        });

        self.nodes[from.index()].edges.push(id);
        if to != from {
            self.nodes[to.index()].edges.push(id);
        }
        Some(id)
    }

    /// Consume the builder and produce a [`StreetGraph`].
    pub fn build(self) -> StreetGraph {
        // Bulk-load the R-tree for O(N log N) construction.
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| NodeEntry {
                point: [n.point.lat, n.point.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        StreetGraph {
            nodes: self.nodes,
            edges: self.edges,
            node_index: self.node_index,
            spatial_idx,
        }
    }
}

impl Default for StreetGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
