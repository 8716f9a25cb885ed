//! Shortest-path engine: Dijkstra with a source-keyed memo cache.
//!
//! # Cache scope
//!
//! One planning request owns one [`DijkstraCache`]; it is passed explicitly
//! rather than held in module state so independent plans never share
//! results. Entries are `Rc`-shared because the planner re-reads a source's
//! result many times per iteration.
//!
//! # Determinism
//!
//! Heap ties break on ascending node id, and edge relaxation follows each
//! node's insertion-ordered incident list, so `(graph, source)` fully
//! determines the result.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use sl_core::{EdgeId, NodeId};

use crate::graph::StreetGraph;

// ── Results ───────────────────────────────────────────────────────────────────

/// Distances and predecessor chain from one source node.
///
/// `dist` is in kilometres with `f64::INFINITY` for unreachable nodes;
/// unreachable nodes have no `prev` entry.
pub struct DijkstraResult {
    pub dist: Vec<f64>,
    pub prev: Vec<Option<(NodeId, EdgeId)>>,
}

impl DijkstraResult {
    /// Walk `prev` from `target` back to the source and return the edge
    /// list in travel order. Empty when the chain is broken (unreachable).
    pub fn reconstruct_edges(&self, source: NodeId, target: NodeId) -> Vec<EdgeId> {
        if source == target {
            return Vec::new();
        }
        let mut edges = Vec::new();
        let mut cur = target;
        while cur != source {
            let Some((pred, edge)) = self.prev[cur.index()] else {
                return Vec::new(); // broken chain: unreachable
            };
            edges.push(edge);
            cur = pred;
        }
        edges.reverse();
        edges
    }
}

/// A composed shortest-path answer. `distance_km` is infinite and
/// `edge_ids` empty when the target is unreachable.
pub struct ShortestPath {
    pub distance_km: f64,
    pub edge_ids: Vec<EdgeId>,
}

// ── Cache ─────────────────────────────────────────────────────────────────────

/// Source-keyed Dijkstra memo for one planning request.
#[derive(Default)]
pub struct DijkstraCache {
    results: FxHashMap<NodeId, Rc<DijkstraResult>>,
}

impl DijkstraCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full single-source result, computed on first request.
    pub fn shortest(&mut self, graph: &StreetGraph, source: NodeId) -> Rc<DijkstraResult> {
        if let Some(r) = self.results.get(&source) {
            return Rc::clone(r);
        }
        let r = Rc::new(dijkstra(graph, source));
        self.results.insert(source, Rc::clone(&r));
        r
    }

    /// Cache lookup plus reconstruction.
    pub fn shortest_path_edges(
        &mut self,
        graph: &StreetGraph,
        from: NodeId,
        to: NodeId,
    ) -> ShortestPath {
        let result = self.shortest(graph, from);
        let distance_km = result.dist[to.index()];
        if !distance_km.is_finite() {
            return ShortestPath {
                distance_km: f64::INFINITY,
                edge_ids: Vec::new(),
            };
        }
        ShortestPath {
            distance_km,
            edge_ids: result.reconstruct_edges(from, to),
        }
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Min-heap entry over km costs. `BinaryHeap` is a max-heap, so the `Ord`
/// impl is reversed; costs are finite sums of finite edge lengths, never
/// NaN.
#[derive(Copy, Clone, PartialEq)]
struct HeapEntry {
    dist_km: f64,
    node: NodeId,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist_km
            .partial_cmp(&self.dist_km)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(graph: &StreetGraph, source: NodeId) -> DijkstraResult {
    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<(NodeId, EdgeId)>> = vec![None; n];

    dist[source.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry {
        dist_km: 0.0,
        node: source,
    });

    while let Some(HeapEntry { dist_km, node }) = heap.pop() {
        // Skip stale heap entries.
        if dist_km > dist[node.index()] {
            continue;
        }

        for (edge, neighbor) in graph.neighbors(node) {
            let next = dist_km + graph.edge(edge).distance_km;
            if next < dist[neighbor.index()] {
                dist[neighbor.index()] = next;
                prev[neighbor.index()] = Some((node, edge));
                heap.push(HeapEntry {
                    dist_km: next,
                    node: neighbor,
                });
            }
        }
    }

    DijkstraResult { dist, prev }
}

// ── Orientation ───────────────────────────────────────────────────────────────

/// One traversal of an edge in a chosen direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraversalStep {
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
}

impl TraversalStep {
    /// The same edge walked the opposite way.
    pub fn reversed(self) -> TraversalStep {
        TraversalStep {
            edge: self.edge,
            from: self.to,
            to: self.from,
        }
    }
}

/// Orient an undirected edge list into a chained step sequence starting at
/// `start`, such that `step[i].to == step[i+1].from`. Returns `None` when
/// some edge is not incident to the running endpoint.
pub fn orient_path_edges(
    graph: &StreetGraph,
    start: NodeId,
    edge_ids: &[EdgeId],
) -> Option<Vec<TraversalStep>> {
    let mut steps = Vec::with_capacity(edge_ids.len());
    let mut cur = start;
    for &id in edge_ids {
        let e = graph.edge(id);
        let to = if e.from == cur {
            e.to
        } else if e.to == cur {
            e.from
        } else {
            return None;
        };
        steps.push(TraversalStep {
            edge: id,
            from: cur,
            to,
        });
        cur = to;
    }
    Some(steps)
}
