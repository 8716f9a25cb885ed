//! Eulerization of a selected edge set and Hierholzer traversal.
//!
//! This is the secondary path of the planner: given edges chosen for
//! coverage, duplicate connector edges until every vertex has even degree,
//! then walk the whole multiset in one closed trail. The greedy tour
//! builder does not call into this module; it exists as a standalone API.

use rustc_hash::FxHashMap;

use sl_core::{EdgeId, NodeId};

use crate::dijkstra::{DijkstraCache, TraversalStep};
use crate::graph::StreetGraph;

/// Build an Eulerian edge multiset from `edge_ids`.
///
/// Starts every selected edge at multiplicity 1, then repeatedly pairs the
/// first odd-degree node with its closest odd partner (by shortest path)
/// and increments the multiplicity of every edge along that path. Edges on
/// a pairing path join the multiset even when absent from the original
/// selection.
pub fn eulerize(
    graph: &StreetGraph,
    cache: &mut DijkstraCache,
    edge_ids: &[EdgeId],
) -> FxHashMap<EdgeId, u32> {
    let mut multiplicity: FxHashMap<EdgeId, u32> = FxHashMap::default();
    for &e in edge_ids {
        multiplicity.insert(e, 1);
    }

    let mut odd = odd_nodes(graph, &multiplicity);

    while odd.len() >= 2 {
        let a = odd.remove(0);
        let result = cache.shortest(graph, a);

        // Closest remaining odd partner; ties resolve to the earliest node.
        let mut best: Option<(usize, f64)> = None;
        for (i, &b) in odd.iter().enumerate() {
            let d = result.dist[b.index()];
            if d.is_finite() && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }

        let Some((i, _)) = best else {
            // No reachable partner: the selected set spans components.
            log::warn!("eulerize: odd node {a} has no reachable odd partner");
            continue;
        };
        let b = odd.remove(i);

        for e in result.reconstruct_edges(a, b) {
            *multiplicity.entry(e).or_insert(0) += 1;
        }
    }

    multiplicity
}

/// Nodes with odd total degree in the multiset, ascending by node id.
fn odd_nodes(graph: &StreetGraph, multiplicity: &FxHashMap<EdgeId, u32>) -> Vec<NodeId> {
    let mut degree = vec![0u32; graph.node_count()];
    for (&e, &m) in multiplicity {
        let edge = graph.edge(e);
        degree[edge.from.index()] += m;
        degree[edge.to.index()] += m;
    }
    degree
        .iter()
        .enumerate()
        .filter(|(_, d)| *d % 2 == 1)
        .map(|(i, _)| NodeId(i as u32))
        .collect()
}

/// Eulerize `edge_ids` and produce a Hierholzer traversal from `start`.
///
/// At each node the next unused incident edge token is consumed; when the
/// walk is stuck it pops back onto the trail. The final trail is the
/// reverse of the pop order. Edges unreachable from `start` are left out
/// (the selected set is expected to be connected).
pub fn eulerian_trail(
    graph: &StreetGraph,
    cache: &mut DijkstraCache,
    edge_ids: &[EdgeId],
    start: NodeId,
) -> Vec<TraversalStep> {
    let multiplicity = eulerize(graph, cache, edge_ids);
    hierholzer(graph, multiplicity, start)
}

fn hierholzer(
    graph: &StreetGraph,
    mut remaining: FxHashMap<EdgeId, u32>,
    start: NodeId,
) -> Vec<TraversalStep> {
    // Stack entries carry the step that arrived at the node; the start
    // carries none.
    let mut stack: Vec<(NodeId, Option<TraversalStep>)> = vec![(start, None)];
    let mut trail_rev: Vec<TraversalStep> = Vec::new();

    while let Some(&(u, _)) = stack.last() {
        let mut chosen: Option<EdgeId> = None;
        for &e in &graph.node(u).edges {
            if let Some(m) = remaining.get_mut(&e) {
                if *m > 0 {
                    *m -= 1;
                    chosen = Some(e);
                    break;
                }
            }
        }

        match chosen {
            Some(e) => {
                let v = graph.edge(e).other(u);
                stack.push((
                    v,
                    Some(TraversalStep {
                        edge: e,
                        from: u,
                        to: v,
                    }),
                ));
            }
            None => {
                if let Some((_, Some(step))) = stack.pop() {
                    trail_rev.push(step);
                }
            }
        }
    }

    trail_rev.reverse();
    trail_rev
}
