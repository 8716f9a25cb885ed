//! The greedy coverage tour builder.
//!
//! # Shape of the loop
//!
//! From the start node the planner repeats three phases, in order:
//! dead-end spur sweeps (out-and-back into cul-de-sac chains), immediate
//! branch steps (single edges into quiet side streets), and one global
//! coverage move (ride a shortest-path connector to the best-scoring
//! uncovered edge anywhere in the graph). Every phase is scored; the
//! formulas here are the planning contract.
//!
//! # Budget discipline
//!
//! `hard_max_km` is never crossed: every candidate move is rejected when
//! its projected distance (including any distance still reserved for an
//! in-flight connector) would exceed it. Spurs additionally refuse to
//! project past `target_km * 1.1`, which keeps short plans from doubling
//! back over their only street.

use rustc_hash::FxHashSet;

use sl_core::{haversine_km, CityBounds, EdgeId, LatLng, NodeId, StreetSegment};
use sl_graph::{orient_path_edges, DijkstraCache, StreetGraph, TraversalStep};

use crate::candidates::select_candidates;
use crate::error::{PlanError, PlanResult};
use crate::route::{node_coverage, SuggestedRoute};

// ── Tunables ──────────────────────────────────────────────────────────────────

/// Smallest target the planner accepts; shorter requests are clamped up.
const MIN_TARGET_KM: f64 = 0.8;

/// Points closer than this (metres) merge when edge polylines are joined.
const SEAMLESS_JOIN_M: f64 = 18.0;

/// Longest chain of edges a spur walk may follow.
const SPUR_CHAIN_MAX_STEPS: usize = 12;

/// Spur count caps per sweep: at the top of an iteration, after a branch
/// step, and after a global-move step.
const SPURS_AT_ITERATION: usize = 5;
const SPURS_AFTER_BRANCH: usize = 2;
const SPURS_AFTER_MOVE: usize = 3;

/// Branch step caps: per iteration, and after a completed global move.
const BRANCH_STEPS_AT_ITERATION: usize = 6;
const BRANCH_STEPS_AFTER_MOVE: usize = 2;

// ── Public entry points ───────────────────────────────────────────────────────

/// Plan a single continuous coverage route from `home`.
///
/// Selects candidate segments around home, builds the street graph, and
/// runs the greedy tour. Fails with [`PlanError::Infeasible`] when there is
/// nothing to plan over: no candidates, no start node, every candidate
/// already completed, or no edge ever traversed.
pub fn build_efficient_coverage_route(
    streets: &[StreetSegment],
    home: LatLng,
    target_km: f64,
    bounds: Option<&CityBounds>,
) -> PlanResult<SuggestedRoute> {
    let target_km = target_km.max(MIN_TARGET_KM);

    let candidates = select_candidates(streets, home, target_km, bounds);
    if candidates.is_empty() {
        return Err(PlanError::Infeasible("no candidate streets near home"));
    }
    if candidates.iter().all(|seg| seg.completed) {
        return Err(PlanError::Infeasible("every candidate street is already completed"));
    }

    let graph = StreetGraph::from_segments(candidates.iter().copied());
    if graph.is_empty() {
        return Err(PlanError::Infeasible("candidate streets formed no graph edges"));
    }
    let Some(start) = graph.nearest_node(home) else {
        return Err(PlanError::Infeasible("no start node near home"));
    };

    let mut planner = Planner::new(&graph, start, target_km);
    planner.run();
    planner.into_route()
}

/// Historical alias: the "Eulerian" strategy delegates to the greedy
/// planner. The Eulerization machinery itself lives in `sl-graph::euler`
/// as a standalone API.
pub fn build_eulerian_route(
    streets: &[StreetSegment],
    home: LatLng,
    target_km: f64,
    bounds: Option<&CityBounds>,
) -> PlanResult<SuggestedRoute> {
    build_efficient_coverage_route(streets, home, target_km, bounds)
}

// ── Planner state ─────────────────────────────────────────────────────────────

struct Planner<'g> {
    graph: &'g StreetGraph,
    cache: DijkstraCache,

    target_km: f64,
    hard_max_km: f64,

    current: NodeId,
    distance_km: f64,
    points: Vec<LatLng>,

    /// Street ids walked, first-traversal order (street id = segment id).
    street_ids: Vec<String>,
    street_names: Vec<String>,
    name_seen: FxHashSet<String>,

    /// Per-edge flags, indexed by `EdgeId`.
    edge_covered: Vec<bool>,
    rewarded: Vec<bool>,
    traversals: Vec<u32>,
    rewards_earned: usize,

    /// Per-node visited flags, indexed by `NodeId`.
    node_visited: Vec<bool>,
}

struct GlobalMove {
    connector: Vec<EdgeId>,
    target: TraversalStep,
    score: f64,
}

impl<'g> Planner<'g> {
    fn new(graph: &'g StreetGraph, start: NodeId, target_km: f64) -> Self {
        let mut node_visited = vec![false; graph.node_count()];
        node_visited[start.index()] = true;
        Self {
            graph,
            cache: DijkstraCache::new(),
            target_km,
            hard_max_km: (target_km * 1.1 + 0.35).max(1.2),
            current: start,
            distance_km: 0.0,
            points: Vec::new(),
            street_ids: Vec::new(),
            street_names: Vec::new(),
            name_seen: FxHashSet::default(),
            edge_covered: vec![false; graph.edge_count()],
            rewarded: vec![false; graph.edge_count()],
            traversals: vec![0; graph.edge_count()],
            rewards_earned: 0,
            node_visited,
        }
    }

    // ── Main loop ─────────────────────────────────────────────────────────

    fn run(&mut self) {
        let max_iterations = ((self.target_km * 95.0).round() as usize).max(140);

        for iteration in 0..max_iterations {
            if self.distance_km >= self.hard_max_km {
                break;
            }
            if self.distance_km >= self.target_km * 1.03 && self.rewards_earned > 0 {
                break;
            }

            self.spur_sweep(SPURS_AT_ITERATION, 0.0);
            self.branch_sweep(BRANCH_STEPS_AT_ITERATION);

            match self.find_global_move() {
                Some(mv) => {
                    log::trace!(
                        "iteration {iteration}: global move score {:.2} at {:.2} km",
                        mv.score,
                        self.distance_km
                    );
                    if !self.apply_global_move(mv) {
                        break;
                    }
                }
                None => {
                    if !self.local_extension() {
                        break;
                    }
                }
            }
        }
    }

    // ── Budget terms ──────────────────────────────────────────────────────

    /// Budget fit for spur and branch candidates, peaking when the
    /// projected total distance lands on target.
    fn spur_budget_fit(&self, projected_km: f64) -> f64 {
        let miss = (self.target_km - projected_km).abs() / (self.target_km * 0.55).max(0.85);
        1.0 - miss.min(1.5)
    }

    /// Budget fit for global moves, comparing the move's added distance to
    /// the remaining budget.
    fn move_budget_fit(&self, additional_km: f64) -> f64 {
        let remaining = self.target_km - self.distance_km;
        let miss = (remaining - additional_km).abs() / (self.target_km * 0.5).max(0.7);
        1.0 - miss.min(1.4)
    }

    // ── Step application ──────────────────────────────────────────────────

    /// Walk one oriented edge: append its polyline (merging the shared
    /// joint point when within 18 m), advance the distance, and update all
    /// coverage state.
    fn apply_step(&mut self, step: TraversalStep) {
        let edge = self.graph.edge(step.edge);

        let mut pts = edge.path.clone();
        if edge.from != step.from {
            pts.reverse();
        }
        let skip_first = match self.points.last() {
            Some(&last) => haversine_km(last, pts[0]) * 1000.0 <= SEAMLESS_JOIN_M,
            None => false,
        };
        self.points.extend(pts.into_iter().skip(usize::from(skip_first)));

        let e = step.edge.index();
        self.distance_km += edge.distance_km;
        self.traversals[e] += 1;

        if !self.edge_covered[e] {
            self.edge_covered[e] = true;
            self.street_ids.push(edge.segment_id.clone());
            if self.name_seen.insert(edge.street_name.clone()) {
                self.street_names.push(edge.street_name.clone());
            }
        }
        if !edge.completed && !self.rewarded[e] {
            self.rewarded[e] = true;
            self.rewards_earned += 1;
        }

        self.node_visited[step.from.index()] = true;
        self.node_visited[step.to.index()] = true;
        self.current = step.to;
    }

    // ── Dead-end spur sweep ───────────────────────────────────────────────

    /// Execute up to `max_spurs` best-scoring out-and-back spurs from the
    /// current node. `reserved_km` is distance still owed to an in-flight
    /// connector and counts against the hard max.
    fn spur_sweep(&mut self, max_spurs: usize, reserved_km: f64) {
        for _ in 0..max_spurs {
            if !self.take_best_spur(reserved_km) {
                break;
            }
        }
    }

    fn take_best_spur(&mut self, reserved_km: f64) -> bool {
        let graph = self.graph;
        let mut best: Option<(f64, Vec<TraversalStep>)> = None;

        for (first_edge, _) in graph.neighbors(self.current) {
            let Some(chain) = self.spur_chain(first_edge) else {
                continue;
            };
            let one_way: f64 = chain.iter().map(|s| graph.edge(s.edge).distance_km).sum();
            let round_trip = one_way * 2.0;
            let projected = self.distance_km + round_trip;
            if projected + reserved_km > self.hard_max_km || projected > self.target_km * 1.1 {
                continue;
            }

            // Chain edges are fresh by construction, so each is a new street.
            let new_streets = chain.len() as f64;
            let new_nodes = chain
                .iter()
                .filter(|s| !self.node_visited[s.to.index()])
                .count() as f64;

            let score = (new_streets * 4.6 + new_nodes * 2.5 + (one_way * 1.8).min(1.4))
                / (round_trip + 0.07)
                + self.spur_budget_fit(projected) * 1.1;

            if best.as_ref().is_none_or(|(s, _)| score > *s) {
                best = Some((score, chain));
            }
        }

        let Some((_, chain)) = best else {
            return false;
        };
        for step in &chain {
            self.apply_step(*step);
        }
        for step in chain.iter().rev() {
            self.apply_step(step.reversed());
        }
        true
    }

    /// Walk the forward chain out of `first_edge`: follow each degree-2
    /// node's only other edge, stopping at junctions, at completed or
    /// already-rewarded edges, or after 12 steps. Valid only when the
    /// terminal node is a true cul-de-sac (degree 1).
    fn spur_chain(&self, first_edge: EdgeId) -> Option<Vec<TraversalStep>> {
        let graph = self.graph;
        let mut steps = Vec::new();
        let mut node = self.current;
        let mut edge_id = first_edge;

        for _ in 0..SPUR_CHAIN_MAX_STEPS {
            let edge = graph.edge(edge_id);
            if edge.completed || self.rewarded[edge_id.index()] {
                break;
            }
            let next = edge.other(node);
            steps.push(TraversalStep {
                edge: edge_id,
                from: node,
                to: next,
            });
            node = next;
            if graph.degree(node) != 2 {
                break;
            }
            let Some(&other) = graph.node(node).edges.iter().find(|&&e| e != edge_id) else {
                break;
            };
            edge_id = other;
        }

        if !steps.is_empty() && graph.degree(node) == 1 {
            Some(steps)
        } else {
            None
        }
    }

    // ── Immediate branch sweep ────────────────────────────────────────────

    /// Take up to `max_steps` single-edge steps into quiet neighbors,
    /// re-running a short spur sweep after each.
    fn branch_sweep(&mut self, max_steps: usize) {
        for _ in 0..max_steps {
            if !self.take_best_branch_step() {
                break;
            }
            self.spur_sweep(SPURS_AFTER_BRANCH, 0.0);
        }
    }

    fn take_best_branch_step(&mut self) -> bool {
        let graph = self.graph;
        let mut best: Option<(f64, TraversalStep)> = None;

        for (edge_id, neighbor) in graph.neighbors(self.current) {
            let edge = graph.edge(edge_id);
            let e = edge_id.index();
            if edge.completed || self.rewarded[e] || self.traversals[e] > 0 {
                continue;
            }
            if graph.degree(neighbor) > 2 {
                continue;
            }
            let projected = self.distance_km + edge.distance_km;
            if projected > self.hard_max_km {
                continue;
            }

            let culdesac = if graph.degree(neighbor) == 1 { 4.0 } else { 2.25 };
            let branch_exit = if graph.degree(self.current) >= 3 { 1.45 } else { 0.35 };
            let short_edge = (0.95 - edge.distance_km).max(0.0) * 1.25;
            let new_node = if self.node_visited[neighbor.index()] { 0.0 } else { 1.2 };
            let score =
                culdesac + branch_exit + short_edge + new_node + self.spur_budget_fit(projected);

            if best.as_ref().is_none_or(|(s, _)| score > *s) {
                best = Some((
                    score,
                    TraversalStep {
                        edge: edge_id,
                        from: self.current,
                        to: neighbor,
                    },
                ));
            }
        }

        match best {
            Some((_, step)) => {
                self.apply_step(step);
                true
            }
            None => false,
        }
    }

    /// Branch-eligible edges at the current node; used to penalize global
    /// moves that would ride away past unfinished side streets.
    fn pending_branch_edges(&self) -> Vec<EdgeId> {
        self.graph
            .neighbors(self.current)
            .filter(|&(edge_id, neighbor)| {
                let edge = self.graph.edge(edge_id);
                let e = edge_id.index();
                !edge.completed
                    && !self.rewarded[e]
                    && self.traversals[e] == 0
                    && self.graph.degree(neighbor) <= 2
            })
            .map(|(edge_id, _)| edge_id)
            .collect()
    }

    // ── Global coverage move ──────────────────────────────────────────────

    fn find_global_move(&mut self) -> Option<GlobalMove> {
        if self.distance_km >= self.hard_max_km {
            return None;
        }
        let graph = self.graph;
        let result = self.cache.shortest(graph, self.current);
        let pending = self.pending_branch_edges();
        let below_95 = self.distance_km < self.target_km * 0.95;

        let mut best: Option<GlobalMove> = None;

        for (edge_id, edge) in graph.edges() {
            if edge.completed || self.rewarded[edge_id.index()] {
                continue;
            }

            let d_from = result.dist[edge.from.index()];
            let d_to = result.dist[edge.to.index()];
            let (connector_node, connector_km) = if d_from <= d_to {
                (edge.from, d_from)
            } else {
                (edge.to, d_to)
            };
            if !connector_km.is_finite() {
                continue; // isolated cluster
            }

            let additional = connector_km + edge.distance_km;
            let projected = self.distance_km + additional;
            if projected > self.hard_max_km {
                continue;
            }

            let connector = result.reconstruct_edges(self.current, connector_node);
            let target_to = edge.other(connector_node);

            // Gains and repeat costs along connector + target edge.
            let mut gained_edges: Vec<EdgeId> = vec![edge_id];
            let mut gained_nodes: Vec<NodeId> = Vec::new();
            let mut repeat_penalty = 0.0;
            let mut node = self.current;
            for &ce in &connector {
                let c = graph.edge(ce);
                if !c.completed && !self.rewarded[ce.index()] && !gained_edges.contains(&ce) {
                    gained_edges.push(ce);
                }
                repeat_penalty += c.distance_km * (self.traversals[ce.index()] as f64).min(2.4);
                node = c.other(node);
                if !self.node_visited[node.index()] && !gained_nodes.contains(&node) {
                    gained_nodes.push(node);
                }
            }
            if !self.node_visited[target_to.index()] && !gained_nodes.contains(&target_to) {
                gained_nodes.push(target_to);
            }
            let new_streets = gained_edges.len() as f64;
            let new_nodes = gained_nodes.len() as f64;

            let leaf = if graph.degree(edge.from) == 1 || graph.degree(edge.to) == 1 {
                1.75
            } else {
                0.0
            };
            let branch_tail = if graph.degree(edge.from) <= 2 || graph.degree(edge.to) <= 2 {
                0.35
            } else {
                0.0
            };
            let proximity = (1.35 - connector_km).max(0.0) * 0.7;
            let useful_distance = (edge.distance_km * 1.35).min(1.5);
            let overshoot = (projected - self.target_km * 1.08).max(0.0) * 1.9;

            let first_travel_edge = connector.first().copied().unwrap_or(edge_id);
            let skip_nearby_branch = if below_95
                && !pending.is_empty()
                && !pending.contains(&first_travel_edge)
            {
                (pending.len() as f64 * 1.18).min(3.6)
            } else {
                0.0
            };

            let score = (new_streets * 3.8
                + new_nodes * 2.0
                + leaf
                + branch_tail
                + proximity
                + useful_distance)
                / (additional + 0.08)
                + self.move_budget_fit(additional) * 1.45
                - overshoot
                - repeat_penalty * 2.1
                - skip_nearby_branch;

            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(GlobalMove {
                    connector,
                    target: TraversalStep {
                        edge: edge_id,
                        from: connector_node,
                        to: target_to,
                    },
                    score,
                });
            }
        }

        best
    }

    /// Walk the connector steps and then the target edge. Spur sweeps run
    /// after every step (with the unfinished remainder reserved against
    /// the hard max); the branch sweep runs only once the move is complete
    /// so the polyline stays continuous.
    fn apply_global_move(&mut self, mv: GlobalMove) -> bool {
        let graph = self.graph;
        let Some(mut steps) = orient_path_edges(graph, self.current, &mv.connector) else {
            log::warn!("global move connector failed to orient; stopping");
            return false;
        };
        steps.push(mv.target);

        let mut remaining: f64 = steps.iter().map(|s| graph.edge(s.edge).distance_km).sum();
        let last = steps.len() - 1;
        for (i, step) in steps.into_iter().enumerate() {
            remaining -= graph.edge(step.edge).distance_km;
            self.apply_step(step);
            self.spur_sweep(SPURS_AFTER_MOVE, remaining.max(0.0));
            if i == last {
                self.branch_sweep(BRANCH_STEPS_AFTER_MOVE);
            }
        }
        true
    }

    // ── Local extension ───────────────────────────────────────────────────

    /// Fallback single-neighbor step when no global move exists: favors new
    /// rewards, penalizes repeats, and only fires on a positive score, so a
    /// fully-rewarded neighborhood terminates the plan.
    fn local_extension(&mut self) -> bool {
        let graph = self.graph;
        let mut best: Option<(f64, TraversalStep)> = None;

        for (edge_id, neighbor) in graph.neighbors(self.current) {
            let edge = graph.edge(edge_id);
            let e = edge_id.index();
            let projected = self.distance_km + edge.distance_km;
            if projected > self.hard_max_km {
                continue;
            }

            let new_street = if !edge.completed && !self.rewarded[e] { 1.0 } else { 0.0 };
            let new_node = if self.node_visited[neighbor.index()] { 0.0 } else { 1.0 };
            let repeats = self.traversals[e] as f64;
            let score = new_street * 2.2 + new_node * 1.1 + self.spur_budget_fit(projected) * 0.8
                - repeats * 1.6
                - edge.distance_km * 0.4;

            if score > 0.0 && best.as_ref().is_none_or(|(s, _)| score > *s) {
                best = Some((
                    score,
                    TraversalStep {
                        edge: edge_id,
                        from: self.current,
                        to: neighbor,
                    },
                ));
            }
        }

        match best {
            Some((_, step)) => {
                self.apply_step(step);
                true
            }
            None => false,
        }
    }

    // ── Route assembly ────────────────────────────────────────────────────

    fn into_route(self) -> PlanResult<SuggestedRoute> {
        if self.street_ids.is_empty() || self.points.len() < 2 {
            return Err(PlanError::Infeasible("planner traversed no edges"));
        }

        let coverage = node_coverage(self.graph, &self.points);
        log::info!(
            "planned {:.2} km over {} streets, {} / {} nodes covered",
            self.distance_km,
            self.street_ids.len(),
            coverage.covered_ids.len(),
            coverage.available.len()
        );

        Ok(SuggestedRoute {
            id: format!("route-{}", chrono::Utc::now().timestamp()),
            name: format!("Coverage run ({:.1} km)", self.distance_km),
            points: self.points,
            street_ids: self.street_ids,
            street_names: self.street_names,
            distance_km: self.distance_km,
            strategy: "efficient-coverage".to_string(),
            node_ids_covered: coverage.covered_ids,
            node_points: coverage.covered_points,
            available_nodes: coverage.available,
        })
    }
}
