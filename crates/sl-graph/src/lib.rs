//! `sl-graph` — street multigraph, shortest paths, and Eulerization.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`graph`]    | `StreetGraph` (interned multigraph + R-tree snap),        |
//! |              | `StreetGraphBuilder`                                      |
//! | [`dijkstra`] | `DijkstraCache`, `DijkstraResult`, path reconstruction,   |
//! |              | `orient_path_edges`                                       |
//! | [`euler`]    | odd-degree pairing + Hierholzer trail (secondary path)    |
//!
//! Graph queries are infallible and return `Option` for absent nodes; the
//! error taxonomy lives with the planner and ingest crates.

pub mod dijkstra;
pub mod euler;
pub mod graph;


pub use dijkstra::{orient_path_edges, DijkstraCache, DijkstraResult, ShortestPath, TraversalStep};
pub use euler::{eulerian_trail, eulerize};
pub use graph::{GraphEdge, GraphNode, StreetGraph, StreetGraphBuilder};
