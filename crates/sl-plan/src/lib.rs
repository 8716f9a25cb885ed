//! `sl-plan` — the coverage-route planner.
//!
//! Given a street dataset, a home location, and a target distance, produce
//! one continuous route that maximizes newly-covered streets and
//! intersection nodes within the budget.
//!
//! # Crate layout
//!
//! | Module         | Contents                                            |
//! |----------------|-----------------------------------------------------|
//! | [`candidates`] | target-scaled candidate selection around home       |
//! | [`planner`]    | the greedy tour builder and its scoring             |
//! | [`route`]      | `SuggestedRoute`, node-coverage accounting          |
//! | [`error`]      | `PlanError`, `PlanResult<T>`                        |
//!
//! Planning is synchronous, single-threaded, and deterministic for a given
//! `(streets, home, target_km, bounds)` input.

pub mod candidates;
pub mod error;
pub mod planner;
pub mod route;

#[cfg(test)]
mod tests;

pub use error::{PlanError, PlanResult};
pub use planner::{build_efficient_coverage_route, build_eulerian_route};
pub use route::{node_coverage, NodeCoverage, SuggestedRoute, NODE_CAPTURE_RADIUS_METERS};
