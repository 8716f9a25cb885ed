//! Planner error type.

use thiserror::Error;

/// Errors produced by route planning. The planner never retries: it either
/// returns a route or reports why none is possible.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("route planning infeasible: {0}")]
    Infeasible(&'static str),
}

pub type PlanResult<T> = Result<T, PlanError>;
