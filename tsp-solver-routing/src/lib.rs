//! Routing engine for the tsp-solver service.
//!
//! A [`RoutingModel`] holds a cost matrix, a depot and a fleet. Named
//! [`Dimension`]s accumulate a quantity along each route (distance, time)
//! under capacities, per-location ranges and bounded slack. The search builds
//! routes with a deterministic cheapest-insertion heuristic and refines them
//! with bounded local search; [`extract`] reports the result.
//!
//! [`solve_vrp`] and [`solve_vrptw`] wire the common problem shapes onto the
//! model, and [`RoutingSolver`] implements [`Solver`](tsp_solver_core::Solver)
//! for the service. Everything here is synchronous and request-scoped; the
//! crate performs no I/O.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod assignment;
mod dimension;
mod evaluate;
mod extract;
mod model;
mod schedule;
pub mod search;
mod solver;
mod vrp;
mod vrptw;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use assignment::Assignment;
pub use dimension::{Dimension, DimensionHandle, TransitCost, TransitFn};
pub use extract::extract;
pub use model::RoutingModel;
pub use search::{FirstSolutionStrategy, SearchParameters, UnknownStrategy};
pub use solver::RoutingSolver;
pub use vrp::{DISTANCE_DIMENSION, VrpProblem, solve_vrp};
pub use vrptw::{TIME_DIMENSION, VrptwProblem, solve_vrptw};
