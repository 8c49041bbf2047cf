//! Facade crate for the tsp-solver routing engine.
//!
//! This crate re-exports the core request and solution types together with
//! the routing solver. The request dispatcher and its matrix provider sit
//! behind the `service` feature.

#![forbid(unsafe_code)]

pub use tsp_solver_core::{
    Cancellation, CostMatrix, CostMatrixProvider, CumulRange, Location, MatrixError, MatrixKind,
    ProblemKind, ProblemSolution, SolveError, SolveRequest, Solver, TimeWindow, ValidationError,
    VrpRequest, VrpRoute, VrpSolution, VrptwRequest, VrptwRoute, VrptwSolution,
};
pub use tsp_solver_routing::{
    FirstSolutionStrategy, RoutingModel, RoutingSolver, SearchParameters, solve_vrp, solve_vrptw,
};

#[cfg(feature = "service")]
pub use tsp_solver_service::{Dispatcher, EuclideanMatrixProvider, ResponseEnvelope};
