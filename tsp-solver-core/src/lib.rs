//! Core domain types for the tsp-solver routing engine.
//!
//! This crate holds what every other crate agrees on: the cost matrix and the
//! provider seam that builds one, validated request parameters, solution
//! shapes, cancellation, and the error types. It performs no search and no
//! I/O.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cancel;
pub mod error;
mod location;
pub mod matrix;
mod parameters;
mod range;
pub mod request;
pub mod solution;
mod solver;
mod time_window;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use cancel::Cancellation;
pub use error::{SolveError, ValidationError};
pub use location::Location;
pub use matrix::{CostMatrix, CostMatrixProvider, MatrixError, MatrixKind};
pub use parameters::{VrpParameters, VrptwParameters};
pub use range::CumulRange;
pub use request::{ProblemKind, SolveRequest, VrpRequest, VrptwRequest};
pub use solution::{
    DimensionTrace, ProblemSolution, RouteReport, Solution, VrpRoute, VrpSolution, VrptwRoute,
    VrptwSolution,
};
pub use solver::Solver;
pub use time_window::TimeWindow;
