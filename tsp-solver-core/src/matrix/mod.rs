//! Dense cost matrices and the seam that produces them.
//!
//! The routing engine only ever consumes a [`CostMatrix`]. Converting raw
//! locations into one is delegated to a [`CostMatrixProvider`] so the engine
//! stays free of geometry and I/O.

mod cost;
mod error;
mod provider;

pub use cost::{CostMatrix, MatrixKind};
pub use error::MatrixError;
pub use provider::CostMatrixProvider;
