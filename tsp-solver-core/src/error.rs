//! Error types shared by every solve.
//!
//! Validation failures carry the precondition they violate so callers can
//! surface the message verbatim. Solve-time failures are kept distinct so the
//! service can tell a malformed request from one that simply has no solution.

use thiserror::Error;

use crate::matrix::{MatrixError, MatrixKind};

/// A request or model precondition was violated before any search began.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The matrix has no rows.
    #[error("The {matrix} matrix must contain at least one location.")]
    EmptyMatrix {
        /// Which matrix was rejected.
        matrix: MatrixKind,
    },
    /// At least one row length differs from the row count.
    #[error("The {matrix} matrix does not have equal rows and columns.")]
    NotSquare {
        /// Which matrix was rejected.
        matrix: MatrixKind,
    },
    /// A matrix entry was negative.
    #[error("The {matrix} matrix entry from {from} to {to} must not be negative.")]
    NegativeCost {
        /// Which matrix was rejected.
        matrix: MatrixKind,
        /// Row of the offending entry.
        from: usize,
        /// Column of the offending entry.
        to: usize,
    },
    /// The depot index was negative.
    #[error("depot should be greater than or equal to zero.")]
    NegativeDepot,
    /// The depot index does not name a location.
    #[error("depot {depot} is out of range for {node_count} locations.")]
    DepotOutOfRange {
        /// Requested depot.
        depot: usize,
        /// Number of locations in the model.
        node_count: usize,
    },
    /// The vehicle count was negative.
    #[error("Number of vehicles should be greater than or equal to zero.")]
    NegativeVehicleCount,
    /// The per-vehicle distance budget was negative.
    #[error("Max distance should be greater than or equal to zero.")]
    NegativeMaxDistance,
    /// The span cost coefficient was negative.
    #[error("Cost coefficient should be greater than or equal to zero.")]
    NegativeCostCoefficient,
    /// The allowed waiting time was negative.
    #[error("Wait time should be greater than or equal to zero.")]
    NegativeWaitTime,
    /// The per-vehicle time budget was negative.
    #[error("Maximum time per vehicle should be greater than or equal to zero.")]
    NegativeMaxTime,
    /// The time window list is not parallel to the locations.
    #[error("Expected {expected} time windows, one per location, but found {found}.")]
    TimeWindowCount {
        /// Number of locations.
        expected: usize,
        /// Number of windows supplied.
        found: usize,
    },
    /// A time window was negative or inverted.
    #[error("Time window [{earliest}, {latest}] for location {node} is invalid.")]
    InvalidTimeWindow {
        /// Location the window belongs to.
        node: usize,
        /// Earliest permitted arrival.
        earliest: i64,
        /// Latest permitted arrival.
        latest: i64,
    },
    /// A cumulative range had `min > max`.
    #[error("range [{min}, {max}] has its minimum above its maximum.")]
    InvertedRange {
        /// Lower bound supplied.
        min: u64,
        /// Upper bound supplied.
        max: u64,
    },
    /// A node index does not exist in the model.
    #[error("node {node} is out of range for {node_count} locations.")]
    NodeOutOfRange {
        /// Offending node.
        node: usize,
        /// Number of locations in the model.
        node_count: usize,
    },
    /// A vehicle index does not exist in the model.
    #[error("vehicle {vehicle} is out of range for a fleet of {num_vehicles}.")]
    VehicleOutOfRange {
        /// Offending vehicle.
        vehicle: usize,
        /// Fleet size.
        num_vehicles: usize,
    },
    /// Per-node ranges cannot target the depot; use a vehicle start range.
    #[error("node ranges cannot be set on the depot; constrain vehicle starts instead.")]
    DepotNodeRange,
    /// Two dimensions share a name.
    #[error("a dimension named {name:?} is already registered.")]
    DuplicateDimension {
        /// Name that was reused.
        name: String,
    },
    /// A route does not start and end at the depot, or repeats a location.
    #[error("route for vehicle {vehicle} must run depot to depot and visit each location once.")]
    MalformedRoute {
        /// Vehicle owning the route.
        vehicle: usize,
    },
    /// A route breaks a capacity, node range or slack bound.
    #[error("route for vehicle {vehicle} violates the {dimension:?} dimension.")]
    InfeasibleRoute {
        /// Vehicle owning the route.
        vehicle: usize,
        /// Dimension that cannot be scheduled.
        dimension: String,
    },
    /// A transit matrix does not cover the model's locations.
    #[error("dimension {name:?} transit covers {found} locations but the model has {expected}.")]
    DimensionSize {
        /// Dimension being registered.
        name: String,
        /// Number of locations in the model.
        expected: usize,
        /// Number of locations the transit covers.
        found: usize,
    },
}

/// Errors returned by a solve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// Input was malformed; no search was attempted.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The cost matrix could not be produced.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    /// Construction ran out of feasible insertions.
    #[error("Could not find an optimal route: {unrouted} location(s) could not be routed.")]
    NoFeasibleSolution {
        /// Locations left without a route.
        unrouted: usize,
    },
    /// The solve was interrupted by a cancellation flag or deadline.
    #[error("the solve was cancelled before it completed")]
    Cancelled,
}
