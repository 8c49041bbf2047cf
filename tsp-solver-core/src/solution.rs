//! Solved routes, in generic and per-problem shapes.
//!
//! [`Solution`] is what the routing engine extracts: every vehicle's route with
//! the finalised range of every dimension at every stop. [`VrpSolution`] and
//! [`VrptwSolution`] are the reduced shapes returned to callers.

use crate::CumulRange;

/// Values of one dimension along one route.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionTrace {
    /// Dimension name, e.g. `"Distance"` or `"Time"`.
    pub name: String,
    /// Range of the cumul at each stop, parallel to the route's nodes.
    pub cumuls: Vec<CumulRange>,
    /// Minimised cumul at the route end.
    pub total: u64,
}

/// One vehicle's route.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteReport {
    /// Vehicle index.
    pub vehicle: usize,
    /// Visited nodes, starting and ending at the depot.
    pub nodes: Vec<usize>,
    /// Sum of arc costs along the route.
    pub cost: u64,
    /// One trace per registered dimension, in registration order.
    pub dimensions: Vec<DimensionTrace>,
}

impl RouteReport {
    /// Trace of the dimension called `name`, if registered.
    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&DimensionTrace> {
        self.dimensions.iter().find(|trace| trace.name == name)
    }

    /// Whether the vehicle leaves the depot at all.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.nodes.len() > 2
    }
}

/// Routes for the whole fleet plus the objective they achieve.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// One route per vehicle, in vehicle order.
    pub routes: Vec<RouteReport>,
    /// Arc costs plus span penalties.
    pub objective: u64,
}

/// A VRP route as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VrpRoute {
    /// Visited nodes, starting and ending at the depot.
    pub route: Vec<usize>,
    /// Vehicle index.
    pub vehicle: usize,
    /// Distance travelled.
    pub distance: u64,
}

/// Answer to a `VRP` or `TSP` request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VrpSolution {
    /// One route per vehicle.
    pub routes: Vec<VrpRoute>,
    /// Longest single route.
    pub max_route_distance: u64,
}

/// A VRPTW route as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VrptwRoute {
    /// Visited nodes, starting and ending at the depot.
    pub route: Vec<usize>,
    /// Arrival range at each stop, parallel to `route`.
    pub time_windows: Vec<CumulRange>,
    /// Vehicle index.
    pub vehicle: usize,
    /// Earliest time the vehicle can be back at the depot.
    pub route_time: u64,
}

/// Answer to a `VRPTW` request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VrptwSolution {
    /// One route per vehicle.
    pub routes: Vec<VrptwRoute>,
    /// Sum of every route's `route_time`.
    pub total_time: u64,
}

/// Answer to any supported request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ProblemSolution {
    /// Answer to a `VRP` or `TSP` request.
    Vrp(VrpSolution),
    /// Answer to a `VRPTW` request.
    Vrptw(VrptwSolution),
}

impl From<VrpSolution> for ProblemSolution {
    fn from(solution: VrpSolution) -> Self {
        Self::Vrp(solution)
    }
}

impl From<VrptwSolution> for ProblemSolution {
    fn from(solution: VrptwSolution) -> Self {
        Self::Vrptw(solution)
    }
}
