//! Solve requests as they arrive at the service boundary.
//!
//! A request is a tagged variant keyed by `message_type`. `TSP` shares the
//! `VRP` payload; a TSP is a VRP with one vehicle.

use std::fmt;

use crate::{Location, ValidationError, VrpParameters, VrptwParameters};

/// Which routing problem a request poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ProblemKind {
    /// Capacitated vehicle routing.
    Vrp,
    /// Travelling salesman, solved as a VRP.
    Tsp,
    /// Vehicle routing with time windows.
    Vrptw,
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vrp => f.write_str("VRP"),
            Self::Tsp => f.write_str("TSP"),
            Self::Vrptw => f.write_str("VRPTW"),
        }
    }
}

/// Payload of a `VRP` or `TSP` request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VrpRequest {
    /// Caller-chosen correlation id, echoed in the response.
    pub id: String,
    /// Locations to visit, depot included.
    pub locations: Vec<Location>,
    /// Index of the depot within `locations`.
    pub depot: i64,
    /// Fleet size.
    pub num_vehicles: i64,
    /// Per-vehicle distance budget.
    pub max_distance: i64,
    /// Weight of the longest route in the objective.
    pub cost_coefficient: i64,
}

impl VrpRequest {
    /// Validate the scalar fields.
    ///
    /// # Errors
    ///
    /// See [`VrpParameters::new`].
    pub fn parameters(&self) -> Result<VrpParameters, ValidationError> {
        VrpParameters::new(
            self.depot,
            self.num_vehicles,
            self.max_distance,
            self.cost_coefficient,
        )
    }
}

/// Payload of a `VRPTW` request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VrptwRequest {
    /// Caller-chosen correlation id, echoed in the response.
    pub id: String,
    /// Locations to visit, depot included.
    pub locations: Vec<Location>,
    /// Index of the depot within `locations`.
    pub depot: i64,
    /// Fleet size.
    pub num_vehicles: i64,
    /// `[earliest, latest]` arrival per location, parallel to `locations`.
    pub time_windows: Vec<[i64; 2]>,
    /// Longest permitted wait at any stop.
    pub wait_time: i64,
    /// Per-vehicle time budget.
    pub max_time_vehicle: i64,
}

impl VrptwRequest {
    /// Validate the scalar fields and windows.
    ///
    /// # Errors
    ///
    /// See [`VrptwParameters::new`].
    pub fn parameters(&self) -> Result<VrptwParameters, ValidationError> {
        VrptwParameters::new(
            self.depot,
            self.num_vehicles,
            &self.time_windows,
            self.wait_time,
            self.max_time_vehicle,
        )
    }
}

/// A routing request of any supported kind.
///
/// # Examples
/// ```
/// # #[cfg(feature = "serde")]
/// # {
/// use tsp_solver_core::{ProblemKind, SolveRequest};
///
/// let json = r#"{
///     "message_type": "TSP",
///     "id": "r-1",
///     "locations": [{"latitude": 0.0, "longitude": 0.0}],
///     "depot": 0,
///     "num_vehicles": 1,
///     "max_distance": 100,
///     "cost_coefficient": 1
/// }"#;
/// let request: SolveRequest = serde_json::from_str(json).unwrap();
/// assert_eq!(request.kind(), ProblemKind::Tsp);
/// assert_eq!(request.id(), "r-1");
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "message_type"))]
pub enum SolveRequest {
    /// Capacitated vehicle routing.
    #[cfg_attr(feature = "serde", serde(rename = "VRP"))]
    Vrp(VrpRequest),
    /// Travelling salesman, answered like a VRP.
    #[cfg_attr(feature = "serde", serde(rename = "TSP"))]
    Tsp(VrpRequest),
    /// Vehicle routing with time windows.
    #[cfg_attr(feature = "serde", serde(rename = "VRPTW"))]
    Vrptw(VrptwRequest),
}

impl SolveRequest {
    /// Which problem the request poses.
    #[must_use]
    pub const fn kind(&self) -> ProblemKind {
        match self {
            Self::Vrp(_) => ProblemKind::Vrp,
            Self::Tsp(_) => ProblemKind::Tsp,
            Self::Vrptw(_) => ProblemKind::Vrptw,
        }
    }

    /// Correlation id of the request.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Vrp(request) | Self::Tsp(request) => &request.id,
            Self::Vrptw(request) => &request.id,
        }
    }

    /// Locations the request covers, depot included.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        match self {
            Self::Vrp(request) | Self::Tsp(request) => &request.locations,
            Self::Vrptw(request) => &request.locations,
        }
    }
}
