//! Test-only utilities for `tsp-solver-routing`.
//!
//! The helpers in this module are available to unit tests and behavioural
//! tests. They are gated behind the `test-support` feature (and `cfg(test)`).

use tsp_solver_core::test_support::line_of_locations;
use tsp_solver_core::{VrpRequest, VrptwRequest};

/// A `VRP` payload over `locations` placeholder locations.
///
/// Pair it with a fixed matrix provider so the costs come from the test.
///
/// # Examples
/// ```rust
/// use tsp_solver_routing::test_support::vrp_request;
///
/// let request = vrp_request("r-1", 4, 0, 1, 100, 1);
/// assert_eq!(request.locations.len(), 4);
/// assert!(request.parameters().is_ok());
/// ```
#[must_use]
pub fn vrp_request(
    id: &str,
    locations: usize,
    depot: i64,
    num_vehicles: i64,
    max_distance: i64,
    cost_coefficient: i64,
) -> VrpRequest {
    VrpRequest {
        id: id.to_owned(),
        locations: line_of_locations(locations),
        depot,
        num_vehicles,
        max_distance,
        cost_coefficient,
    }
}

/// A `VRPTW` payload with one placeholder location per window.
#[must_use]
pub fn vrptw_request(
    id: &str,
    time_windows: Vec<[i64; 2]>,
    depot: i64,
    num_vehicles: i64,
    wait_time: i64,
    max_time_vehicle: i64,
) -> VrptwRequest {
    VrptwRequest {
        id: id.to_owned(),
        locations: line_of_locations(time_windows.len()),
        depot,
        num_vehicles,
        time_windows,
        wait_time,
        max_time_vehicle,
    }
}
