//! Validated solve parameters.
//!
//! Requests arrive with signed integers. These types check every sign
//! precondition, in the order the service has always reported them, and
//! hand the routing engine unsigned values.

use crate::{TimeWindow, ValidationError};

fn non_negative(value: i64, error: ValidationError) -> Result<u64, ValidationError> {
    u64::try_from(value).map_err(|_| error)
}

fn index(value: i64, error: ValidationError) -> Result<usize, ValidationError> {
    usize::try_from(value).map_err(|_| error)
}

/// Parameters for a capacitated VRP or TSP solve.
///
/// # Examples
/// ```
/// use tsp_solver_core::{ValidationError, VrpParameters};
///
/// let params = VrpParameters::new(0, 2, 100, 1)?;
/// assert_eq!(params.num_vehicles, 2);
///
/// let err = VrpParameters::new(-1, 2, 100, 1).unwrap_err();
/// assert_eq!(err, ValidationError::NegativeDepot);
/// # Ok::<(), ValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrpParameters {
    /// Index of the start and end location.
    pub depot: usize,
    /// Fleet size.
    pub num_vehicles: usize,
    /// Per-vehicle distance budget.
    pub max_distance: u64,
    /// Weight of the longest route in the objective.
    pub cost_coefficient: u64,
}

impl VrpParameters {
    /// Validate signed request values.
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition: depot, vehicle count, distance
    /// budget, then cost coefficient.
    pub fn new(
        depot: i64,
        num_vehicles: i64,
        max_distance: i64,
        cost_coefficient: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            depot: index(depot, ValidationError::NegativeDepot)?,
            num_vehicles: index(num_vehicles, ValidationError::NegativeVehicleCount)?,
            max_distance: non_negative(max_distance, ValidationError::NegativeMaxDistance)?,
            cost_coefficient: non_negative(
                cost_coefficient,
                ValidationError::NegativeCostCoefficient,
            )?,
        })
    }
}

/// Parameters for a VRP with time windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrptwParameters {
    /// Index of the start and end location.
    pub depot: usize,
    /// Fleet size.
    pub num_vehicles: usize,
    /// One window per location, parallel to the locations.
    pub time_windows: Vec<TimeWindow>,
    /// Longest permitted wait at any stop.
    pub wait_time: u64,
    /// Per-vehicle time budget.
    pub max_time_vehicle: u64,
}

impl VrptwParameters {
    /// Validate signed request values.
    ///
    /// The window list is checked last so scalar mistakes are reported first.
    /// Its length is compared against the location count when the model is
    /// built.
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition: depot, vehicle count, wait
    /// time, time budget, then each window in location order.
    pub fn new(
        depot: i64,
        num_vehicles: i64,
        time_windows: &[[i64; 2]],
        wait_time: i64,
        max_time_vehicle: i64,
    ) -> Result<Self, ValidationError> {
        let depot = index(depot, ValidationError::NegativeDepot)?;
        let num_vehicles = index(num_vehicles, ValidationError::NegativeVehicleCount)?;
        let wait_time = non_negative(wait_time, ValidationError::NegativeWaitTime)?;
        let max_time_vehicle = non_negative(max_time_vehicle, ValidationError::NegativeMaxTime)?;
        let time_windows = time_windows
            .iter()
            .enumerate()
            .map(|(node, pair)| TimeWindow::from_pair(node, *pair))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            depot,
            num_vehicles,
            time_windows,
            wait_time,
            max_time_vehicle,
        })
    }
}
