//! VRP with time windows: travel times, bounded waiting and per-location
//! arrival windows.

use std::sync::Arc;

use log::debug;
use tsp_solver_core::{
    Cancellation, CostMatrix, MatrixKind, SolveError, ValidationError, VrptwParameters,
    VrptwRoute, VrptwSolution,
};

use crate::search::{self, SearchParameters};
use crate::{RoutingModel, TransitCost, extract};

/// Name of the dimension accumulating elapsed time.
pub const TIME_DIMENSION: &str = "Time";

/// A validated VRPTW instance.
#[derive(Debug, Clone)]
pub struct VrptwProblem {
    matrix: Arc<CostMatrix>,
    parameters: VrptwParameters,
}

impl VrptwProblem {
    /// Pair a travel-time matrix with validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TimeWindowCount`] unless there is exactly one
    /// window per location.
    pub fn new(
        matrix: impl Into<Arc<CostMatrix>>,
        parameters: VrptwParameters,
    ) -> Result<Self, ValidationError> {
        let matrix = matrix.into();
        if parameters.time_windows.len() != matrix.len() {
            return Err(ValidationError::TimeWindowCount {
                expected: matrix.len(),
                found: parameters.time_windows.len(),
            });
        }
        Ok(Self { matrix, parameters })
    }

    /// Validate raw signed inputs: the matrix, then the scalars, then the
    /// windows.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn from_signed_rows(
        rows: &[Vec<i64>],
        depot: i64,
        num_vehicles: i64,
        time_windows: &[[i64; 2]],
        wait_time: i64,
        max_time_vehicle: i64,
    ) -> Result<Self, ValidationError> {
        let matrix = CostMatrix::from_signed_rows(rows, MatrixKind::Time)?;
        let parameters = VrptwParameters::new(
            depot,
            num_vehicles,
            time_windows,
            wait_time,
            max_time_vehicle,
        )?;
        Self::new(matrix, parameters)
    }

    /// Travel-time matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Arc<CostMatrix> {
        &self.matrix
    }

    /// Validated parameters.
    #[must_use]
    pub const fn parameters(&self) -> &VrptwParameters {
        &self.parameters
    }

    /// Routing model with the time dimension and every window registered.
    ///
    /// Vehicles leave the depot within the depot's own window.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DepotOutOfRange`] when the depot is not a
    /// matrix index.
    pub fn model(&self) -> Result<RoutingModel, ValidationError> {
        let params = &self.parameters;
        let depot = params.depot;
        let mut model =
            RoutingModel::build(Arc::clone(&self.matrix), depot, params.num_vehicles)?;
        let transit: Arc<dyn TransitCost> = Arc::<CostMatrix>::clone(&self.matrix);
        let time = model.add_dimension(
            TIME_DIMENSION,
            transit,
            params.wait_time,
            params.max_time_vehicle,
            false,
        )?;
        let dimension = model.dimension_mut(time);
        for (node, window) in params.time_windows.iter().enumerate() {
            if node != depot {
                dimension.set_node_range(node, window.earliest(), window.latest())?;
            }
        }
        if let Some(window) = params.time_windows.get(depot) {
            for vehicle in 0..params.num_vehicles {
                dimension.set_vehicle_start_range(vehicle, window.earliest(), window.latest())?;
            }
        }
        Ok(model)
    }
}

/// Solve `problem` and report each vehicle's route with its arrival ranges.
///
/// # Errors
///
/// Returns [`SolveError::Validation`] for an out-of-range depot,
/// [`SolveError::NoFeasibleSolution`] when some window cannot be met, and
/// [`SolveError::Cancelled`] once `cancellation` fires.
///
/// # Examples
///
/// ```
/// use tsp_solver_core::{Cancellation, CumulRange};
/// use tsp_solver_routing::{SearchParameters, VrptwProblem, solve_vrptw};
///
/// let rows = vec![vec![0, 4], vec![4, 0]];
/// let problem = VrptwProblem::from_signed_rows(&rows, 0, 1, &[[0, 20], [6, 9]], 5, 20).unwrap();
/// let solution =
///     solve_vrptw(&problem, &SearchParameters::default(), &Cancellation::new()).unwrap();
/// let route = &solution.routes[0];
/// assert_eq!(route.route, vec![0, 1, 0]);
/// assert_eq!(route.time_windows[1], CumulRange::point(6));
/// assert_eq!(solution.total_time, 10);
/// ```
pub fn solve_vrptw(
    problem: &VrptwProblem,
    parameters: &SearchParameters,
    cancellation: &Cancellation,
) -> Result<VrptwSolution, SolveError> {
    let model = problem.model()?;
    let assignment = search::solve(&model, parameters, cancellation)?;
    let solution = extract(&model, &assignment)?;
    let routes: Vec<VrptwRoute> = solution
        .routes
        .into_iter()
        .map(|mut report| {
            let trace = report
                .dimensions
                .iter()
                .position(|trace| trace.name == TIME_DIMENSION)
                .map(|index| report.dimensions.swap_remove(index));
            let (time_windows, route_time) =
                trace.map_or_else(|| (Vec::new(), 0), |trace| (trace.cumuls, trace.total));
            VrptwRoute {
                route: report.nodes,
                time_windows,
                vehicle: report.vehicle,
                route_time,
            }
        })
        .collect();
    let total_time = routes
        .iter()
        .map(|route| route.route_time)
        .fold(0, u64::saturating_add);
    debug!(
        "VRPTW solved: {} routes, total time {total_time}, objective {}",
        routes.len(),
        solution.objective
    );
    Ok(VrptwSolution { routes, total_time })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tsp_solver_core::CumulRange;

    #[fixture]
    fn rows() -> Vec<Vec<i64>> {
        vec![
            vec![0, 3, 5, 7],
            vec![3, 0, 4, 6],
            vec![5, 4, 0, 3],
            vec![7, 6, 3, 0],
        ]
    }

    const WINDOWS: [[i64; 2]; 4] = [[0, 30], [5, 10], [0, 20], [15, 25]];

    #[rstest]
    fn earliest_schedule_meets_every_window(rows: Vec<Vec<i64>>) {
        let problem =
            VrptwProblem::from_signed_rows(&rows, 0, 1, &WINDOWS, 10, 40).expect("valid problem");
        let solution = solve_vrptw(&problem, &SearchParameters::default(), &Cancellation::new())
            .expect("feasible");
        let route = solution.routes.first().expect("vehicle 0");
        assert_eq!(route.route, vec![0, 1, 2, 3, 0]);
        assert_eq!(
            route.time_windows,
            vec![
                CumulRange::point(0),
                CumulRange::new(5, 8).expect("range"),
                CumulRange::new(9, 12).expect("range"),
                CumulRange::point(15),
                CumulRange::point(22),
            ]
        );
        assert_eq!(route.route_time, 22);
        assert_eq!(solution.total_time, 22);
    }

    #[rstest]
    fn window_count_must_match_locations(rows: Vec<Vec<i64>>) {
        let err = VrptwProblem::from_signed_rows(&rows, 0, 1, &[[0, 30], [5, 10]], 10, 40)
            .expect_err("two windows for four locations");
        assert_eq!(
            err,
            ValidationError::TimeWindowCount {
                expected: 4,
                found: 2
            }
        );
    }

    #[rstest]
    #[case(-1, 1, 10, 40, ValidationError::NegativeDepot)]
    #[case(0, -2, 10, 40, ValidationError::NegativeVehicleCount)]
    #[case(0, 1, -1, 40, ValidationError::NegativeWaitTime)]
    #[case(0, 1, 10, -1, ValidationError::NegativeMaxTime)]
    fn rejects_negative_scalars(
        rows: Vec<Vec<i64>>,
        #[case] depot: i64,
        #[case] vehicles: i64,
        #[case] wait: i64,
        #[case] max_time: i64,
        #[case] expected: ValidationError,
    ) {
        let err = VrptwProblem::from_signed_rows(&rows, depot, vehicles, &WINDOWS, wait, max_time)
            .expect_err("invalid scalar");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn unreachable_window_is_infeasible() {
        let rows = vec![vec![0, 5, 5], vec![5, 0, 5], vec![5, 5, 0]];
        let problem =
            VrptwProblem::from_signed_rows(&rows, 0, 1, &[[0, 100], [0, 0], [0, 100]], 10, 100)
                .expect("valid problem");
        let err = solve_vrptw(&problem, &SearchParameters::default(), &Cancellation::new())
            .expect_err("location 1 closes at 0");
        assert_eq!(err, SolveError::NoFeasibleSolution { unrouted: 1 });
    }

    #[rstest]
    fn depot_window_bounds_every_vehicle_start(rows: Vec<Vec<i64>>) {
        let problem =
            VrptwProblem::from_signed_rows(&rows, 0, 2, &WINDOWS, 10, 40).expect("valid problem");
        let model = problem.model().expect("model");
        let dimension = model.dimension_by_name(TIME_DIMENSION).expect("time");
        for vehicle in 0..2 {
            assert_eq!(
                dimension.vehicle_start_range(vehicle),
                Some(CumulRange::new(0, 30).expect("range"))
            );
        }
        assert_eq!(dimension.node_range(0), None);
        assert_eq!(
            dimension.node_range(3),
            Some(CumulRange::new(15, 25).expect("range"))
        );
    }
}
