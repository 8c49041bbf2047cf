//! Capacitated VRP: a distance budget per vehicle with an optional penalty on
//! the longest route.

use std::sync::Arc;

use log::debug;
use tsp_solver_core::{
    Cancellation, CostMatrix, MatrixKind, SolveError, ValidationError, VrpParameters, VrpRoute,
    VrpSolution,
};

use crate::search::{self, SearchParameters};
use crate::{RoutingModel, TransitCost, extract};

/// Name of the dimension accumulating travelled distance.
pub const DISTANCE_DIMENSION: &str = "Distance";

/// A validated VRP instance.
#[derive(Debug, Clone)]
pub struct VrpProblem {
    matrix: Arc<CostMatrix>,
    parameters: VrpParameters,
}

impl VrpProblem {
    /// Pair a distance matrix with validated parameters.
    #[must_use]
    pub fn new(matrix: impl Into<Arc<CostMatrix>>, parameters: VrpParameters) -> Self {
        Self {
            matrix: matrix.into(),
            parameters,
        }
    }

    /// Validate raw signed inputs: the matrix first, then the scalars in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsp_solver_core::ValidationError;
    /// use tsp_solver_routing::VrpProblem;
    ///
    /// let rows = vec![vec![0, 10], vec![10, 0]];
    /// let err = VrpProblem::from_signed_rows(&rows, -1, 1, 100, 1).unwrap_err();
    /// assert_eq!(err, ValidationError::NegativeDepot);
    /// ```
    pub fn from_signed_rows(
        rows: &[Vec<i64>],
        depot: i64,
        num_vehicles: i64,
        max_distance: i64,
        cost_coefficient: i64,
    ) -> Result<Self, ValidationError> {
        let matrix = CostMatrix::from_signed_rows(rows, MatrixKind::Distance)?;
        let parameters = VrpParameters::new(depot, num_vehicles, max_distance, cost_coefficient)?;
        Ok(Self::new(matrix, parameters))
    }

    /// Distance matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Arc<CostMatrix> {
        &self.matrix
    }

    /// Validated parameters.
    #[must_use]
    pub const fn parameters(&self) -> &VrpParameters {
        &self.parameters
    }

    /// Routing model with the distance dimension registered.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DepotOutOfRange`] when the depot is not a
    /// matrix index.
    pub fn model(&self) -> Result<RoutingModel, ValidationError> {
        let params = &self.parameters;
        let mut model = RoutingModel::build(
            Arc::clone(&self.matrix),
            params.depot,
            params.num_vehicles,
        )?;
        let transit: Arc<dyn TransitCost> = Arc::<CostMatrix>::clone(&self.matrix);
        let distance = model.add_dimension(
            DISTANCE_DIMENSION,
            transit,
            0,
            params.max_distance,
            true,
        )?;
        model
            .dimension_mut(distance)
            .set_span_cost_coefficient(params.cost_coefficient);
        Ok(model)
    }
}

/// Solve `problem` and report each vehicle's route and distance.
///
/// # Errors
///
/// Returns [`SolveError::Validation`] for an out-of-range depot,
/// [`SolveError::NoFeasibleSolution`] when the distance budget cannot cover
/// every location, and [`SolveError::Cancelled`] once `cancellation` fires.
///
/// # Examples
///
/// ```
/// use tsp_solver_core::Cancellation;
/// use tsp_solver_routing::{SearchParameters, VrpProblem, solve_vrp};
///
/// let rows = vec![
///     vec![0, 10, 15, 20],
///     vec![10, 0, 35, 25],
///     vec![15, 35, 0, 30],
///     vec![20, 25, 30, 0],
/// ];
/// let problem = VrpProblem::from_signed_rows(&rows, 0, 1, 100, 1).unwrap();
/// let solution =
///     solve_vrp(&problem, &SearchParameters::default(), &Cancellation::new()).unwrap();
/// assert_eq!(solution.routes[0].route, vec![0, 1, 3, 2, 0]);
/// assert_eq!(solution.max_route_distance, 80);
/// ```
pub fn solve_vrp(
    problem: &VrpProblem,
    parameters: &SearchParameters,
    cancellation: &Cancellation,
) -> Result<VrpSolution, SolveError> {
    let model = problem.model()?;
    let assignment = search::solve(&model, parameters, cancellation)?;
    let solution = extract(&model, &assignment)?;
    let routes: Vec<VrpRoute> = solution
        .routes
        .into_iter()
        .map(|report| VrpRoute {
            distance: report
                .dimension(DISTANCE_DIMENSION)
                .map_or(report.cost, |trace| trace.total),
            route: report.nodes,
            vehicle: report.vehicle,
        })
        .collect();
    let max_route_distance = routes.iter().map(|r| r.distance).max().unwrap_or(0);
    debug!(
        "VRP solved: {} routes, longest {max_route_distance}, objective {}",
        routes.len(),
        solution.objective
    );
    Ok(VrpSolution {
        routes,
        max_route_distance,
    })
}
