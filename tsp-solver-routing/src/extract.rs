//! Turn an [`Assignment`] into a reportable [`Solution`].

use tsp_solver_core::{DimensionTrace, RouteReport, Solution, ValidationError};

use crate::evaluate::{self, Extent, RouteMetrics};
use crate::schedule;
use crate::{Assignment, RoutingModel};

/// Finalise every dimension along every route of `assignment`.
///
/// Each trace reports the range left for the cumul at every stop once the
/// route starts as early as possible and ends as early as that start allows.
///
/// # Errors
///
/// Returns [`ValidationError::InfeasibleRoute`] naming the first vehicle and
/// dimension that cannot be scheduled.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tsp_solver_core::{CostMatrix, MatrixKind};
/// use tsp_solver_routing::{Assignment, RoutingModel, extract};
///
/// let matrix = Arc::new(
///     CostMatrix::from_rows(vec![vec![0, 4], vec![4, 0]], MatrixKind::Distance).unwrap(),
/// );
/// let mut model = RoutingModel::build(Arc::clone(&matrix), 0, 1).unwrap();
/// model.add_dimension("Distance", matrix, 0, 10, true).unwrap();
/// let assignment = Assignment::from_routes(&model, vec![vec![0, 1, 0]]).unwrap();
/// let solution = extract(&model, &assignment).unwrap();
/// assert_eq!(solution.objective, 8);
/// assert_eq!(solution.routes[0].dimension("Distance").unwrap().total, 8);
/// ```
pub fn extract(model: &RoutingModel, assignment: &Assignment) -> Result<Solution, ValidationError> {
    let mut routes = Vec::with_capacity(assignment.routes().len());
    let mut fleet = Vec::with_capacity(assignment.routes().len());
    for (vehicle, nodes) in assignment.routes().iter().enumerate() {
        let mut traces = Vec::with_capacity(model.dimensions().len());
        let mut extents = Vec::with_capacity(model.dimensions().len());
        for dimension in model.dimensions() {
            let schedule = schedule::finalize(dimension, vehicle, nodes).ok_or_else(|| {
                ValidationError::InfeasibleRoute {
                    vehicle,
                    dimension: dimension.name().to_owned(),
                }
            })?;
            extents.push(Extent::from(&schedule));
            traces.push(DimensionTrace {
                name: dimension.name().to_owned(),
                total: schedule.end,
                cumuls: schedule.cumuls,
            });
        }
        let cost = evaluate::arc_cost(model, nodes);
        fleet.push(RouteMetrics {
            cost,
            used: nodes.len() > 2,
            extents,
        });
        routes.push(RouteReport {
            vehicle,
            nodes: nodes.clone(),
            cost,
            dimensions: traces,
        });
    }
    let objective = evaluate::objective(model, fleet.iter());
    Ok(Solution { routes, objective })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use tsp_solver_core::test_support::four_city_matrix;
    use tsp_solver_core::{Cancellation, CumulRange};

    use crate::search::{self, SearchParameters};
    use crate::TransitFn;

    fn distance_model(capacity: u64) -> RoutingModel {
        let matrix = Arc::new(four_city_matrix());
        let mut model = RoutingModel::build(Arc::clone(&matrix), 0, 2).expect("model");
        let distance = model
            .add_dimension("Distance", matrix, 0, capacity, true)
            .expect("distance dimension");
        model.dimension_mut(distance).set_span_cost_coefficient(1);
        model
    }

    #[rstest]
    fn reports_prefix_sums_and_objective() {
        let model = distance_model(100);
        let assignment =
            Assignment::from_routes(&model, vec![vec![0, 1, 3, 2, 0]]).expect("routes");
        let solution = extract(&model, &assignment).expect("feasible");
        assert_eq!(solution.objective, 160);
        let first = solution.routes.first().expect("vehicle 0");
        assert_eq!(first.cost, 80);
        let trace = first.dimension("Distance").expect("distance trace");
        assert_eq!(trace.total, 80);
        assert_eq!(
            trace.cumuls,
            [0, 10, 35, 65, 80].map(CumulRange::point).to_vec()
        );
    }

    #[rstest]
    fn idle_vehicle_is_reported() {
        let model = distance_model(100);
        let assignment =
            Assignment::from_routes(&model, vec![vec![0, 1, 3, 2, 0]]).expect("routes");
        let solution = extract(&model, &assignment).expect("feasible");
        let idle = solution.routes.get(1).expect("vehicle 1");
        assert!(!idle.is_used());
        assert_eq!(idle.nodes, vec![0, 0]);
        assert_eq!(idle.cost, 0);
    }

    #[rstest]
    fn tracks_each_dimension_along_solved_routes() {
        let matrix = Arc::new(four_city_matrix());
        let mut model = RoutingModel::build(Arc::clone(&matrix), 0, 3).expect("model");
        model
            .add_dimension("Distance", matrix, 0, 100, true)
            .expect("distance dimension");
        model
            .add_dimension(
                "Stops",
                Arc::new(TransitFn(|_from: usize, to: usize| u64::from(to != 0))),
                0,
                1,
                true,
            )
            .expect("stops dimension");
        let assignment = search::solve(&model, &SearchParameters::default(), &Cancellation::new())
            .expect("one stop per vehicle fits");
        let solution = extract(&model, &assignment).expect("feasible");

        let routes: Vec<Vec<usize>> = solution.routes.iter().map(|r| r.nodes.clone()).collect();
        assert_eq!(routes, vec![vec![0, 1, 0], vec![0, 2, 0], vec![0, 3, 0]]);
        for (route, distance) in solution.routes.iter().zip([20, 30, 40]) {
            let stops = route.dimension("Stops").expect("stops trace");
            assert_eq!(stops.total, 1);
            let travelled = route.dimension("Distance").expect("distance trace");
            assert_eq!(travelled.total, distance);
        }
    }

    #[rstest]
    fn infeasible_route_names_dimension() {
        let model = distance_model(60);
        let assignment =
            Assignment::from_routes(&model, vec![vec![0, 0], vec![0, 1, 3, 2, 0]]).expect("routes");
        let err = extract(&model, &assignment).expect_err("route exceeds 60");
        assert_eq!(
            err,
            ValidationError::InfeasibleRoute {
                vehicle: 1,
                dimension: "Distance".to_owned()
            }
        );
    }
}
