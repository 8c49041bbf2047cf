//! First-improvement local search over 2-opt, or-opt and relocate moves.
//!
//! Moves are scanned in a fixed order and the first one that strictly lowers
//! the objective while keeping every route feasible is applied. The scan then
//! restarts. Search stops at a local optimum, after `max_iterations` accepted
//! moves, or when the time limit runs out.

use std::time::Instant;

use log::{debug, trace};
use tsp_solver_core::{Cancellation, SolveError, ValidationError};

use super::SearchParameters;
use crate::evaluate::{self, RouteMetrics};
use crate::{Assignment, RoutingModel};

/// Longest segment moved by or-opt.
const OR_OPT_MAX_SEGMENT: usize = 3;

struct Incumbent<'m> {
    model: &'m RoutingModel,
    routes: Vec<Vec<usize>>,
    metrics: Vec<RouteMetrics>,
    objective: u64,
    deadline: Option<Instant>,
}

/// An improving move: replacement routes with their metrics.
struct Improvement {
    kind: &'static str,
    changes: Vec<(usize, RouteMetrics)>,
    routes: Vec<(usize, Vec<usize>)>,
    objective: u64,
}

/// Improve `assignment` without breaking any dimension.
///
/// The returned assignment never has a higher objective than the input.
///
/// # Errors
///
/// Returns [`SolveError::Cancelled`] once `cancellation` fires and
/// [`ValidationError::InfeasibleRoute`] when the input is not feasible.
pub fn improve(
    model: &RoutingModel,
    assignment: Assignment,
    parameters: &SearchParameters,
    cancellation: &Cancellation,
) -> Result<Assignment, SolveError> {
    let started = Instant::now();
    let deadline = parameters
        .time_limit
        .and_then(|limit| started.checked_add(limit));
    let mut incumbent = Incumbent::new(model, assignment.into_routes(), deadline)?;
    let initial = incumbent.objective;
    let mut accepted = 0_usize;

    loop {
        cancellation.check()?;
        if accepted >= parameters.max_iterations {
            debug!("local search stopped after {accepted} moves");
            break;
        }
        if incumbent.expired() {
            debug!("local search time limit reached after {accepted} moves");
            break;
        }
        let Some(improvement) = incumbent.find_improvement() else {
            break;
        };
        trace!(
            "{} move lowers objective {} -> {}",
            improvement.kind, incumbent.objective, improvement.objective
        );
        incumbent.apply(improvement);
        accepted += 1;
    }

    debug!(
        "local search accepted {accepted} moves, objective {initial} -> {}",
        incumbent.objective
    );
    Ok(Assignment::from_checked(incumbent.routes))
}

impl<'m> Incumbent<'m> {
    fn new(
        model: &'m RoutingModel,
        routes: Vec<Vec<usize>>,
        deadline: Option<Instant>,
    ) -> Result<Self, SolveError> {
        let metrics = routes
            .iter()
            .enumerate()
            .map(|(vehicle, nodes)| {
                evaluate::route_metrics(model, vehicle, nodes).ok_or_else(|| {
                    ValidationError::InfeasibleRoute {
                        vehicle,
                        dimension: first_violated(model, vehicle, nodes),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let objective = evaluate::objective(model, metrics.iter());
        Ok(Self {
            model,
            routes,
            metrics,
            objective,
            deadline,
        })
    }

    fn expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn apply(&mut self, improvement: Improvement) {
        for (vehicle, nodes) in improvement.routes {
            if let Some(slot) = self.routes.get_mut(vehicle) {
                *slot = nodes;
            }
        }
        for (vehicle, metrics) in improvement.changes {
            if let Some(slot) = self.metrics.get_mut(vehicle) {
                *slot = metrics;
            }
        }
        self.objective = improvement.objective;
    }

    fn find_improvement(&self) -> Option<Improvement> {
        self.two_opt()
            .or_else(|| self.or_opt())
            .or_else(|| self.relocate())
    }

    /// Evaluate replacement routes; keep them only if feasible and strictly
    /// better.
    fn evaluate(
        &self,
        kind: &'static str,
        routes: Vec<(usize, Vec<usize>)>,
    ) -> Option<Improvement> {
        if !self.model.has_span_costs() {
            let before = routes
                .iter()
                .filter_map(|(vehicle, _)| self.metrics.get(*vehicle))
                .map(|metrics| metrics.cost)
                .fold(0, u64::saturating_add);
            let after = routes
                .iter()
                .map(|(_, nodes)| evaluate::arc_cost(self.model, nodes))
                .fold(0, u64::saturating_add);
            if after >= before {
                return None;
            }
        }
        let changes = routes
            .iter()
            .map(|(vehicle, nodes)| {
                evaluate::route_metrics(self.model, *vehicle, nodes).map(|m| (*vehicle, m))
            })
            .collect::<Option<Vec<_>>>()?;
        let objective =
            evaluate::objective(self.model, evaluate::substituted(&self.metrics, &changes));
        (objective < self.objective).then_some(Improvement {
            kind,
            changes,
            routes,
            objective,
        })
    }

    /// Reverse `route[i..=j]` for interior positions `i < j`.
    fn two_opt(&self) -> Option<Improvement> {
        for (vehicle, route) in self.routes.iter().enumerate() {
            if self.expired() {
                return None;
            }
            let last = route.len().saturating_sub(1);
            for i in 1..last {
                for j in i + 1..last {
                    let mut candidate = route.clone();
                    if let Some(segment) = candidate.get_mut(i..=j) {
                        segment.reverse();
                    }
                    if let Some(found) = self.evaluate("2-opt", vec![(vehicle, candidate)]) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    /// Move a segment of up to three nodes elsewhere in the same route.
    fn or_opt(&self) -> Option<Improvement> {
        for (vehicle, route) in self.routes.iter().enumerate() {
            if self.expired() {
                return None;
            }
            let last = route.len().saturating_sub(1);
            for length in 1..=OR_OPT_MAX_SEGMENT {
                for start in 1..last {
                    let end = start + length;
                    if end > last {
                        break;
                    }
                    let Some(segment) = route.get(start..end) else {
                        continue;
                    };
                    let mut rest = route.clone();
                    rest.drain(start..end);
                    for after in 0..rest.len().saturating_sub(1) {
                        if after + 1 == start {
                            continue;
                        }
                        let mut candidate = rest.clone();
                        candidate.splice(after + 1..after + 1, segment.iter().copied());
                        if let Some(found) = self.evaluate("or-opt", vec![(vehicle, candidate)]) {
                            return Some(found);
                        }
                    }
                }
            }
        }
        None
    }

    /// Move one node to another vehicle's route.
    fn relocate(&self) -> Option<Improvement> {
        for (from, source) in self.routes.iter().enumerate() {
            if self.expired() {
                return None;
            }
            let last = source.len().saturating_sub(1);
            for position in 1..last {
                let Some(&node) = source.get(position) else {
                    continue;
                };
                let mut shortened = source.clone();
                shortened.remove(position);
                for (to, target) in self.routes.iter().enumerate() {
                    if to == from {
                        continue;
                    }
                    for after in 0..target.len().saturating_sub(1) {
                        let mut extended = target.clone();
                        extended.insert(after + 1, node);
                        let routes = vec![(from, shortened.clone()), (to, extended)];
                        if let Some(found) = self.evaluate("relocate", routes) {
                            return Some(found);
                        }
                    }
                }
            }
        }
        None
    }
}

/// Name of the first dimension `nodes` cannot be scheduled on.
fn first_violated(model: &RoutingModel, vehicle: usize, nodes: &[usize]) -> String {
    model
        .dimensions()
        .iter()
        .find(|dimension| crate::schedule::finalize(dimension, vehicle, nodes).is_none())
        .map(|dimension| dimension.name().to_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::time::Duration;
    use tsp_solver_core::test_support::four_city_matrix;

    fn distance_model(vehicles: usize, coefficient: u64) -> RoutingModel {
        let matrix = Arc::new(four_city_matrix());
        let mut model = RoutingModel::build(Arc::clone(&matrix), 0, vehicles).expect("model");
        let distance = model
            .add_dimension("Distance", matrix, 0, 100, true)
            .expect("distance dimension");
        model
            .dimension_mut(distance)
            .set_span_cost_coefficient(coefficient);
        model
    }

    fn cost(model: &RoutingModel, assignment: &Assignment) -> u64 {
        assignment
            .routes()
            .iter()
            .map(|route| evaluate::arc_cost(model, route))
            .sum()
    }

    #[rstest]
    fn two_opt_repairs_a_crossing_tour() {
        let model = distance_model(1, 0);
        let start = Assignment::from_routes(&model, vec![vec![0, 2, 1, 3, 0]]).expect("routes");
        assert_eq!(cost(&model, &start), 95);
        let improved = improve(
            &model,
            start,
            &SearchParameters::default(),
            &Cancellation::new(),
        )
        .expect("improvement runs");
        assert_eq!(cost(&model, &improved), 80);
    }

    #[rstest]
    fn relocate_balances_routes_under_span_cost() {
        let model = distance_model(2, 1);
        let start =
            Assignment::from_routes(&model, vec![vec![0, 1, 3, 2, 0], vec![0, 0]]).expect("routes");
        let improved = improve(
            &model,
            start,
            &SearchParameters::default(),
            &Cancellation::new(),
        )
        .expect("improvement runs");
        let used = improved.routes().iter().filter(|r| r.len() > 2).count();
        assert_eq!(used, 2);
        assert_eq!(improved.visit_count(), 3);
    }

    #[rstest]
    fn zero_iterations_keep_the_input() {
        let model = distance_model(1, 0);
        let start = Assignment::from_routes(&model, vec![vec![0, 2, 1, 3, 0]]).expect("routes");
        let parameters = SearchParameters {
            max_iterations: 0,
            ..SearchParameters::default()
        };
        let kept = improve(&model, start.clone(), &parameters, &Cancellation::new())
            .expect("improvement runs");
        assert_eq!(kept, start);
    }

    #[rstest]
    fn elapsed_time_limit_keeps_the_input() {
        let model = distance_model(1, 0);
        let start = Assignment::from_routes(&model, vec![vec![0, 2, 1, 3, 0]]).expect("routes");
        let parameters = SearchParameters {
            time_limit: Some(Duration::ZERO),
            ..SearchParameters::default()
        };
        let kept = improve(&model, start.clone(), &parameters, &Cancellation::new())
            .expect("time limit is not an error");
        assert_eq!(kept, start);
    }

    #[rstest]
    fn cancellation_is_an_error() {
        let model = distance_model(1, 0);
        let start = Assignment::from_routes(&model, vec![vec![0, 2, 1, 3, 0]]).expect("routes");
        let token = Cancellation::new();
        token.cancel();
        let err = improve(&model, start, &SearchParameters::default(), &token)
            .expect_err("cancelled");
        assert_eq!(err, SolveError::Cancelled);
    }

    #[rstest]
    fn infeasible_input_is_rejected() {
        let matrix = Arc::new(four_city_matrix());
        let mut model = RoutingModel::build(Arc::clone(&matrix), 0, 1).expect("model");
        model
            .add_dimension("Distance", matrix, 0, 50, true)
            .expect("distance dimension");
        let start = Assignment::from_routes(&model, vec![vec![0, 1, 3, 2, 0]]).expect("routes");
        let err = improve(
            &model,
            start,
            &SearchParameters::default(),
            &Cancellation::new(),
        )
        .expect_err("route exceeds 50");
        assert_eq!(
            err,
            SolveError::Validation(ValidationError::InfeasibleRoute {
                vehicle: 0,
                dimension: "Distance".to_owned()
            })
        );
    }
}
