//! Deterministic cheapest-insertion construction.
//!
//! Every vehicle starts parked at the depot. Each round evaluates every
//! admissible `(vehicle, position, location)` triple and commits the one with
//! the smallest marginal cost: the arc delta `c(p, n) + c(n, q) − c(p, q)`
//! plus the change in span penalties. Triples are scanned vehicle first, then
//! position, then location, and only a strictly cheaper triple replaces the
//! incumbent, so ties go to the lowest vehicle, position and location.

use log::{debug, trace};
use tsp_solver_core::{Cancellation, CumulRange, SolveError};

use super::FirstSolutionStrategy;
use crate::evaluate::{self, RouteMetrics};
use crate::schedule;
use crate::{Assignment, Dimension, RoutingModel};

/// A vehicle's route with its cached forward intervals and metrics.
struct RouteState {
    nodes: Vec<usize>,
    /// Forward intervals per dimension, parallel to `nodes`.
    forward: Vec<Vec<CumulRange>>,
    metrics: RouteMetrics,
}

impl RouteState {
    fn new(model: &RoutingModel, vehicle: usize, nodes: Vec<usize>) -> Option<Self> {
        let forward = model
            .dimensions()
            .iter()
            .map(|dimension| schedule::forward(dimension, vehicle, &nodes))
            .collect::<Option<Vec<_>>>()?;
        let metrics = evaluate::route_metrics(model, vehicle, &nodes)?;
        Some(Self {
            nodes,
            forward,
            metrics,
        })
    }

    /// Route with `node` inserted after `position`.
    fn with_insertion(&self, position: usize, node: usize) -> Vec<usize> {
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.extend(self.nodes.iter().take(position + 1));
        nodes.push(node);
        nodes.extend(self.nodes.iter().skip(position + 1));
        nodes
    }
}

#[derive(Debug, Clone, Copy)]
struct Insertion {
    cost: i128,
    vehicle: usize,
    position: usize,
    node: usize,
}

/// Build an assignment visiting every location.
///
/// # Errors
///
/// Returns [`SolveError::NoFeasibleSolution`] with the number of locations left
/// over when no admissible insertion remains, and [`SolveError::Cancelled`]
/// once `cancellation` fires.
pub fn construct(
    model: &RoutingModel,
    strategy: FirstSolutionStrategy,
    cancellation: &Cancellation,
) -> Result<Assignment, SolveError> {
    let depot = model.depot();
    let mut unrouted: Vec<usize> = (0..model.node_count()).filter(|&n| n != depot).collect();
    if model.num_vehicles() == 0 {
        debug!("no vehicles; {} locations stay unrouted", unrouted.len());
        return Ok(Assignment::empty(model));
    }

    let mut routes = (0..model.num_vehicles())
        .map(|vehicle| RouteState::new(model, vehicle, vec![depot, depot]))
        .collect::<Option<Vec<_>>>()
        .ok_or(SolveError::NoFeasibleSolution {
            unrouted: unrouted.len(),
        })?;

    while !unrouted.is_empty() {
        cancellation.check()?;
        let best = cheapest_insertion(model, &routes, &unrouted, strategy).ok_or(
            SolveError::NoFeasibleSolution {
                unrouted: unrouted.len(),
            },
        )?;
        trace!(
            "insert location {} on vehicle {} after position {} at cost {}",
            best.node, best.vehicle, best.position, best.cost
        );
        let state = routes
            .get_mut(best.vehicle)
            .ok_or(SolveError::NoFeasibleSolution {
                unrouted: unrouted.len(),
            })?;
        let nodes = state.with_insertion(best.position, best.node);
        *state = RouteState::new(model, best.vehicle, nodes).ok_or(
            SolveError::NoFeasibleSolution {
                unrouted: unrouted.len(),
            },
        )?;
        unrouted.retain(|&node| node != best.node);
    }

    debug!(
        "construction routed {} locations on {} vehicles",
        model.node_count().saturating_sub(1),
        model.num_vehicles()
    );
    Ok(Assignment::from_checked(
        routes.into_iter().map(|state| state.nodes).collect(),
    ))
}

fn cheapest_insertion(
    model: &RoutingModel,
    routes: &[RouteState],
    unrouted: &[usize],
    strategy: FirstSolutionStrategy,
) -> Option<Insertion> {
    let fleet: Vec<RouteMetrics> = routes.iter().map(|state| state.metrics.clone()).collect();
    let span_before = i128::from(evaluate::span_cost(model, fleet.iter()));
    let mut best: Option<Insertion> = None;
    for (vehicle, state) in routes.iter().enumerate() {
        let last_position = state.nodes.len().saturating_sub(2);
        let first_position = match strategy {
            FirstSolutionStrategy::PathCheapestArc => last_position,
            FirstSolutionStrategy::GlobalCheapestInsertion => 0,
        };
        for position in first_position..=last_position {
            for &node in unrouted {
                let Some(cost) =
                    insertion_cost(model, &fleet, span_before, vehicle, state, position, node)
                else {
                    continue;
                };
                if best.is_none_or(|incumbent| cost < incumbent.cost) {
                    best = Some(Insertion {
                        cost,
                        vehicle,
                        position,
                        node,
                    });
                }
            }
        }
    }
    best
}

/// Marginal cost of inserting `node` after `position`, or `None` when the
/// insertion breaks a dimension.
fn insertion_cost(
    model: &RoutingModel,
    fleet: &[RouteMetrics],
    span_before: i128,
    vehicle: usize,
    state: &RouteState,
    position: usize,
    node: usize,
) -> Option<i128> {
    let from = state.nodes.get(position).copied()?;
    let to = state.nodes.get(position + 1).copied()?;
    let arc_delta = i128::from(model.cost(from, node)) + i128::from(model.cost(node, to))
        - i128::from(model.cost(from, to));
    if !admits(model, vehicle, state, position, node) {
        return None;
    }
    if !model.has_span_costs() {
        return Some(arc_delta);
    }
    let nodes = state.with_insertion(position, node);
    let metrics = evaluate::route_metrics(model, vehicle, &nodes)?;
    let changes = [(vehicle, metrics)];
    let span_after = i128::from(evaluate::span_cost(
        model,
        evaluate::substituted(fleet, &changes),
    ));
    Some(arc_delta + span_after - span_before)
}

/// Propagate every dimension from the insertion point to the route end.
///
/// Propagation stops early once an interval matches the cached one: from
/// there on the route is unchanged and known to be feasible.
fn admits(
    model: &RoutingModel,
    vehicle: usize,
    state: &RouteState,
    position: usize,
    node: usize,
) -> bool {
    model
        .dimensions()
        .iter()
        .zip(&state.forward)
        .all(|(dimension, cached)| {
            propagate_insertion(dimension, vehicle, &state.nodes, cached, position, node)
                .is_some()
        })
}

fn propagate_insertion(
    dimension: &Dimension,
    vehicle: usize,
    nodes: &[usize],
    cached: &[CumulRange],
    position: usize,
    node: usize,
) -> Option<()> {
    let from = nodes.get(position).copied()?;
    let window = dimension.visit_window(vehicle, node)?;
    let mut current = schedule::step(dimension, cached.get(position).copied()?, from, node, window)?;
    let mut previous = node;
    for index in position + 1..nodes.len() {
        let next = nodes.get(index).copied()?;
        let next_window = schedule::window_at(dimension, vehicle, nodes, index)?;
        current = schedule::step(dimension, current, previous, next, next_window)?;
        if cached.get(index) == Some(&current) {
            return Some(());
        }
        previous = next;
    }
    Some(())
}
