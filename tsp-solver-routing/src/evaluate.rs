//! Route metrics and the objective they add up to.

use crate::RoutingModel;
use crate::schedule::{self, Schedule};

/// Finalised start and end cumul of one dimension on one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Extent {
    pub(crate) start: u64,
    pub(crate) end: u64,
}

impl From<&Schedule> for Extent {
    fn from(schedule: &Schedule) -> Self {
        Self {
            start: schedule.start,
            end: schedule.end,
        }
    }
}

/// What one route contributes to the objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteMetrics {
    pub(crate) cost: u64,
    pub(crate) used: bool,
    /// One extent per dimension, in registration order.
    pub(crate) extents: Vec<Extent>,
}

/// Sum of arc costs along `nodes`.
pub(crate) fn arc_cost(model: &RoutingModel, nodes: &[usize]) -> u64 {
    nodes
        .windows(2)
        .filter_map(|arc| match *arc {
            [from, to] => Some(model.cost(from, to)),
            _ => None,
        })
        .fold(0, u64::saturating_add)
}

/// Metrics of `nodes` driven by `vehicle`, or `None` when any dimension
/// cannot be scheduled.
pub(crate) fn route_metrics(
    model: &RoutingModel,
    vehicle: usize,
    nodes: &[usize],
) -> Option<RouteMetrics> {
    let extents = model
        .dimensions()
        .iter()
        .map(|dimension| schedule::finalize(dimension, vehicle, nodes).map(|s| Extent::from(&s)))
        .collect::<Option<Vec<_>>>()?;
    Some(RouteMetrics {
        cost: arc_cost(model, nodes),
        used: nodes.len() > 2,
        extents,
    })
}

/// Span penalties: per dimension, `coefficient × (latest end − earliest
/// start)` over the vehicles in use.
pub(crate) fn span_cost<'a, I>(model: &RoutingModel, fleet: I) -> u64
where
    I: Iterator<Item = &'a RouteMetrics> + Clone,
{
    model
        .dimensions()
        .iter()
        .enumerate()
        .filter(|(_, dimension)| dimension.span_cost_coefficient() > 0)
        .map(|(index, dimension)| {
            let extents = fleet
                .clone()
                .filter(|metrics| metrics.used)
                .filter_map(|metrics| metrics.extents.get(index));
            let earliest = extents.clone().map(|extent| extent.start).min();
            let latest = extents.map(|extent| extent.end).max();
            let span = match (earliest, latest) {
                (Some(start), Some(end)) => end.saturating_sub(start),
                _ => 0,
            };
            dimension.span_cost_coefficient().saturating_mul(span)
        })
        .fold(0, u64::saturating_add)
}

/// Arc costs plus span penalties of a whole fleet.
pub(crate) fn objective<'a, I>(model: &RoutingModel, fleet: I) -> u64
where
    I: Iterator<Item = &'a RouteMetrics> + Clone,
{
    let arcs = fleet
        .clone()
        .map(|metrics| metrics.cost)
        .fold(0, u64::saturating_add);
    arcs.saturating_add(span_cost(model, fleet))
}

/// The fleet `base` with the metrics of some vehicles replaced.
pub(crate) fn substituted<'a>(
    base: &'a [RouteMetrics],
    changes: &'a [(usize, RouteMetrics)],
) -> impl Iterator<Item = &'a RouteMetrics> + Clone + 'a {
    base.iter().enumerate().map(move |(vehicle, metrics)| {
        changes
            .iter()
            .find(|(changed, _)| *changed == vehicle)
            .map_or(metrics, |(_, replacement)| replacement)
    })
}
