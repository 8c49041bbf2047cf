//! Interval propagation of dimension cumuls along a route.
//!
//! For a route `depot, n1, …, nk, depot` the forward pass computes, at every
//! position, the interval of cumul values reachable from some feasible start.
//! Because slack can absorb any value up to `slack_max`, the reachable set at
//! each position is an interval and a route is feasible exactly when no
//! forward interval is empty. The backward pass then trims every interval to
//! the values that can still reach a feasible end.

use tsp_solver_core::CumulRange;

use crate::dimension::Dimension;

/// Finalised cumuls of one dimension along one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Schedule {
    /// Range of the cumul at each position once the start and end are fixed.
    pub(crate) cumuls: Vec<CumulRange>,
    /// Earliest feasible start.
    pub(crate) start: u64,
    /// Earliest feasible end given that start.
    pub(crate) end: u64,
}

/// Cumul interval reachable after travelling `transit` from `from` with up to
/// `slack` extra, before any window applies.
const fn reach(from: CumulRange, transit: u64, slack: u64) -> (u64, u64) {
    (
        from.min().saturating_add(transit),
        from.max().saturating_add(transit).saturating_add(slack),
    )
}

/// Window the cumul must lie in at position `index` of `nodes`.
pub(crate) fn window_at(
    dimension: &Dimension,
    vehicle: usize,
    nodes: &[usize],
    index: usize,
) -> Option<CumulRange> {
    if index == 0 {
        return dimension.start_window(vehicle);
    }
    if index + 1 == nodes.len() {
        return Some(dimension.end_window(vehicle));
    }
    let node = nodes.get(index).copied()?;
    dimension.visit_window(vehicle, node)
}

/// Propagate one step: the interval at the next node given the interval at
/// the previous one.
pub(crate) fn step(
    dimension: &Dimension,
    previous: CumulRange,
    from: usize,
    to: usize,
    window: CumulRange,
) -> Option<CumulRange> {
    let (min, max) = reach(previous, dimension.transit(from, to), dimension.slack_max());
    let reachable = CumulRange::new(min, max).ok()?;
    reachable.intersect(window)
}

/// Forward intervals at every position, or `None` when the route is
/// infeasible for this dimension.
pub(crate) fn forward(
    dimension: &Dimension,
    vehicle: usize,
    nodes: &[usize],
) -> Option<Vec<CumulRange>> {
    let start = window_at(dimension, vehicle, nodes, 0)?;
    forward_from(dimension, vehicle, nodes, start)
}

fn forward_from(
    dimension: &Dimension,
    vehicle: usize,
    nodes: &[usize],
    start: CumulRange,
) -> Option<Vec<CumulRange>> {
    let mut intervals = Vec::with_capacity(nodes.len());
    intervals.push(start);
    let mut current = start;
    for (index, arc) in nodes.windows(2).enumerate() {
        let &[from, to] = arc else { return None };
        let window = window_at(dimension, vehicle, nodes, index + 1)?;
        current = step(dimension, current, from, to, window)?;
        intervals.push(current);
    }
    Some(intervals)
}

/// Trim forward intervals to the values that can reach the last interval.
fn backward(
    dimension: &Dimension,
    nodes: &[usize],
    mut intervals: Vec<CumulRange>,
) -> Option<Vec<CumulRange>> {
    let slack = dimension.slack_max();
    for index in (0..intervals.len().saturating_sub(1)).rev() {
        let from = nodes.get(index).copied()?;
        let to = nodes.get(index + 1).copied()?;
        let next = intervals.get(index + 1).copied()?;
        let transit = dimension.transit(from, to);
        let latest = next.max().checked_sub(transit)?;
        let earliest = next.min().saturating_sub(transit).saturating_sub(slack);
        let allowed = CumulRange::new(earliest, latest).ok()?;
        let slot = intervals.get_mut(index)?;
        *slot = slot.intersect(allowed)?;
    }
    Some(intervals)
}

/// Earliest schedule: fix the start at its minimum feasible value, then the
/// end at its minimum given that start, and report the range left at every
/// position.
pub(crate) fn finalize(dimension: &Dimension, vehicle: usize, nodes: &[usize]) -> Option<Schedule> {
    let trimmed = backward(dimension, nodes, forward(dimension, vehicle, nodes)?)?;
    let start = trimmed.first()?.min();
    let mut fixed = forward_from(dimension, vehicle, nodes, CumulRange::point(start))?;
    let last = fixed.last_mut()?;
    let end = last.min();
    *last = CumulRange::point(end);
    let cumuls = backward(dimension, nodes, fixed)?;
    Some(Schedule { cumuls, start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoutingModel;
    use rstest::{fixture, rstest};
    use std::sync::Arc;
    use tsp_solver_core::test_support::square_matrix;

    fn range(min: u64, max: u64) -> CumulRange {
        CumulRange::new(min, max).expect("valid range")
    }

    /// Four locations with windows on 1..=3, one vehicle, wait up to 10.
    #[fixture]
    fn timed() -> RoutingModel {
        let matrix = Arc::new(square_matrix(&[
            &[0, 3, 5, 7],
            &[3, 0, 4, 6],
            &[5, 4, 0, 3],
            &[7, 6, 3, 0],
        ]));
        let mut model = RoutingModel::build(Arc::clone(&matrix), 0, 1).expect("valid model");
        let time = model
            .add_dimension("Time", matrix, 10, 40, false)
            .expect("time dimension");
        let dimension = model.dimension_mut(time);
        dimension.set_node_range(1, 5, 10).expect("window 1");
        dimension.set_node_range(2, 0, 20).expect("window 2");
        dimension.set_node_range(3, 15, 25).expect("window 3");
        dimension.set_vehicle_start_range(0, 0, 30).expect("depot window");
        model
    }

    #[rstest]
    fn forward_intervals_follow_windows(timed: RoutingModel) {
        let dimension = timed.dimensions().first().expect("time dimension");
        let intervals = forward(dimension, 0, &[0, 1, 2, 3, 0]).expect("feasible route");
        assert_eq!(
            intervals,
            vec![range(0, 30), range(5, 10), range(9, 20), range(15, 25), range(22, 40)]
        );
    }

    #[rstest]
    fn finalize_reports_earliest_schedule(timed: RoutingModel) {
        let dimension = timed.dimensions().first().expect("time dimension");
        let schedule = finalize(dimension, 0, &[0, 1, 2, 3, 0]).expect("feasible route");
        assert_eq!(schedule.start, 0);
        assert_eq!(schedule.end, 22);
        assert_eq!(
            schedule.cumuls,
            vec![range(0, 0), range(5, 8), range(9, 12), range(15, 15), range(22, 22)]
        );
    }

    #[rstest]
    fn missed_window_is_infeasible(timed: RoutingModel) {
        let dimension = timed.dimensions().first().expect("time dimension");
        assert!(forward(dimension, 0, &[0, 3, 2, 1, 0]).is_none());
        assert!(finalize(dimension, 0, &[0, 3, 2, 1, 0]).is_none());
    }

    #[rstest]
    fn late_window_delays_start_within_depot_window() {
        let matrix = Arc::new(square_matrix(&[&[0, 2], &[2, 0]]));
        let mut model = RoutingModel::build(Arc::clone(&matrix), 0, 1).expect("valid model");
        let time = model
            .add_dimension("Time", matrix, 0, 100, false)
            .expect("time dimension");
        let dimension = model.dimension_mut(time);
        dimension.set_node_range(1, 12, 15).expect("window");
        dimension.set_vehicle_start_range(0, 0, 50).expect("depot window");
        let schedule = finalize(model.dimension(time), 0, &[0, 1, 0]).expect("feasible");
        assert_eq!(schedule.start, 10);
        assert_eq!(schedule.end, 14);
        assert_eq!(schedule.cumuls, vec![range(10, 10), range(12, 12), range(14, 14)]);
    }

    #[rstest]
    fn distance_without_slack_is_a_prefix_sum() {
        let matrix = Arc::new(square_matrix(&[
            &[0, 10, 15, 20],
            &[10, 0, 35, 25],
            &[15, 35, 0, 30],
            &[20, 25, 30, 0],
        ]));
        let mut model = RoutingModel::build(Arc::clone(&matrix), 0, 1).expect("valid model");
        let distance = model
            .add_dimension("Distance", matrix, 0, 100, true)
            .expect("distance dimension");
        let schedule =
            finalize(model.dimension(distance), 0, &[0, 1, 3, 2, 0]).expect("feasible route");
        let values: Vec<u64> = schedule.cumuls.iter().map(CumulRange::min).collect();
        assert_eq!(values, vec![0, 10, 35, 65, 80]);
        assert_eq!(schedule.end, 80);

        model
            .dimension_mut(distance)
            .set_vehicle_capacity(0, 90)
            .expect("known vehicle");
        assert!(forward(model.dimension(distance), 0, &[0, 1, 3, 2, 0]).is_some());
        assert!(forward(model.dimension(distance), 0, &[0, 2, 1, 3, 0]).is_none());
    }
}
