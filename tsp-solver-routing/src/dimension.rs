//! Cumulative dimensions tracked along every route.
//!
//! A dimension accumulates a quantity (distance, time) from the route start:
//! `cumul(next) = cumul(prev) + transit(prev, next) + slack(prev)` with
//! `0 <= slack <= slack_max`. Every cumul must stay within the vehicle's
//! capacity and any range set on the node.

use std::fmt;
use std::sync::Arc;

use tsp_solver_core::{CostMatrix, CumulRange, ValidationError};

/// Per-arc increment of a dimension.
///
/// Implemented for [`CostMatrix`] and for closures wrapped in [`TransitFn`].
pub trait TransitCost: Send + Sync {
    /// Increment when travelling from `from` to `to`.
    fn transit(&self, from: usize, to: usize) -> u64;

    /// Number of locations covered, when known. Registration rejects a
    /// transit that covers a different number of locations than the model.
    fn node_count(&self) -> Option<usize> {
        None
    }
}

impl TransitCost for CostMatrix {
    fn transit(&self, from: usize, to: usize) -> u64 {
        self.cost(from, to)
    }

    fn node_count(&self) -> Option<usize> {
        Some(self.len())
    }
}

/// Adapter turning a closure into a [`TransitCost`].
///
/// # Examples
/// ```
/// use tsp_solver_routing::{TransitCost, TransitFn};
///
/// let unit = TransitFn(|from: usize, to: usize| u64::from(from != to));
/// assert_eq!(unit.transit(0, 1), 1);
/// assert_eq!(unit.transit(2, 2), 0);
/// ```
#[derive(Clone, Copy)]
pub struct TransitFn<F>(pub F);

impl<F> TransitCost for TransitFn<F>
where
    F: Fn(usize, usize) -> u64 + Send + Sync,
{
    fn transit(&self, from: usize, to: usize) -> u64 {
        (self.0)(from, to)
    }
}

/// Opaque reference to a dimension registered on a
/// [`RoutingModel`](crate::RoutingModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionHandle(pub(crate) usize);

/// A named cumulative quantity with its bounds.
///
/// Obtained from [`RoutingModel::dimension_mut`](crate::RoutingModel::dimension_mut)
/// to attach node ranges, start ranges and a span cost.
pub struct Dimension {
    name: String,
    transit: Arc<dyn TransitCost>,
    slack_max: u64,
    force_start_to_zero: bool,
    span_cost_coefficient: u64,
    depot: usize,
    capacities: Vec<u64>,
    node_ranges: Vec<Option<CumulRange>>,
    start_ranges: Vec<Option<CumulRange>>,
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dimension")
            .field("name", &self.name)
            .field("slack_max", &self.slack_max)
            .field("force_start_to_zero", &self.force_start_to_zero)
            .field("span_cost_coefficient", &self.span_cost_coefficient)
            .field("capacities", &self.capacities)
            .field("node_ranges", &self.node_ranges)
            .field("start_ranges", &self.start_ranges)
            .finish_non_exhaustive()
    }
}

/// Shape of the model a dimension is registered on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ModelShape {
    pub(crate) node_count: usize,
    pub(crate) num_vehicles: usize,
    pub(crate) depot: usize,
}

/// Registration arguments for a dimension.
pub(crate) struct DimensionConfig {
    pub(crate) name: String,
    pub(crate) transit: Arc<dyn TransitCost>,
    pub(crate) slack_max: u64,
    pub(crate) capacity: u64,
    pub(crate) force_start_to_zero: bool,
}

impl Dimension {
    pub(crate) fn new(config: DimensionConfig, shape: ModelShape) -> Self {
        let DimensionConfig {
            name,
            transit,
            slack_max,
            capacity,
            force_start_to_zero,
        } = config;
        Self {
            name,
            transit,
            slack_max,
            force_start_to_zero,
            span_cost_coefficient: 0,
            depot: shape.depot,
            capacities: vec![capacity; shape.num_vehicles],
            node_ranges: vec![None; shape.node_count],
            start_ranges: vec![None; shape.num_vehicles],
        }
    }

    /// Name the dimension was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Longest permitted slack at any node.
    #[must_use]
    pub const fn slack_max(&self) -> u64 {
        self.slack_max
    }

    /// Whether every route starts with a cumul of zero.
    #[must_use]
    pub const fn force_start_to_zero(&self) -> bool {
        self.force_start_to_zero
    }

    /// Weight of the fleet span in the objective.
    #[must_use]
    pub const fn span_cost_coefficient(&self) -> u64 {
        self.span_cost_coefficient
    }

    /// Capacity of `vehicle`, or zero when the vehicle does not exist.
    #[must_use]
    pub fn capacity(&self, vehicle: usize) -> u64 {
        self.capacities.get(vehicle).copied().unwrap_or(0)
    }

    /// Range set on `node`, if any.
    #[must_use]
    pub fn node_range(&self, node: usize) -> Option<CumulRange> {
        self.node_ranges.get(node).copied().flatten()
    }

    /// Start range set on `vehicle`, if any.
    #[must_use]
    pub fn vehicle_start_range(&self, vehicle: usize) -> Option<CumulRange> {
        self.start_ranges.get(vehicle).copied().flatten()
    }

    /// Increment of this dimension between two nodes.
    #[must_use]
    pub fn transit(&self, from: usize, to: usize) -> u64 {
        self.transit.transit(from, to)
    }

    /// Restrict the cumul at a non-depot `node` to `[min, max]`.
    ///
    /// # Errors
    ///
    /// Rejects the depot ([`ValidationError::DepotNodeRange`]), unknown nodes
    /// and inverted bounds.
    pub fn set_node_range(
        &mut self,
        node: usize,
        min: u64,
        max: u64,
    ) -> Result<(), ValidationError> {
        if node == self.depot {
            return Err(ValidationError::DepotNodeRange);
        }
        let node_count = self.node_ranges.len();
        let slot = self
            .node_ranges
            .get_mut(node)
            .ok_or(ValidationError::NodeOutOfRange { node, node_count })?;
        *slot = Some(CumulRange::new(min, max)?);
        Ok(())
    }

    /// Restrict the cumul at the start of `vehicle`'s route to `[min, max]`.
    ///
    /// # Errors
    ///
    /// Rejects unknown vehicles and inverted bounds.
    pub fn set_vehicle_start_range(
        &mut self,
        vehicle: usize,
        min: u64,
        max: u64,
    ) -> Result<(), ValidationError> {
        let num_vehicles = self.start_ranges.len();
        let slot = self
            .start_ranges
            .get_mut(vehicle)
            .ok_or(ValidationError::VehicleOutOfRange {
                vehicle,
                num_vehicles,
            })?;
        *slot = Some(CumulRange::new(min, max)?);
        Ok(())
    }

    /// Override the capacity of one vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::VehicleOutOfRange`] for unknown vehicles.
    pub fn set_vehicle_capacity(
        &mut self,
        vehicle: usize,
        capacity: u64,
    ) -> Result<(), ValidationError> {
        let num_vehicles = self.capacities.len();
        let slot = self
            .capacities
            .get_mut(vehicle)
            .ok_or(ValidationError::VehicleOutOfRange {
                vehicle,
                num_vehicles,
            })?;
        *slot = capacity;
        Ok(())
    }

    /// Charge `coefficient × (latest route end − earliest route start)` over
    /// the vehicles in use.
    pub const fn set_span_cost_coefficient(&mut self, coefficient: u64) {
        self.span_cost_coefficient = coefficient;
    }

    /// Values the start cumul of `vehicle` may take, or `None` when no value
    /// satisfies the capacity, the start range and the zero-start rule.
    pub(crate) fn start_window(&self, vehicle: usize) -> Option<CumulRange> {
        let base = if self.force_start_to_zero {
            CumulRange::point(0)
        } else {
            CumulRange::up_to(self.capacity(vehicle))
        };
        match self.vehicle_start_range(vehicle) {
            Some(range) => base.intersect(range),
            None => Some(base),
        }
    }

    /// Values the cumul may take at a visited `node`.
    pub(crate) fn visit_window(&self, vehicle: usize, node: usize) -> Option<CumulRange> {
        let base = CumulRange::up_to(self.capacity(vehicle));
        match self.node_range(node) {
            Some(range) => base.intersect(range),
            None => Some(base),
        }
    }

    /// Values the cumul may take on return to the depot.
    pub(crate) fn end_window(&self, vehicle: usize) -> CumulRange {
        CumulRange::up_to(self.capacity(vehicle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn time() -> Dimension {
        let transit: Arc<dyn TransitCost> = Arc::new(TransitFn(|_: usize, _: usize| 1));
        Dimension::new(
            DimensionConfig {
                name: "Time".to_owned(),
                transit,
                slack_max: 5,
                capacity: 40,
                force_start_to_zero: false,
            },
            ModelShape {
                node_count: 3,
                num_vehicles: 2,
                depot: 0,
            },
        )
    }

    #[rstest]
    fn rejects_depot_node_range(mut time: Dimension) {
        assert_eq!(
            time.set_node_range(0, 0, 10),
            Err(ValidationError::DepotNodeRange)
        );
    }

    #[rstest]
    fn rejects_unknown_node(mut time: Dimension) {
        assert_eq!(
            time.set_node_range(3, 0, 10),
            Err(ValidationError::NodeOutOfRange {
                node: 3,
                node_count: 3
            })
        );
    }

    #[rstest]
    fn rejects_unknown_vehicle(mut time: Dimension) {
        assert!(matches!(
            time.set_vehicle_start_range(2, 0, 1),
            Err(ValidationError::VehicleOutOfRange { vehicle: 2, .. })
        ));
        assert!(time.set_vehicle_capacity(5, 10).is_err());
    }

    #[rstest]
    fn node_window_is_capped_by_capacity(mut time: Dimension) {
        time.set_node_range(1, 30, 60).expect("valid range");
        assert_eq!(
            time.visit_window(0, 1),
            Some(CumulRange::new(30, 40).expect("valid range"))
        );
        time.set_vehicle_capacity(1, 20).expect("known vehicle");
        assert_eq!(time.visit_window(1, 1), None);
    }

    #[rstest]
    fn start_window_honours_start_range(mut time: Dimension) {
        time.set_vehicle_start_range(0, 5, 50).expect("valid range");
        assert_eq!(
            time.start_window(0),
            Some(CumulRange::new(5, 40).expect("valid range"))
        );
        assert_eq!(time.start_window(1), Some(CumulRange::up_to(40)));
    }

    #[rstest]
    fn forced_zero_start_conflicts_with_late_start_range() {
        let transit: Arc<dyn TransitCost> = Arc::new(TransitFn(|_: usize, _: usize| 0));
        let mut distance = Dimension::new(
            DimensionConfig {
                name: "Distance".to_owned(),
                transit,
                slack_max: 0,
                capacity: 100,
                force_start_to_zero: true,
            },
            ModelShape {
                node_count: 2,
                num_vehicles: 1,
                depot: 0,
            },
        );
        assert_eq!(distance.start_window(0), Some(CumulRange::point(0)));
        distance
            .set_vehicle_start_range(0, 3, 9)
            .expect("valid range");
        assert_eq!(distance.start_window(0), None);
    }
}
