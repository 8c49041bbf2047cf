//! Per-vehicle node sequences produced by the search.

use tsp_solver_core::ValidationError;

use crate::RoutingModel;

/// One route per vehicle, each running `depot … depot`.
///
/// A location other than the depot appears at most once across the fleet.
/// Assignments built by [`search::solve`](crate::search::solve) visit every
/// location; hand-built ones may leave some out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    routes: Vec<Vec<usize>>,
}

impl Assignment {
    /// Every vehicle parked at the depot.
    #[must_use]
    pub fn empty(model: &RoutingModel) -> Self {
        let depot = model.depot();
        Self {
            routes: vec![vec![depot, depot]; model.num_vehicles()],
        }
    }

    /// Check hand-built routes against `model`.
    ///
    /// Vehicles without a route are parked at the depot.
    ///
    /// # Errors
    ///
    /// Rejects more routes than vehicles, unknown locations, and routes that
    /// do not run depot to depot or repeat a location.
    pub fn from_routes(
        model: &RoutingModel,
        mut routes: Vec<Vec<usize>>,
    ) -> Result<Self, ValidationError> {
        let num_vehicles = model.num_vehicles();
        if routes.len() > num_vehicles {
            return Err(ValidationError::VehicleOutOfRange {
                vehicle: num_vehicles,
                num_vehicles,
            });
        }
        let depot = model.depot();
        let node_count = model.node_count();
        let mut seen = vec![false; node_count];
        for (vehicle, route) in routes.iter().enumerate() {
            let malformed = ValidationError::MalformedRoute { vehicle };
            let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
                return Err(malformed);
            };
            if route.len() < 2 || first != depot || last != depot {
                return Err(malformed);
            }
            for &node in route.iter().skip(1).take(route.len() - 2) {
                let slot = seen
                    .get_mut(node)
                    .ok_or(ValidationError::NodeOutOfRange { node, node_count })?;
                if node == depot || *slot {
                    return Err(ValidationError::MalformedRoute { vehicle });
                }
                *slot = true;
            }
        }
        routes.resize(num_vehicles, vec![depot, depot]);
        Ok(Self { routes })
    }

    pub(crate) const fn from_checked(routes: Vec<Vec<usize>>) -> Self {
        Self { routes }
    }

    /// Routes in vehicle order.
    #[must_use]
    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Number of location visits across the fleet, depot excluded.
    #[must_use]
    pub fn visit_count(&self) -> usize {
        self.routes
            .iter()
            .map(|route| route.len().saturating_sub(2))
            .sum()
    }

    pub(crate) fn into_routes(self) -> Vec<Vec<usize>> {
        self.routes
    }
}
