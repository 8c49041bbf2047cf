//! Problem instance shared by construction, search and extraction.

use std::sync::Arc;

use tsp_solver_core::{CostMatrix, ValidationError};

use crate::dimension::{Dimension, DimensionConfig, DimensionHandle, ModelShape, TransitCost};

/// A routing instance: locations, fleet, depot, arc costs and dimensions.
///
/// Every vehicle starts and ends at the depot. Arc costs come from the matrix
/// the model was built with; dimensions add cumulative constraints on top.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use tsp_solver_core::{CostMatrix, MatrixKind};
/// use tsp_solver_routing::RoutingModel;
///
/// let matrix = Arc::new(CostMatrix::from_rows(
///     vec![vec![0, 4], vec![4, 0]],
///     MatrixKind::Distance,
/// )?);
/// let mut model = RoutingModel::build(Arc::clone(&matrix), 0, 1)?;
/// let distance = model.add_dimension("Distance", matrix, 0, 10, true)?;
/// model.dimension_mut(distance).set_span_cost_coefficient(1);
/// assert_eq!(model.cost(0, 1), 4);
/// # Ok::<(), tsp_solver_core::ValidationError>(())
/// ```
#[derive(Debug)]
pub struct RoutingModel {
    matrix: Arc<CostMatrix>,
    depot: usize,
    num_vehicles: usize,
    dimensions: Vec<Dimension>,
}

impl RoutingModel {
    /// Build a model over `matrix` with `num_vehicles` vehicles based at
    /// `depot`. A fleet of zero is legal and yields no routes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DepotOutOfRange`] when `depot` does not name
    /// a location.
    pub fn build(
        matrix: impl Into<Arc<CostMatrix>>,
        depot: usize,
        num_vehicles: usize,
    ) -> Result<Self, ValidationError> {
        let arc_costs = matrix.into();
        let node_count = arc_costs.len();
        if depot >= node_count {
            return Err(ValidationError::DepotOutOfRange { depot, node_count });
        }
        Ok(Self {
            matrix: arc_costs,
            depot,
            num_vehicles,
            dimensions: Vec::new(),
        })
    }

    /// Register a cumulative dimension with the same capacity on every vehicle.
    ///
    /// # Errors
    ///
    /// Rejects a reused name ([`ValidationError::DuplicateDimension`]) and a
    /// transit covering a different number of locations
    /// ([`ValidationError::DimensionSize`]).
    pub fn add_dimension(
        &mut self,
        name: impl Into<String>,
        transit: Arc<dyn TransitCost>,
        slack_max: u64,
        capacity: u64,
        force_start_to_zero: bool,
    ) -> Result<DimensionHandle, ValidationError> {
        let dimension_name = name.into();
        if self.dimension_by_name(&dimension_name).is_some() {
            return Err(ValidationError::DuplicateDimension {
                name: dimension_name,
            });
        }
        if let Some(found) = transit.node_count()
            && found != self.node_count()
        {
            return Err(ValidationError::DimensionSize {
                name: dimension_name,
                expected: self.node_count(),
                found,
            });
        }
        let shape = ModelShape {
            node_count: self.node_count(),
            num_vehicles: self.num_vehicles,
            depot: self.depot,
        };
        let handle = DimensionHandle(self.dimensions.len());
        self.dimensions.push(Dimension::new(
            DimensionConfig {
                name: dimension_name,
                transit,
                slack_max,
                capacity,
                force_start_to_zero,
            },
            shape,
        ));
        Ok(handle)
    }

    /// Number of locations, depot included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.matrix.len()
    }

    /// Fleet size.
    #[must_use]
    pub const fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Start and end location of every route.
    #[must_use]
    pub const fn depot(&self) -> usize {
        self.depot
    }

    /// Arc cost matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Arc<CostMatrix> {
        &self.matrix
    }

    /// Cost of the arc from `from` to `to`.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> u64 {
        self.matrix.cost(from, to)
    }

    /// Registered dimensions in registration order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// The dimension behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` came from a different model.
    #[must_use]
    #[expect(
        clippy::indexing_slicing,
        reason = "handles are only minted by this model's add_dimension"
    )]
    pub fn dimension(&self, handle: DimensionHandle) -> &Dimension {
        &self.dimensions[handle.0]
    }

    /// Mutable access to the dimension behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` came from a different model.
    #[expect(
        clippy::indexing_slicing,
        reason = "handles are only minted by this model's add_dimension"
    )]
    pub fn dimension_mut(&mut self, handle: DimensionHandle) -> &mut Dimension {
        &mut self.dimensions[handle.0]
    }

    /// Look a dimension up by name.
    #[must_use]
    pub fn dimension_by_name(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|dimension| dimension.name() == name)
    }

    /// Whether any dimension charges a span cost.
    pub(crate) fn has_span_costs(&self) -> bool {
        self.dimensions
            .iter()
            .any(|dimension| dimension.span_cost_coefficient() > 0)
    }
}
