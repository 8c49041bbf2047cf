//! Planar cost matrices computed from request coordinates.
//!
//! Coordinates are treated as points on a plane. Distances are the Euclidean
//! length in degrees multiplied by a scale factor and truncated; travel times
//! divide the scaled distance by a constant vehicle speed.

use std::num::{NonZeroU32, NonZeroUsize};

use tsp_solver_core::{CostMatrix, CostMatrixProvider, Location, MatrixError, MatrixKind};

/// Factor applied to coordinate distances before truncation.
pub const DEFAULT_DISTANCE_SCALE: u32 = 100;
/// Scaled distance covered per unit of time.
pub const DEFAULT_VEHICLE_SPEED: u32 = 80;

/// [`CostMatrixProvider`] measuring straight-line distances between
/// locations.
///
/// Distances are `trunc(euclid × distance_scale)`. Travel times are
/// `trunc(euclid × distance_scale / vehicle_speed)`: they grow with distance
/// and shrink as the vehicle gets faster. A time computed as speed over
/// distance falls as the distance grows and will not match these values.
///
/// # Examples
///
/// ```
/// use tsp_solver_core::{CostMatrixProvider, Location, MatrixKind};
/// use tsp_solver_service::EuclideanMatrixProvider;
///
/// let locations = [Location::new(0.0, 0.0), Location::new(3.0, 4.0)];
/// let provider = EuclideanMatrixProvider::default();
/// let distance = provider.cost_matrix(&locations, MatrixKind::Distance)?;
/// let time = provider.cost_matrix(&locations, MatrixKind::Time)?;
/// assert_eq!(distance.cost(0, 1), 500);
/// assert_eq!(time.cost(0, 1), 6);
/// # Ok::<(), tsp_solver_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EuclideanMatrixProvider {
    distance_scale: u32,
    vehicle_speed: NonZeroU32,
}

impl Default for EuclideanMatrixProvider {
    fn default() -> Self {
        Self {
            distance_scale: DEFAULT_DISTANCE_SCALE,
            vehicle_speed: NonZeroU32::new(DEFAULT_VEHICLE_SPEED).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl EuclideanMatrixProvider {
    /// Provider with explicit scale and speed.
    #[must_use]
    pub const fn new(distance_scale: u32, vehicle_speed: NonZeroU32) -> Self {
        Self {
            distance_scale,
            vehicle_speed,
        }
    }

    /// Factor applied to coordinate distances.
    #[must_use]
    pub const fn distance_scale(&self) -> u32 {
        self.distance_scale
    }

    /// Scaled distance covered per unit of time.
    #[must_use]
    pub const fn vehicle_speed(&self) -> NonZeroU32 {
        self.vehicle_speed
    }

    fn scaled_distance(&self, from: Location, to: Location) -> f64 {
        let delta = to.coord() - from.coord();
        delta.x.hypot(delta.y) * f64::from(self.distance_scale)
    }

    fn cost(&self, from: Location, to: Location, kind: MatrixKind) -> u64 {
        let distance = self.scaled_distance(from, to);
        let cost = match kind {
            MatrixKind::Distance => distance,
            MatrixKind::Time => distance / f64::from(self.vehicle_speed.get()),
        };
        // Float-to-int casts saturate; costs are finite and non-negative here.
        cost.trunc() as u64
    }
}

impl CostMatrixProvider for EuclideanMatrixProvider {
    fn cost_matrix(
        &self,
        locations: &[Location],
        kind: MatrixKind,
    ) -> Result<CostMatrix, MatrixError> {
        let size = NonZeroUsize::new(locations.len()).ok_or(MatrixError::EmptyInput)?;
        if let Some(index) = locations.iter().position(|location| !location.is_finite()) {
            return Err(MatrixError::NonFiniteCoordinate { index });
        }
        Ok(CostMatrix::from_fn(size, |from, to| {
            match (locations.get(from), locations.get(to)) {
                (Some(&a), Some(&b)) if from != to => self.cost(a, b, kind),
                _ => 0,
            }
        }))
    }
}
