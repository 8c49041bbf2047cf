//! Provider trait turning request locations into a cost matrix.

use crate::Location;

use super::cost::{CostMatrix, MatrixKind};
use super::error::MatrixError;

/// Produce pairwise travel costs for a set of locations.
///
/// Implementers must return a square `n×n` matrix where
/// `n == locations.len()`. `matrix.cost(i, j)` is the cost of travelling from
/// `locations[i]` to `locations[j]` measured as `kind`.
///
/// # Examples
///
/// ```rust
/// use tsp_solver_core::{CostMatrix, CostMatrixProvider, Location, MatrixError, MatrixKind};
///
/// struct UnitProvider;
///
/// impl CostMatrixProvider for UnitProvider {
///     fn cost_matrix(
///         &self,
///         locations: &[Location],
///         _kind: MatrixKind,
///     ) -> Result<CostMatrix, MatrixError> {
///         if locations.is_empty() {
///             return Err(MatrixError::EmptyInput);
///         }
///         let n = locations.len();
///         let rows = (0..n)
///             .map(|i| (0..n).map(|j| u64::from(i != j)).collect())
///             .collect();
///         CostMatrix::from_rows(rows, MatrixKind::Distance).map_err(|_| MatrixError::EmptyInput)
///     }
/// }
///
/// let matrix = UnitProvider.cost_matrix(&[Location::new(0.0, 0.0)], MatrixKind::Distance)?;
/// assert_eq!(matrix.len(), 1);
/// # Ok::<(), MatrixError>(())
/// ```
pub trait CostMatrixProvider: Send + Sync {
    /// Return a matrix of `kind` costs for `locations`.
    ///
    /// Implementations must return `Err(MatrixError::EmptyInput)` when
    /// `locations` is empty.
    fn cost_matrix(
        &self,
        locations: &[Location],
        kind: MatrixKind,
    ) -> Result<CostMatrix, MatrixError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::FixedMatrixProvider;

    #[rstest]
    fn returns_square_matrix() {
        let provider = FixedMatrixProvider::uniform(7);
        let locations = vec![Location::new(0.0, 0.0); 3];
        let matrix = provider
            .cost_matrix(&locations, MatrixKind::Time)
            .expect("expected a matrix for three locations");
        assert_eq!(matrix.len(), locations.len());
        assert_eq!(matrix.cost(0, 0), 0);
        assert_eq!(matrix.cost(0, 2), 7);
    }

    #[rstest]
    fn errors_on_empty_input() {
        let provider = FixedMatrixProvider::uniform(7);
        let err = provider
            .cost_matrix(&[], MatrixKind::Distance)
            .expect_err("expected EmptyInput for empty slice");
        assert_eq!(err, MatrixError::EmptyInput);
    }
}
