//! Square, non-negative integer cost matrix.

use std::fmt;
use std::num::NonZeroUsize;

use crate::ValidationError;

/// What a matrix measures. Used to label validation messages and to ask a
/// provider for the right conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MatrixKind {
    /// Travel distance between locations.
    Distance,
    /// Travel time between locations.
    Time,
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance => f.write_str("distance"),
            Self::Time => f.write_str("time"),
        }
    }
}

/// An `N×N` matrix of non-negative travel costs.
///
/// `cost(i, j)` is the cost of travelling directly from location `i` to
/// location `j`. The matrix need not be symmetric and the diagonal need not be
/// zero. Entries are stored row-major.
///
/// # Examples
///
/// ```
/// use tsp_solver_core::{CostMatrix, MatrixKind};
///
/// let matrix = CostMatrix::from_signed_rows(
///     &[vec![0, 4], vec![6, 0]],
///     MatrixKind::Distance,
/// )?;
/// assert_eq!(matrix.len(), 2);
/// assert_eq!(matrix.cost(1, 0), 6);
/// # Ok::<(), tsp_solver_core::ValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    size: usize,
    costs: Vec<u64>,
}

impl CostMatrix {
    /// Build a matrix from unsigned rows.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMatrix`] when there are no rows and
    /// [`ValidationError::NotSquare`] when any row length differs from the
    /// row count.
    pub fn from_rows(rows: Vec<Vec<u64>>, kind: MatrixKind) -> Result<Self, ValidationError> {
        let size = check_shape(rows.iter().map(Vec::len), rows.len(), kind)?;
        let costs = rows.into_iter().flatten().collect();
        Ok(Self { size, costs })
    }

    /// Build a matrix from signed rows, as they arrive in requests.
    ///
    /// Shape is checked before sign so a ragged matrix reports
    /// [`ValidationError::NotSquare`] even if it also holds negative values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMatrix`], [`ValidationError::NotSquare`]
    /// or [`ValidationError::NegativeCost`].
    pub fn from_signed_rows(rows: &[Vec<i64>], kind: MatrixKind) -> Result<Self, ValidationError> {
        let size = check_shape(rows.iter().map(Vec::len), rows.len(), kind)?;
        let mut costs = Vec::with_capacity(size.saturating_mul(size));
        for (from, row) in rows.iter().enumerate() {
            for (to, value) in row.iter().enumerate() {
                let cost = u64::try_from(*value).map_err(|_| ValidationError::NegativeCost {
                    matrix: kind,
                    from,
                    to,
                })?;
                costs.push(cost);
            }
        }
        Ok(Self { size, costs })
    }

    /// Build a matrix by evaluating `cost(from, to)` for every pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    /// use tsp_solver_core::CostMatrix;
    ///
    /// let size = NonZeroUsize::new(3).unwrap();
    /// let matrix = CostMatrix::from_fn(size, |from, to| from.abs_diff(to) as u64);
    /// assert_eq!(matrix.cost(0, 2), 2);
    /// ```
    pub fn from_fn(locations: NonZeroUsize, mut cost: impl FnMut(usize, usize) -> u64) -> Self {
        let size = locations.get();
        let costs = (0..size)
            .flat_map(|from| (0..size).map(move |to| (from, to)))
            .map(|(from, to)| cost(from, to))
            .collect();
        Self { size, costs }
    }

    /// Number of locations covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Whether the matrix covers no locations. Always `false` for a validated
    /// matrix.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Cost from `from` to `to`, or `None` if either index is out of range.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<u64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.costs.get(from * self.size + to).copied()
    }

    /// Cost from `from` to `to`.
    ///
    /// Out-of-range lookups are a caller bug; they trip a debug assertion and
    /// read as zero in release builds.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> u64 {
        let value = self.get(from, to);
        debug_assert!(
            value.is_some(),
            "matrix lookup out of range: from={from}, to={to}, size={}",
            self.size
        );
        value.unwrap_or(0)
    }
}

fn check_shape(
    row_lengths: impl Iterator<Item = usize>,
    row_count: usize,
    kind: MatrixKind,
) -> Result<usize, ValidationError> {
    if row_count == 0 {
        return Err(ValidationError::EmptyMatrix { matrix: kind });
    }
    let mut lengths = row_lengths;
    if lengths.any(|len| len != row_count) {
        return Err(ValidationError::NotSquare { matrix: kind });
    }
    Ok(row_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_empty_matrix() {
        let err = CostMatrix::from_rows(Vec::new(), MatrixKind::Distance)
            .expect_err("empty matrix should be rejected");
        assert_eq!(
            err,
            ValidationError::EmptyMatrix {
                matrix: MatrixKind::Distance
            }
        );
    }

    #[rstest]
    fn rejects_wide_matrix() {
        let rows = vec![vec![0_i64; 8]; 6];
        let err = CostMatrix::from_signed_rows(&rows, MatrixKind::Distance)
            .expect_err("6x8 matrix should be rejected");
        assert_eq!(
            err.to_string(),
            "The distance matrix does not have equal rows and columns."
        );
    }

    #[rstest]
    fn rejects_ragged_rows() {
        let rows = vec![vec![0, 1], vec![1]];
        let err = CostMatrix::from_rows(rows, MatrixKind::Time).expect_err("ragged matrix");
        assert_eq!(
            err,
            ValidationError::NotSquare {
                matrix: MatrixKind::Time
            }
        );
    }

    #[rstest]
    fn shape_is_checked_before_sign() {
        let rows = vec![vec![0, -1, 3], vec![1, 0, 2]];
        let err = CostMatrix::from_signed_rows(&rows, MatrixKind::Distance)
            .expect_err("ragged matrix with negatives");
        assert!(matches!(err, ValidationError::NotSquare { .. }));
    }

    #[rstest]
    fn rejects_negative_entries() {
        let rows = vec![vec![0, 3], vec![-2, 0]];
        let err = CostMatrix::from_signed_rows(&rows, MatrixKind::Distance)
            .expect_err("negative entry");
        assert_eq!(
            err,
            ValidationError::NegativeCost {
                matrix: MatrixKind::Distance,
                from: 1,
                to: 0
            }
        );
    }

    #[rstest]
    fn keeps_asymmetric_costs() {
        let matrix = CostMatrix::from_rows(vec![vec![0, 4], vec![9, 0]], MatrixKind::Distance)
            .expect("valid matrix");
        assert_eq!(matrix.cost(0, 1), 4);
        assert_eq!(matrix.cost(1, 0), 9);
        assert_eq!(matrix.get(2, 0), None);
    }
}
