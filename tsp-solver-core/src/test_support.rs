//! Test-only matrix providers used by unit and behaviour tests.

use std::num::NonZeroUsize;

use crate::{CostMatrix, CostMatrixProvider, Location, MatrixError, MatrixKind};

/// `CostMatrixProvider` that ignores coordinates.
///
/// Either replays fixed matrices, so tests can pin literal costs behind a
/// request, or produces a uniform matrix sized to the request.
#[derive(Debug, Clone)]
pub struct FixedMatrixProvider {
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    Fixed { distance: CostMatrix, time: CostMatrix },
    Uniform(u64),
}

impl FixedMatrixProvider {
    /// Replay `distance` for distance requests and `time` for time requests.
    pub const fn new(distance: CostMatrix, time: CostMatrix) -> Self {
        Self {
            source: Source::Fixed { distance, time },
        }
    }

    /// Replay `matrix` for every request.
    pub fn same(matrix: CostMatrix) -> Self {
        Self::new(matrix.clone(), matrix)
    }

    /// Produce `cost` between distinct locations and zero on the diagonal.
    pub const fn uniform(cost: u64) -> Self {
        Self {
            source: Source::Uniform(cost),
        }
    }
}

impl CostMatrixProvider for FixedMatrixProvider {
    fn cost_matrix(
        &self,
        locations: &[Location],
        kind: MatrixKind,
    ) -> Result<CostMatrix, MatrixError> {
        if locations.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        match &self.source {
            Source::Fixed { distance, time } => Ok(match kind {
                MatrixKind::Distance => distance.clone(),
                MatrixKind::Time => time.clone(),
            }),
            Source::Uniform(cost) => {
                let size = NonZeroUsize::new(locations.len()).ok_or(MatrixError::EmptyInput)?;
                Ok(CostMatrix::from_fn(size, |from, to| {
                    if from == to { 0 } else { *cost }
                }))
            }
        }
    }
}

/// The four-location symmetric matrix used throughout the examples.
///
/// A single vehicle from depot 0 visits it optimally as `[0, 1, 3, 2, 0]`
/// at a distance of 80.
pub fn four_city_matrix() -> CostMatrix {
    square_matrix(&[
        &[0, 10, 15, 20],
        &[10, 0, 35, 25],
        &[15, 35, 0, 30],
        &[20, 25, 30, 0],
    ])
}

/// Build a matrix from literal rows.
///
/// # Panics
///
/// Panics if `rows` is empty or not square.
pub fn square_matrix(rows: &[&[u64]]) -> CostMatrix {
    CostMatrix::from_rows(
        rows.iter().map(|row| row.to_vec()).collect(),
        MatrixKind::Distance,
    )
    .expect("literal matrix should be square")
}

/// `n` locations on a line, one degree apart.
pub fn line_of_locations(n: usize) -> Vec<Location> {
    (0..n)
        .map(|i| Location::new(0.0, f64::from(u32::try_from(i).unwrap_or(u32::MAX))))
        .collect()
}
