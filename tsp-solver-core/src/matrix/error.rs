use thiserror::Error;

/// Errors from [`crate::matrix::CostMatrixProvider::cost_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// No locations were provided.
    ///
    /// A matrix needs at least the depot. Callers should reject empty
    /// location lists before asking for a matrix.
    #[error("at least one location is required to build a cost matrix")]
    EmptyInput,
    /// A coordinate was NaN or infinite.
    #[error("location {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position of the offending location.
        index: usize,
    },
}
