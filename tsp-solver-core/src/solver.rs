use crate::{Cancellation, ProblemSolution, SolveError, SolveRequest};

/// Answer routing requests.
///
/// Implementations validate the request before searching and return
/// [`SolveError::Validation`] for malformed input rather than panicking.
/// Solvers must be `Send + Sync` so a batch can share one across worker
/// threads.
pub trait Solver: Send + Sync {
    /// Solve `request`, giving up with [`SolveError::Cancelled`] once
    /// `cancellation` fires.
    fn solve(
        &self,
        request: &SolveRequest,
        cancellation: &Cancellation,
    ) -> Result<ProblemSolution, SolveError>;
}
