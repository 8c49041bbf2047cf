//! [`RoutingSolver`]: the [`Solver`] implementation backed by this crate's
//! search.

use log::debug;
use tsp_solver_core::{
    Cancellation, CostMatrixProvider, MatrixKind, ProblemSolution, SolveError, SolveRequest,
    Solver, VrpRequest, VrptwRequest,
};

use crate::search::SearchParameters;
use crate::vrp::{VrpProblem, solve_vrp};
use crate::vrptw::{VrptwProblem, solve_vrptw};

/// Answers `VRP`, `TSP` and `VRPTW` requests.
///
/// The solver is generic over the matrix boundary: the provider turns the
/// request's locations into distance or travel-time costs. Request scalars
/// are validated before the provider is consulted.
#[derive(Debug, Clone)]
pub struct RoutingSolver<P>
where
    P: CostMatrixProvider,
{
    provider: P,
    parameters: SearchParameters,
}

impl<P> RoutingSolver<P>
where
    P: CostMatrixProvider,
{
    /// Construct a solver using default search parameters.
    pub fn new(provider: P) -> Self {
        Self::with_parameters(provider, SearchParameters::default())
    }

    /// Construct a solver with explicit search parameters.
    pub const fn with_parameters(provider: P, parameters: SearchParameters) -> Self {
        Self {
            provider,
            parameters,
        }
    }

    /// Search parameters applied to every request.
    #[must_use]
    pub const fn parameters(&self) -> &SearchParameters {
        &self.parameters
    }

    fn solve_vrp_request(
        &self,
        request: &VrpRequest,
        cancellation: &Cancellation,
    ) -> Result<ProblemSolution, SolveError> {
        let parameters = request.parameters()?;
        let matrix = self
            .provider
            .cost_matrix(&request.locations, MatrixKind::Distance)?;
        let problem = VrpProblem::new(matrix, parameters);
        solve_vrp(&problem, &self.parameters, cancellation).map(ProblemSolution::from)
    }

    fn solve_vrptw_request(
        &self,
        request: &VrptwRequest,
        cancellation: &Cancellation,
    ) -> Result<ProblemSolution, SolveError> {
        let parameters = request.parameters()?;
        let matrix = self
            .provider
            .cost_matrix(&request.locations, MatrixKind::Time)?;
        let problem = VrptwProblem::new(matrix, parameters)?;
        solve_vrptw(&problem, &self.parameters, cancellation).map(ProblemSolution::from)
    }
}

impl<P> Solver for RoutingSolver<P>
where
    P: CostMatrixProvider,
{
    fn solve(
        &self,
        request: &SolveRequest,
        cancellation: &Cancellation,
    ) -> Result<ProblemSolution, SolveError> {
        cancellation.check()?;
        debug!(
            "solving {} request {} over {} locations",
            request.kind(),
            request.id(),
            request.locations().len()
        );
        match request {
            SolveRequest::Vrp(vrp) | SolveRequest::Tsp(vrp) => {
                self.solve_vrp_request(vrp, cancellation)
            }
            SolveRequest::Vrptw(vrptw) => self.solve_vrptw_request(vrptw, cancellation),
        }
    }
}
