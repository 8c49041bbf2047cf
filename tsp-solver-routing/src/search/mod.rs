//! Route search: a deterministic construction heuristic followed by an
//! optional, bounded local search.

mod construction;
mod local;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::debug;
use thiserror::Error;
use tsp_solver_core::{Cancellation, SolveError};

use crate::{Assignment, RoutingModel};

pub use construction::construct;
pub use local::improve;

/// Where construction may insert the next location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstSolutionStrategy {
    /// Grow every route as a path: only the position before the closing depot
    /// is considered.
    #[default]
    PathCheapestArc,
    /// Consider every position between consecutive route nodes.
    GlobalCheapestInsertion,
}

impl FirstSolutionStrategy {
    /// Name used on the command line and in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PathCheapestArc => "path-cheapest-arc",
            Self::GlobalCheapestInsertion => "global-cheapest-insertion",
        }
    }
}

impl fmt::Display for FirstSolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown first solution strategy {0:?}; expected path-cheapest-arc or global-cheapest-insertion"
)]
pub struct UnknownStrategy(pub String);

impl FromStr for FirstSolutionStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "path-cheapest-arc" => Ok(Self::PathCheapestArc),
            "global-cheapest-insertion" => Ok(Self::GlobalCheapestInsertion),
            _ => Err(UnknownStrategy(s.to_owned())),
        }
    }
}

/// Configuration for [`solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParameters {
    /// Construction strategy.
    pub first_solution_strategy: FirstSolutionStrategy,
    /// Whether to refine the constructed routes.
    pub local_search: bool,
    /// Upper bound on accepted local-search moves.
    pub max_iterations: usize,
    /// Wall-clock budget for local search. Running out keeps the best routes
    /// found so far.
    pub time_limit: Option<Duration>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            first_solution_strategy: FirstSolutionStrategy::default(),
            local_search: true,
            max_iterations: 1000,
            time_limit: None,
        }
    }
}

/// Construct routes for every location and, if enabled, improve them.
///
/// # Errors
///
/// Returns [`SolveError::NoFeasibleSolution`] when construction cannot place
/// every location and [`SolveError::Cancelled`] once `cancellation` fires.
pub fn solve(
    model: &RoutingModel,
    parameters: &SearchParameters,
    cancellation: &Cancellation,
) -> Result<Assignment, SolveError> {
    cancellation.check()?;
    let initial = construct(model, parameters.first_solution_strategy, cancellation)?;
    if !parameters.local_search {
        return Ok(initial);
    }
    let improved = improve(model, initial, parameters, cancellation)?;
    debug!(
        "search finished: {} locations on {} vehicles",
        improved.visit_count(),
        model.num_vehicles()
    );
    Ok(improved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("path-cheapest-arc", FirstSolutionStrategy::PathCheapestArc)]
    #[case("PATH_CHEAPEST_ARC", FirstSolutionStrategy::PathCheapestArc)]
    #[case(" global-cheapest-insertion ", FirstSolutionStrategy::GlobalCheapestInsertion)]
    fn parses_strategy_names(#[case] input: &str, #[case] expected: FirstSolutionStrategy) {
        assert_eq!(input.parse::<FirstSolutionStrategy>(), Ok(expected));
        assert_eq!(expected.to_string().parse::<FirstSolutionStrategy>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_strategy() {
        let err = "savings"
            .parse::<FirstSolutionStrategy>()
            .expect_err("unknown strategy");
        assert!(err.to_string().contains("savings"));
    }

    #[rstest]
    fn defaults_bound_local_search() {
        let parameters = SearchParameters::default();
        assert!(parameters.local_search);
        assert_eq!(parameters.max_iterations, 1000);
        assert_eq!(
            parameters.first_solution_strategy,
            FirstSolutionStrategy::PathCheapestArc
        );
    }
}
