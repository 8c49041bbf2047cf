//! Request handling for the tsp-solver routing engine.
//!
//! Solve requests arrive as JSON values tagged with a `message_type`. The
//! [`Dispatcher`] answers each one with a [`ResponseEnvelope`] carrying a
//! status code, and a [`ResponseSink`] publishes the envelopes. The
//! `tsp-solver` binary reads requests from a file and writes one envelope
//! per line.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod dispatcher;
mod envelope;
mod error;
mod fs;
mod provider;
mod sink;
mod solve;

pub use dispatcher::Dispatcher;
pub use envelope::{
    BAD_REQUEST, NOT_FOUND, OK, REQUEST_TIMEOUT, ResponseEnvelope, SUCCESS_MESSAGE,
    UNSUPPORTED_MESSAGE_TYPE, status_code,
};
pub use error::ServiceError;
pub use provider::{DEFAULT_DISTANCE_SCALE, DEFAULT_VEHICLE_SPEED, EuclideanMatrixProvider};
pub use sink::{JsonLinesSink, ResponseSink};

pub(crate) const ARG_SOLVE_REQUEST: &str = "request-path";
pub(crate) const ENV_SOLVE_REQUEST: &str = "TSP_SOLVER_CMDS_SOLVE_REQUEST_PATH";
pub(crate) const ARG_SOLVE_OUTPUT: &str = "output";
pub(crate) const ARG_SOLVE_WORKERS: &str = "workers";
pub(crate) const ARG_SOLVE_MAX_ITERATIONS: &str = "max-iterations";
pub(crate) const ARG_SOLVE_TIME_LIMIT: &str = "time-limit-ms";
pub(crate) const ARG_SOLVE_REQUEST_TIMEOUT: &str = "request-timeout-ms";
pub(crate) const ARG_SOLVE_LOCAL_SEARCH: &str = "local-search";
pub(crate) const ARG_SOLVE_STRATEGY: &str = "strategy";
pub(crate) const ARG_SOLVE_DISTANCE_SCALE: &str = "distance-scale";
pub(crate) const ARG_SOLVE_VEHICLE_SPEED: &str = "vehicle-speed";

/// Run the `tsp-solver` CLI with the current process arguments and
/// environment.
///
/// # Errors
///
/// Returns a [`ServiceError`] when arguments or configuration are invalid,
/// the request file cannot be read or decoded, or the responses cannot be
/// written. Requests that fail to solve are answered, not reported here.
pub fn run() -> Result<(), ServiceError> {
    let cli = Cli::try_parse().map_err(ServiceError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => solve::run_solve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tsp-solver",
    about = "Answer VRP, TSP and VRPTW routing requests",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Solve the routing requests held in a JSON file.
    Solve(solve::SolveArgs),
}

#[cfg(test)]
mod tests;
