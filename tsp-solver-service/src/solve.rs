//! `solve` command: read requests, answer them and publish the envelopes.

use std::io::{BufReader, BufWriter, Write};
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tsp_solver_core::Solver;
use tsp_solver_routing::{FirstSolutionStrategy, RoutingSolver, SearchParameters};

use crate::fs::{create_utf8_file, file_is_file, open_utf8_file};
use crate::{
    ARG_SOLVE_DISTANCE_SCALE, ARG_SOLVE_LOCAL_SEARCH, ARG_SOLVE_MAX_ITERATIONS, ARG_SOLVE_OUTPUT,
    ARG_SOLVE_REQUEST, ARG_SOLVE_REQUEST_TIMEOUT, ARG_SOLVE_STRATEGY, ARG_SOLVE_TIME_LIMIT,
    ARG_SOLVE_VEHICLE_SPEED, ARG_SOLVE_WORKERS, DEFAULT_DISTANCE_SCALE, DEFAULT_VEHICLE_SPEED,
    Dispatcher, ENV_SOLVE_REQUEST, EuclideanMatrixProvider, JsonLinesSink, ResponseEnvelope,
    ResponseSink, ServiceError,
};

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Solve VRP, TSP and VRPTW requests read from a JSON file. \
                 The file may hold a single request, an array of requests \
                 or one request per line. Every request is answered with a \
                 response envelope written as one line of JSON.",
    about = "Solve routing requests from a JSON file"
)]
#[ortho_config(prefix = "TSP_SOLVER")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing the requests.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Write envelopes to this file instead of standard output.
    #[arg(long = ARG_SOLVE_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Number of requests solved in parallel (defaults to the core count).
    #[arg(long = ARG_SOLVE_WORKERS, value_name = "count")]
    #[serde(default)]
    pub(crate) workers: Option<usize>,
    /// Upper bound on accepted local-search moves per request.
    #[arg(long = ARG_SOLVE_MAX_ITERATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_iterations: Option<usize>,
    /// Local-search budget per request, in milliseconds.
    #[arg(long = ARG_SOLVE_TIME_LIMIT, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_limit_ms: Option<u64>,
    /// Cancel a request still solving after this many milliseconds.
    #[arg(long = ARG_SOLVE_REQUEST_TIMEOUT, value_name = "ms")]
    #[serde(default)]
    pub(crate) request_timeout_ms: Option<u64>,
    /// Whether to refine constructed routes with local search.
    #[arg(long = ARG_SOLVE_LOCAL_SEARCH, value_name = "bool")]
    #[serde(default)]
    pub(crate) local_search: Option<bool>,
    /// Construction strategy: path-cheapest-arc or global-cheapest-insertion.
    #[arg(long = ARG_SOLVE_STRATEGY, value_name = "name")]
    #[serde(default)]
    pub(crate) strategy: Option<String>,
    /// Factor applied to coordinate distances.
    #[arg(long = ARG_SOLVE_DISTANCE_SCALE, value_name = "factor")]
    #[serde(default)]
    pub(crate) distance_scale: Option<u32>,
    /// Scaled distance a vehicle covers per unit of time.
    #[arg(long = ARG_SOLVE_VEHICLE_SPEED, value_name = "speed")]
    #[serde(default)]
    pub(crate) vehicle_speed: Option<u32>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, ServiceError> {
        let merged = self.load_and_merge().map_err(ServiceError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Output file; standard output when absent.
    pub(crate) output: Option<Utf8PathBuf>,
    /// Worker pool size; the core count when absent.
    pub(crate) workers: Option<NonZeroUsize>,
    /// Per-request cancellation deadline.
    pub(crate) request_timeout: Option<Duration>,
    /// Search parameters shared by every request.
    pub(crate) search: SearchParameters,
    /// Matrix provider shared by every request.
    pub(crate) provider: EuclideanMatrixProvider,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), ServiceError> {
        let path = &self.request_path;
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ServiceError::SourcePathNotFile {
                field: ARG_SOLVE_REQUEST,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(ServiceError::MissingSourceFile {
                    field: ARG_SOLVE_REQUEST,
                    path: path.clone(),
                })
            }
            Err(source) => Err(ServiceError::InspectSourcePath {
                field: ARG_SOLVE_REQUEST,
                path: path.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = ServiceError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(ServiceError::MissingArgument {
            field: ARG_SOLVE_REQUEST,
            env: ENV_SOLVE_REQUEST,
        })?;

        let workers = match args.workers {
            Some(count) => Some(
                NonZeroUsize::new(count).ok_or(ServiceError::ZeroSetting {
                    field: ARG_SOLVE_WORKERS,
                })?,
            ),
            None => None,
        };
        let vehicle_speed = NonZeroU32::new(args.vehicle_speed.unwrap_or(DEFAULT_VEHICLE_SPEED))
            .ok_or(ServiceError::ZeroSetting {
                field: ARG_SOLVE_VEHICLE_SPEED,
            })?;
        let provider = EuclideanMatrixProvider::new(
            args.distance_scale.unwrap_or(DEFAULT_DISTANCE_SCALE),
            vehicle_speed,
        );

        let defaults = SearchParameters::default();
        let first_solution_strategy = match args.strategy.as_deref() {
            Some(name) => name.parse::<FirstSolutionStrategy>()?,
            None => defaults.first_solution_strategy,
        };
        let search = SearchParameters {
            first_solution_strategy,
            local_search: args.local_search.unwrap_or(defaults.local_search),
            max_iterations: args.max_iterations.unwrap_or(defaults.max_iterations),
            time_limit: args
                .time_limit_ms
                .map(Duration::from_millis)
                .or(defaults.time_limit),
        };

        Ok(Self {
            request_path,
            output: args.output,
            workers,
            request_timeout: args.request_timeout_ms.map(Duration::from_millis),
            search,
            provider,
        })
    }
}

/// Builds the solver answering one `solve` invocation.
pub(super) trait SolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Box<dyn Solver>;
}

pub(super) struct RoutingSolverBuilder;

impl SolveSolverBuilder for RoutingSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Box<dyn Solver> {
        Box::new(RoutingSolver::with_parameters(
            config.provider,
            config.search.clone(),
        ))
    }
}

pub(super) fn run_solve(args: SolveArgs) -> Result<(), ServiceError> {
    let mut stdout = std::io::stdout().lock();
    run_solve_with(args, &RoutingSolverBuilder, &mut stdout)
}

/// Answer every request named by `args`, writing envelopes to the configured
/// output or to `stdout`.
pub(super) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolveSolverBuilder,
    stdout: &mut dyn Write,
) -> Result<(), ServiceError> {
    let config = resolve_solve_config(args)?;
    let envelopes = answer_requests(&config, builder)?;
    match &config.output {
        Some(path) => {
            let file = create_utf8_file(path).map_err(|source| ServiceError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            publish_all(&mut JsonLinesSink::new(BufWriter::new(file)), &envelopes)
        }
        None => publish_all(&mut JsonLinesSink::new(stdout), &envelopes),
    }
}

fn resolve_solve_config(args: SolveArgs) -> Result<SolveConfig, ServiceError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn answer_requests(
    config: &SolveConfig,
    builder: &dyn SolveSolverBuilder,
) -> Result<Vec<ResponseEnvelope>, ServiceError> {
    let messages = load_requests(&config.request_path)?;
    let dispatcher = Dispatcher::new(builder.build(config));
    let dispatcher = match config.request_timeout {
        Some(timeout) => dispatcher.with_request_timeout(timeout),
        None => dispatcher,
    };
    let envelopes = dispatcher.dispatch_batch(&messages, config.workers)?;
    let solved = envelopes.iter().filter(|e| e.is_success()).count();
    info!(
        "answered {} request(s) from {}, {solved} solved",
        envelopes.len(),
        config.request_path
    );
    Ok(envelopes)
}

fn publish_all(
    sink: &mut dyn ResponseSink,
    envelopes: &[ResponseEnvelope],
) -> Result<(), ServiceError> {
    for envelope in envelopes {
        sink.publish(envelope)?;
    }
    sink.flush()
}

/// Loads every JSON value in the request file; top-level arrays are
/// flattened into their elements.
pub(super) fn load_requests(path: &Utf8Path) -> Result<Vec<Value>, ServiceError> {
    let file = open_utf8_file(path).map_err(|source| ServiceError::OpenSolveRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let values = serde_json::Deserializer::from_reader(BufReader::new(file))
        .into_iter::<Value>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ServiceError::ParseSolveRequest {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(values
        .into_iter()
        .flat_map(|value| match value {
            Value::Array(items) => items,
            other => vec![other],
        })
        .collect())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, ServiceError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(ServiceError::from)?;
    SolveConfig::try_from(merged)
}
