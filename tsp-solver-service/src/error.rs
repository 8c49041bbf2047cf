//! Error types emitted by the tsp-solver service.
//!
//! Failures to solve an individual request never surface here: the dispatcher
//! turns them into response envelopes. These errors stop the whole run.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use tsp_solver_routing::UnknownStrategy;

/// Errors emitted by the tsp-solver service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A numeric option that must be positive was zero.
    #[error("{field} must be greater than zero")]
    ZeroSetting {
        /// Option name.
        field: &'static str,
    },
    /// The configured construction strategy is not known.
    #[error(transparent)]
    InvalidStrategy(#[from] UnknownStrategy),
    /// The request path does not exist.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The request path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The request path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the request file failed.
    #[error("failed to open solve request at {path:?}: {source}")]
    OpenSolveRequest {
        /// Request file.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The request file is not a sequence of JSON values.
    #[error("failed to parse solve request JSON at {path:?}: {source}")]
    ParseSolveRequest {
        /// Request file.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The worker pool for a batch could not be started.
    #[error("failed to start the solver worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    /// Creating the output file failed.
    #[error("failed to create output file at {path:?}: {source}")]
    CreateOutput {
        /// Output file.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Serializing a response envelope failed.
    #[error("failed to serialize response envelope: {0}")]
    SerializeResponse(#[source] serde_json::Error),
    /// Writing a response envelope failed.
    #[error("failed to write response output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
