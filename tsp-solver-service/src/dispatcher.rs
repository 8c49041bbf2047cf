//! Route raw request messages to a solver and wrap every outcome in an
//! envelope.

use std::num::NonZeroUsize;
use std::time::Duration;

use log::{info, warn};
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use tsp_solver_core::{Cancellation, ProblemKind, SolveRequest, Solver};

use crate::envelope::{BAD_REQUEST, ResponseEnvelope, UNSUPPORTED_MESSAGE_TYPE};
use crate::ServiceError;

/// Answers raw JSON requests with response envelopes.
///
/// Every message gets an envelope: unknown message types and malformed
/// payloads are answered with [`BAD_REQUEST`], solver failures with the code
/// from [`status_code`](crate::status_code).
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tsp_solver_routing::RoutingSolver;
/// use tsp_solver_service::{Dispatcher, EuclideanMatrixProvider, OK};
///
/// let solver = RoutingSolver::new(EuclideanMatrixProvider::default());
/// let dispatcher = Dispatcher::new(Box::new(solver));
/// let envelope = dispatcher.dispatch(&json!({
///     "message_type": "TSP",
///     "id": "tour",
///     "locations": [
///         {"latitude": 0.0, "longitude": 0.0},
///         {"latitude": 0.0, "longitude": 1.0}
///     ],
///     "depot": 0,
///     "num_vehicles": 1,
///     "max_distance": 1000,
///     "cost_coefficient": 0
/// }));
/// assert_eq!(envelope.code, OK);
/// assert_eq!(envelope.id.as_deref(), Some("tour"));
/// ```
pub struct Dispatcher {
    solver: Box<dyn Solver>,
    request_timeout: Option<Duration>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("solver", &"<dyn Solver>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Dispatcher {
    /// Dispatch to `solver` with no per-request deadline.
    #[must_use]
    pub fn new(solver: Box<dyn Solver>) -> Self {
        Self {
            solver,
            request_timeout: None,
        }
    }

    /// Cancel any solve still running `timeout` after it started.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Answer one request message.
    pub fn dispatch(&self, message: &Value) -> ResponseEnvelope {
        let id = message_id(message);
        let Some(kind) = message
            .get("message_type")
            .and_then(Value::as_str)
            .and_then(supported_kind)
        else {
            warn!(
                "Rejected request with id {}: {UNSUPPORTED_MESSAGE_TYPE}",
                display_id(id.as_deref())
            );
            return ResponseEnvelope::failure(id, BAD_REQUEST, UNSUPPORTED_MESSAGE_TYPE);
        };

        let request = match SolveRequest::deserialize(message) {
            Ok(request) => request,
            Err(err) => {
                warn!(
                    "Rejected malformed {kind} request with id {}: {err}",
                    display_id(id.as_deref())
                );
                return ResponseEnvelope::failure(id, BAD_REQUEST, err.to_string());
            }
        };

        let envelope = match self.solver.solve(&request, &self.cancellation()) {
            Ok(solution) => ResponseEnvelope::success(id, solution),
            Err(err) => {
                warn!("{kind} request with id {} failed: {err}", request.id());
                ResponseEnvelope::from_error(id, &err)
            }
        };
        info!("Incoming {kind} request with id {} processed", request.id());
        envelope
    }

    /// Answer every message, solving up to `workers` at once.
    ///
    /// Envelopes come back in message order. `None` sizes the pool to the
    /// available cores.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::WorkerPool`] when the thread pool cannot be
    /// started.
    pub fn dispatch_batch(
        &self,
        messages: &[Value],
        workers: Option<NonZeroUsize>,
    ) -> Result<Vec<ResponseEnvelope>, ServiceError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.map_or(0, NonZeroUsize::get))
            .build()?;
        Ok(pool.install(|| {
            messages
                .par_iter()
                .map(|message| self.dispatch(message))
                .collect()
        }))
    }

    fn cancellation(&self) -> Cancellation {
        let cancellation = Cancellation::new();
        match self.request_timeout {
            Some(timeout) => cancellation.with_timeout(timeout),
            None => cancellation,
        }
    }
}

fn supported_kind(message_type: &str) -> Option<ProblemKind> {
    match message_type {
        "VRP" => Some(ProblemKind::Vrp),
        "TSP" => Some(ProblemKind::Tsp),
        "VRPTW" => Some(ProblemKind::Vrptw),
        _ => None,
    }
}

/// The request's `id`, rendered as text when it is a number.
fn message_id(message: &Value) -> Option<String> {
    match message.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn display_id(id: Option<&str>) -> &str {
    id.unwrap_or("<none>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{NOT_FOUND, OK, REQUEST_TIMEOUT};
    use rstest::{fixture, rstest};
    use serde_json::json;
    use tsp_solver_core::{ProblemSolution, SolveError, VrpSolution};

    /// Answers VRP requests and fails everything else with a fixed error.
    struct ScriptedSolver {
        failure: SolveError,
    }

    impl Solver for ScriptedSolver {
        fn solve(
            &self,
            request: &SolveRequest,
            cancellation: &Cancellation,
        ) -> Result<ProblemSolution, SolveError> {
            cancellation.check()?;
            match request {
                SolveRequest::Vrp(vrp) | SolveRequest::Tsp(vrp) => {
                    vrp.parameters()?;
                    Ok(VrpSolution::default().into())
                }
                SolveRequest::Vrptw(_) => Err(self.failure.clone()),
            }
        }
    }

    #[fixture]
    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Box::new(ScriptedSolver {
            failure: SolveError::NoFeasibleSolution { unrouted: 1 },
        }))
    }

    fn vrp_message(message_type: &str, id: Value, depot: i64) -> Value {
        json!({
            "message_type": message_type,
            "id": id,
            "locations": [{"latitude": 0.0, "longitude": 0.0}],
            "depot": depot,
            "num_vehicles": 1,
            "max_distance": 100,
            "cost_coefficient": 1
        })
    }

    fn vrptw_message() -> Value {
        json!({
            "message_type": "VRPTW",
            "id": "tw",
            "locations": [{"latitude": 0.0, "longitude": 0.0}],
            "depot": 0,
            "num_vehicles": 1,
            "time_windows": [[0, 10]],
            "wait_time": 5,
            "max_time_vehicle": 20
        })
    }

    #[rstest]
    #[case("VRP")]
    #[case("TSP")]
    fn answers_vrp_and_tsp(dispatcher: Dispatcher, #[case] message_type: &str) {
        let envelope = dispatcher.dispatch(&vrp_message(message_type, json!("r-1"), 0));
        assert_eq!(envelope.code, OK);
        assert_eq!(envelope.id.as_deref(), Some("r-1"));
        assert_eq!(
            envelope.solution,
            Some(ProblemSolution::Vrp(VrpSolution::default()))
        );
    }

    #[rstest]
    #[case(json!({"message_type": "CVRP", "id": "x"}))]
    #[case(json!({"id": "x"}))]
    #[case(json!({"message_type": 7, "id": "x"}))]
    fn rejects_unsupported_message_types(dispatcher: Dispatcher, #[case] message: Value) {
        let envelope = dispatcher.dispatch(&message);
        assert_eq!(
            envelope,
            ResponseEnvelope::failure(Some("x".into()), BAD_REQUEST, UNSUPPORTED_MESSAGE_TYPE)
        );
    }

    #[rstest]
    fn malformed_payload_is_a_bad_request(dispatcher: Dispatcher) {
        let envelope = dispatcher.dispatch(&json!({"message_type": "VRP", "id": "short"}));
        assert_eq!(envelope.code, BAD_REQUEST);
        assert_eq!(envelope.id.as_deref(), Some("short"));
        assert!(envelope.solution.is_none());
    }

    #[rstest]
    fn validation_failures_keep_their_message(dispatcher: Dispatcher) {
        let envelope = dispatcher.dispatch(&vrp_message("VRP", json!("neg"), -1));
        assert_eq!(envelope.code, BAD_REQUEST);
        assert_eq!(
            envelope.message,
            "depot should be greater than or equal to zero."
        );
    }

    #[rstest]
    fn infeasible_requests_are_not_found(dispatcher: Dispatcher) {
        let envelope = dispatcher.dispatch(&vrptw_message());
        assert_eq!(envelope.code, NOT_FOUND);
        assert_eq!(envelope.id.as_deref(), Some("tw"));
    }

    #[rstest]
    fn elapsed_request_timeout_is_reported() {
        let dispatcher = Dispatcher::new(Box::new(ScriptedSolver {
            failure: SolveError::Cancelled,
        }))
        .with_request_timeout(Duration::ZERO);
        let envelope = dispatcher.dispatch(&vrp_message("VRP", json!("late"), 0));
        assert_eq!(envelope.code, REQUEST_TIMEOUT);
    }

    #[rstest]
    fn numeric_ids_are_echoed_as_text(dispatcher: Dispatcher) {
        let envelope = dispatcher.dispatch(&vrp_message("VRP", json!(42), 0));
        assert_eq!(envelope.id.as_deref(), Some("42"));
    }

    #[rstest]
    fn batches_keep_message_order(dispatcher: Dispatcher) {
        let messages = vec![
            vrp_message("VRP", json!("first"), 0),
            json!({"message_type": "CVRP", "id": "second"}),
            vrptw_message(),
            vrp_message("TSP", json!("fourth"), 0),
        ];
        let envelopes = dispatcher
            .dispatch_batch(&messages, NonZeroUsize::new(2))
            .expect("worker pool");
        let summary: Vec<(Option<&str>, u16)> = envelopes
            .iter()
            .map(|envelope| (envelope.id.as_deref(), envelope.code))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some("first"), OK),
                (Some("second"), BAD_REQUEST),
                (Some("tw"), NOT_FOUND),
                (Some("fourth"), OK),
            ]
        );
    }
}
