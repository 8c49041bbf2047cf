//! Response envelopes: the answer to every request, successful or not.

use serde::{Deserialize, Serialize};
use tsp_solver_core::{ProblemSolution, SolveError};

/// The request was solved.
pub const OK: u16 = 200;
/// The request was malformed, failed validation or named an unsupported
/// message type.
pub const BAD_REQUEST: u16 = 400;
/// No route plan satisfies the request's constraints.
pub const NOT_FOUND: u16 = 404;
/// The solve was cancelled before it finished.
pub const REQUEST_TIMEOUT: u16 = 408;

/// Message accompanying every successful envelope.
pub const SUCCESS_MESSAGE: &str = "Operation successful.";
/// Message for a request whose `message_type` is missing or unknown.
pub const UNSUPPORTED_MESSAGE_TYPE: &str = "Not supported message type.";

/// Response published for one request.
///
/// `solution` is present exactly when `code` is [`OK`].
///
/// # Examples
///
/// ```
/// use tsp_solver_core::VrpSolution;
/// use tsp_solver_service::{OK, ResponseEnvelope};
///
/// let envelope = ResponseEnvelope::success(Some("r-1".into()), VrpSolution::default().into());
/// assert_eq!(envelope.code, OK);
/// assert_eq!(envelope.message, "Operation successful.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Correlation id copied from the request, if it carried one.
    pub id: Option<String>,
    /// Routes found for the request.
    pub solution: Option<ProblemSolution>,
    /// HTTP-style status code.
    pub code: u16,
    /// Human-readable outcome.
    pub message: String,
}

impl ResponseEnvelope {
    /// Envelope for a solved request.
    #[must_use]
    pub fn success(id: Option<String>, solution: ProblemSolution) -> Self {
        Self {
            id,
            solution: Some(solution),
            code: OK,
            message: SUCCESS_MESSAGE.to_owned(),
        }
    }

    /// Envelope for a request that produced no solution.
    #[must_use]
    pub fn failure(id: Option<String>, code: u16, message: impl Into<String>) -> Self {
        Self {
            id,
            solution: None,
            code,
            message: message.into(),
        }
    }

    /// Envelope reporting `error` with its [`status_code`].
    #[must_use]
    pub fn from_error(id: Option<String>, error: &SolveError) -> Self {
        Self::failure(id, status_code(error), error.to_string())
    }

    /// Whether the request was solved.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == OK
    }
}

/// Status code reported for a failed solve.
///
/// Validation and matrix failures are the caller's fault ([`BAD_REQUEST`]);
/// an infeasible instance is [`NOT_FOUND`]; a cancelled solve is
/// [`REQUEST_TIMEOUT`].
#[must_use]
pub const fn status_code(error: &SolveError) -> u16 {
    match error {
        SolveError::Validation(_) | SolveError::Matrix(_) => BAD_REQUEST,
        SolveError::NoFeasibleSolution { .. } => NOT_FOUND,
        SolveError::Cancelled => REQUEST_TIMEOUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use tsp_solver_core::{MatrixError, ValidationError, VrpRoute, VrpSolution};

    #[rstest]
    #[case(SolveError::Validation(ValidationError::NegativeDepot), BAD_REQUEST)]
    #[case(SolveError::Matrix(MatrixError::EmptyInput), BAD_REQUEST)]
    #[case(SolveError::NoFeasibleSolution { unrouted: 2 }, NOT_FOUND)]
    #[case(SolveError::Cancelled, REQUEST_TIMEOUT)]
    fn classifies_solve_errors(#[case] error: SolveError, #[case] expected: u16) {
        assert_eq!(status_code(&error), expected);
    }

    #[rstest]
    fn failure_carries_the_error_message() {
        let error = SolveError::Validation(ValidationError::NegativeDepot);
        let envelope = ResponseEnvelope::from_error(Some("neg".into()), &error);
        assert_eq!(envelope.code, BAD_REQUEST);
        assert_eq!(
            envelope.message,
            "depot should be greater than or equal to zero."
        );
        assert!(envelope.solution.is_none());
        assert!(!envelope.is_success());
    }

    #[rstest]
    fn serializes_with_the_wire_field_names() {
        let solution = VrpSolution {
            routes: vec![VrpRoute {
                route: vec![0, 1, 0],
                vehicle: 0,
                distance: 20,
            }],
            max_route_distance: 20,
        };
        let envelope = ResponseEnvelope::success(Some("r-7".into()), solution.into());
        let value = serde_json::to_value(&envelope).expect("serialize envelope");
        assert_eq!(
            value,
            json!({
                "id": "r-7",
                "solution": {
                    "routes": [{"route": [0, 1, 0], "vehicle": 0, "distance": 20}],
                    "max_route_distance": 20
                },
                "code": 200,
                "message": "Operation successful."
            })
        );
    }

    #[rstest]
    fn unsupported_type_envelope_has_no_solution() {
        let envelope = ResponseEnvelope::failure(None, BAD_REQUEST, UNSUPPORTED_MESSAGE_TYPE);
        let value = serde_json::to_value(&envelope).expect("serialize envelope");
        assert_eq!(
            value,
            json!({
                "id": null,
                "solution": null,
                "code": 400,
                "message": "Not supported message type."
            })
        );
    }
}
