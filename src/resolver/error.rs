//! Error types for upstream resolution.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure modes of a single resolution attempt.
///
/// None of these are retried; each is terminal for the request it occurred
/// in and has no effect on other in-flight requests.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The lookup call failed to complete (transport error or timeout).
    #[error("lookup service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The lookup service answered with a non-200 status.
    #[error("resource not resolvable: lookup returned {status}")]
    Rejected { status: StatusCode },

    /// The lookup body was not a usable redirect URL. This indicates a
    /// contract violation by a trusted peer and is logged at error severity.
    #[error("malformed lookup response: {reason}")]
    Malformed { reason: String },
}

impl ResolveError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Stable label for metrics.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::Rejected { .. } => "rejected",
            Self::Malformed { .. } => "malformed",
        }
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unreachable(_) => StatusCode::BAD_GATEWAY,
            Self::Rejected { .. } => StatusCode::BAD_REQUEST,
            Self::Malformed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
