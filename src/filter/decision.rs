//! Per-request filter outcomes and the responses they map to.

use std::fmt;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};

use super::error::BodyReadError;

/// Body returned when no custom rejection message is configured.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Request blocked";

/// Body returned when the request body cannot be read.
pub const BODY_READ_ERROR_MESSAGE: &str = "Error reading request body";

/// Which part of the request a pattern matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Path,
    Body,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Path => "path",
            Target::Body => "body",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub target: Target,
    /// Position of the matching pattern in the configured list.
    pub pattern_index: usize,
    pub pattern: String,
}

/// Outcome of evaluating one request.
#[derive(Debug)]
pub enum Decision {
    /// Hand the request to the next service. If the body was inspected it
    /// has been replaced with an equivalent in-memory body.
    Forward(Request<Body>),
    Reject(Rejection),
}

impl Decision {
    pub fn is_forward(&self) -> bool {
        matches!(self, Decision::Forward(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Decision::Reject(r) => Some(r),
            Decision::Forward(_) => None,
        }
    }
}

/// Build the 403 response for a rejected request.
pub fn rejection_response(message: &str) -> Response {
    plain_text(StatusCode::FORBIDDEN, message)
}

impl IntoResponse for BodyReadError {
    fn into_response(self) -> Response {
        plain_text(StatusCode::INTERNAL_SERVER_ERROR, BODY_READ_ERROR_MESSAGE)
    }
}

// Newline-terminated, matching what the filter has always sent.
fn plain_text(status: StatusCode, message: &str) -> Response {
    let mut response = Response::new(Body::from(format!("{message}\n")));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejection_response_shape() {
        let response = rejection_response("Access Denied");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Access Denied\n");
    }

    #[tokio::test]
    async fn test_body_read_error_is_500() {
        let err = BodyReadError(axum::Error::new(std::io::Error::other("reset")));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Error reading request body\n");
    }
}
