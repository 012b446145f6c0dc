//! Error types for the hycore library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, decoding, task, and query errors, so
//! callers can distinguish a network problem from a remote task failure
//! or a caller-side logic bug.

use std::fmt;
use thiserror::Error;

/// The unified error type for hycore operations.
///
/// Every failure mode of the client surfaces as one of these variants.
/// The client itself never retries or suppresses an error; classification
/// is the caller's tool for deciding whether to abort or merely warn.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (login rejected, unusable session token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The cluster answered with an unexpected HTTP status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A response body did not have the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A remote task reached a terminal failure state.
    #[error("task error: {0}")]
    Task(#[from] TaskError),

    /// A record query violated a cardinality expectation.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Input validation errors, raised before any network call is made.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The cluster rejected the supplied credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Login failed with an unexpected status.
    #[error("login failed with HTTP {status}: {body}")]
    LoginFailed { status: u16, body: String },

    /// The session token returned by the cluster cannot be used in a header.
    #[error("unusable session token: {reason}")]
    SessionToken { reason: String },
}

/// An unexpected HTTP status from the cluster API.
///
/// Carries the raw response body so the operator sees the remote error
/// text verbatim. [`ApiError::is_conflict`] recognizes the known
/// "already configured" / busy responses that call sites may downgrade
/// to a warning instead of aborting.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body text (may be empty).
    pub body: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected HTTP status {}", self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether this is a known, recoverable conflict response.
    ///
    /// The cluster signals "this change is already in place" and
    /// "another operation holds this object" as HTTP 400 with a
    /// recognizable message. Substring matching is brittle but the API
    /// exposes no structured error code; revisit if it ever grows one.
    pub fn is_conflict(&self) -> bool {
        self.status == 400
            && (self.body.contains("already configured")
                || self.body.contains("busy")
                || self.body.contains("in use"))
    }
}

/// Response decoding errors. Always fatal: a shape mismatch means the
/// API contract changed underneath us.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The response body was not valid JSON.
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The response JSON did not have the expected shape.
    #[error("unexpected response shape: expected {expected}, got {found}")]
    Shape {
        expected: &'static str,
        found: String,
    },

    /// A record field was missing or had the wrong type.
    #[error("record field '{field}': {reason}")]
    Field { field: String, reason: String },
}

/// A remote task reached a terminal failure state.
#[derive(Debug)]
pub struct TaskError {
    /// The task tag that was being polled.
    pub task_tag: String,
    /// The terminal state reported by the cluster.
    pub state: String,
    /// Human-readable message from the task record, if present.
    pub message: Option<String>,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {} ended in state {}", self.task_tag, self.state)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for TaskError {}

/// Record query cardinality violations.
///
/// Distinct from transport errors: these signal a caller-logic bug or
/// server-side data inconsistency, not a network problem.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A record was required but no record matched.
    #[error("no record found at '{path}'")]
    NotFound { path: String },

    /// More than one record matched where at most one was expected.
    #[error("ambiguous query at '{path}': {matches} records matched, expected at most one")]
    Ambiguous { path: String, matches: usize },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid cluster URL format.
    #[error("invalid cluster URL '{value}': {reason}")]
    ClusterUrl { value: String, reason: String },

    /// Invalid capacity value or transition.
    #[error("invalid capacity: {reason}")]
    Capacity { reason: String },

    /// A record payload was not a JSON object.
    #[error("invalid record: {reason}")]
    Record { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
