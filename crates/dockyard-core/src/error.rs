//! Error types for dockyard.
//!
//! One error type with explicit variants for transport, authentication,
//! server-reported, input validation and local storage failures. Callers that
//! only care about the "remote call failed" class use [`Error::is_transport`];
//! the 401 case is singled out by [`Error::is_unauthorized`].

use std::fmt;
use thiserror::Error;

/// The unified error type for dockyard operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors raised locally (missing session, bad login input).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses reported by the remote service.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (bad URL, empty identifier).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Local credential persistence failures.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The owning editor was torn down while the operation was in flight.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// HTTP status reported by the server, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol(e) => Some(e.status),
            _ => None,
        }
    }

    /// True when the server answered with exactly 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True for any failure of the remote call itself: network errors and
    /// non-success statuses alike.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Protocol(_))
    }

    /// True when the error only signals cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
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

    /// Response body could not be decoded.
    #[error("malformed response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No session is stored.
    #[error("not logged in")]
    NotAuthenticated,

    /// Login input rejected before it was sent.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// A non-success response from the remote service.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error code (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// A bare status with no body.
    pub fn status(status: u16) -> Self {
        Self::new(status, None, None)
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid entity identifier.
    #[error("invalid id '{value}': {reason}")]
    EntityId { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Local storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a scope failed.
    #[error("{scope} scope: {message}")]
    Io { scope: &'static str, message: String },

    /// A stored value could not be (de)serialised.
    #[error("{scope} scope holds malformed data: {message}")]
    Malformed { scope: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_only_401() {
        let err: Error = ProtocolError::status(401).into();
        assert!(err.is_unauthorized());
        assert!(err.is_transport());

        let err: Error = ProtocolError::status(403).into();
        assert!(!err.is_unauthorized());
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn protocol_error_display_includes_server_message() {
        let err = ProtocolError::new(
            422,
            Some("ValidationFailed".to_string()),
            Some("name is required".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "HTTP 422 [ValidationFailed]: name is required"
        );
    }

    #[test]
    fn transport_errors_have_no_status() {
        let err: Error = TransportError::Timeout.into();
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
        assert!(!Error::Cancelled.is_transport());
    }
}
