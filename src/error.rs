//! Error taxonomy surfaced to every consumer of the crate
//!
//! Raw transport failures never leave the service layer; they are normalized
//! into an [`ErrorData`] carrying one of the closed set of [`ErrorCode`] kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Causing error, held by reference only and never mutated.
pub type SourceError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Closed set of error kinds with fixed numeric identity.
///
/// The discriminants are part of the public contract: consumers persist and
/// compare them, so they must stay stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum ErrorCode {
    /// Network-origin failure (connection refused, DNS, cross-origin).
    ConnectionError = 1001,
    /// The server replied with a non-success HTTP status.
    InvalidHttpStatus = 1002,
    /// The response body could not be parsed.
    InvalidResult = 1003,
    /// No network available.
    NoNetwork = 1004,
    /// The configured timeout elapsed before a response arrived.
    RequestTimeout = 1005,
    /// The server replied with a structured "not found" payload even though
    /// the transport-level status was not a 404.
    EndpointNotFound = 1006,
    /// The request was cancelled by its caller.
    Aborted = 1007,
}

impl ErrorCode {
    /// Numeric identity of this kind.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a kind by its numeric identity.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1001 => Some(Self::ConnectionError),
            1002 => Some(Self::InvalidHttpStatus),
            1003 => Some(Self::InvalidResult),
            1004 => Some(Self::NoNetwork),
            1005 => Some(Self::RequestTimeout),
            1006 => Some(Self::EndpointNotFound),
            1007 => Some(Self::Aborted),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ConnectionError => "CONNECTION_ERROR",
            Self::InvalidHttpStatus => "INVALID_HTTP_STATUS",
            Self::InvalidResult => "INVALID_RESULT",
            Self::NoNetwork => "NO_NETWORK",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::EndpointNotFound => "ENDPOINT_NOT_FOUND",
            Self::Aborted => "ABORTED",
        };
        write!(f, "{}", name)
    }
}

/// Normalized error value, immutable after construction.
#[derive(Debug, Clone)]
pub struct ErrorData {
    code: ErrorCode,
    message: String,
    original: Option<SourceError>,
}

impl ErrorData {
    /// Create an error value.
    ///
    /// An empty or missing `message` falls back to the wrapped error's text,
    /// or to the empty string. Construction never fails.
    pub fn new(code: ErrorCode, message: Option<String>, original: Option<SourceError>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .or_else(|| original.as_ref().map(|err| err.to_string()))
            .unwrap_or_default();

        Self {
            code,
            message,
            original,
        }
    }

    /// Error value carrying only a kind.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, None, None)
    }

    /// Generic fallback for failures no classifier recognized.
    pub fn unclassified(original: SourceError) -> Self {
        Self::new(ErrorCode::ConnectionError, None, Some(original))
    }

    /// Error kind.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Error description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The causing error, when one was attached.
    pub fn original(&self) -> Option<&SourceError> {
        self.original.as_ref()
    }
}

impl fmt::Display for ErrorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: code - {}", self.code.code())?;

        if !self.message.is_empty() {
            write!(f, "; message - {}", self.message)?;
        }

        if let Some(ref original) = self.original {
            write!(f, "; original error - {}", original)?;
        }

        Ok(())
    }
}
