//! Raw response metadata and transport failure variants

use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Response metadata as received from the transport, before any
/// service-level normalization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Whether the status is in the 2xx range.
    pub ok: bool,
    /// Response headers.
    pub headers: IndexMap<String, String>,
    /// Raw body text.
    pub text: String,
    /// Decoded JSON body when one could be parsed.
    pub body: Option<Value>,
}

/// Raw transport failures, settled by the request task.
///
/// Each failure mode is an explicit variant so the service layer matches on a
/// tag instead of probing error shapes structurally. No variant carries a
/// taxonomy code; classification happens upstream.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The descriptor URL did not parse.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Network-origin failure before a response arrived.
    #[error("connection failed: {0}")]
    Connection(#[source] Arc<reqwest::Error>),

    /// The configured timeout elapsed.
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),

    /// The caller cancelled the request.
    #[error("request aborted")]
    Aborted,

    /// A success response declared JSON but its body failed to parse.
    #[error("invalid JSON in response body (status {status})")]
    Decode {
        #[source]
        source: Arc<serde_json::Error>,
        /// Status of the response whose body failed to parse.
        status: u16,
        /// Raw body text, kept for upstream inspection.
        raw: String,
    },

    /// A response arrived with a non-success status.
    #[error("unexpected HTTP status {}", .response.status)]
    Status {
        /// The full response, body parsed leniently so structured error
        /// payloads stay inspectable.
        response: HttpResponse,
    },
}
