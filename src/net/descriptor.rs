//! Request descriptor value object

use super::method::HttpMethod;
use indexmap::IndexMap;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Synchronous precondition violations raised before any network attempt.
///
/// These are configuration errors, not members of the error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("request URL is not set")]
    MissingUrl,
    #[error("API URL suffix is not set")]
    MissingUrlSuffix,
}

/// Fully-resolved description of a single outbound HTTP call.
///
/// Invariant: `url` is non-empty; [`RequestDescriptor::new`] rejects an empty
/// one and [`RequestSender::send`](super::RequestSender::send) re-checks it.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Request URL.
    pub url: String,
    /// HTTP method, GET when not overridden.
    pub method: HttpMethod,
    /// Header mapping, insertion-ordered with unique keys.
    pub headers: IndexMap<String, String>,
    /// Payload: query parameters for GET/HEAD, JSON body otherwise.
    pub payload: Option<Value>,
    /// Per-request timeout; the sender default applies when unset.
    pub timeout: Option<Duration>,
    /// Injected into headers as `Content-Type` when set.
    pub content_type: Option<String>,
}

impl RequestDescriptor {
    /// Create a descriptor for `url`.
    pub fn new(url: impl Into<String>) -> Result<Self, DescriptorError> {
        let url = url.into();

        if url.is_empty() {
            return Err(DescriptorError::MissingUrl);
        }

        Ok(Self {
            url,
            method: HttpMethod::default(),
            headers: IndexMap::new(),
            payload: None,
            timeout: None,
            content_type: None,
        })
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Replace the header set.
    pub fn with_headers(mut self, headers: IndexMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Add a single header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Header set with the content type folded in.
    pub fn effective_headers(&self) -> IndexMap<String, String> {
        let mut headers = self.headers.clone();

        if let Some(ref content_type) = self.content_type {
            headers.insert("Content-Type".to_string(), content_type.clone());
        }

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_url_is_rejected() {
        assert_eq!(
            RequestDescriptor::new("").unwrap_err(),
            DescriptorError::MissingUrl
        );
    }

    #[test]
    fn test_builder_defaults() {
        let descriptor = RequestDescriptor::new("https://api.npms.io/v2").unwrap();
        assert_eq!(descriptor.method, HttpMethod::Get);
        assert!(descriptor.headers.is_empty());
        assert!(descriptor.payload.is_none());
        assert!(descriptor.timeout.is_none());
    }

    #[test]
    fn test_content_type_is_injected_into_headers() {
        let descriptor = RequestDescriptor::new("https://example.org")
            .unwrap()
            .with_header("Accept", "application/json")
            .with_content_type("application/json");

        let headers = descriptor.effective_headers();
        assert_eq!(headers.get("Accept").map(String::as_str), Some("application/json"));
        assert_eq!(
            headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_payload_round_trip() {
        let descriptor = RequestDescriptor::new("https://example.org")
            .unwrap()
            .with_method(HttpMethod::Post)
            .with_payload(json!({"q": "react"}));

        assert_eq!(descriptor.payload, Some(json!({"q": "react"})));
    }
}
