//! Request sender built on a pooled reqwest client

use super::control::{ControlState, RequestControl};
use super::descriptor::{DescriptorError, RequestDescriptor};
use super::response::{HttpResponse, TransportError};
use crate::config::NetSettings;
use anyhow::Result;
use indexmap::IndexMap;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use url::Url;

/// Issues single HTTP calls and returns a cancellable control per call.
#[derive(Debug, Clone)]
pub struct RequestSender {
    client: Client,
    default_timeout: Duration,
}

impl RequestSender {
    /// Create a sender with the process-wide default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_millis(crate::DEFAULT_REQUEST_TIMEOUT_MS))
    }

    /// Create a sender from network settings.
    pub fn with_settings(settings: &NetSettings) -> Result<Self> {
        Self::with_timeout(settings.request_timeout())
    }

    /// Create a sender with a custom default timeout.
    pub fn with_timeout(default_timeout: Duration) -> Result<Self> {
        let client = Client::builder().gzip(true).build()?;

        Ok(Self {
            client,
            default_timeout,
        })
    }

    /// Default timeout applied when a descriptor carries none.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Issue the call described by `descriptor`.
    ///
    /// Fails synchronously, before any network attempt, when the URL is
    /// empty. The returned control settles exactly once with raw response
    /// metadata or a raw [`TransportError`]; no classification happens here.
    pub fn send(&self, descriptor: RequestDescriptor) -> Result<RequestControl, DescriptorError> {
        if descriptor.url.is_empty() {
            return Err(DescriptorError::MissingUrl);
        }

        let state = Arc::new(ControlState::default());
        let (settle_tx, settle_rx) = oneshot::channel();

        let client = self.client.clone();
        let timeout = descriptor.timeout.unwrap_or(self.default_timeout);
        let task_descriptor = descriptor.clone();
        let task_state = state.clone();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = task_state.abort_requested() => {
                    debug!(url = %task_descriptor.url, "request aborted by caller");
                    Err(TransportError::Aborted)
                }
                outcome = Self::execute(client, &task_descriptor, &task_state, timeout) => outcome,
            };

            // The receiver may be gone if the caller dropped the control.
            let _ = settle_tx.send(outcome);
        });

        Ok(RequestControl::new(descriptor, state, settle_rx))
    }

    async fn execute(
        client: Client,
        descriptor: &RequestDescriptor,
        state: &ControlState,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let mut url = Url::parse(&descriptor.url)?;
        let mut body = None;

        if let Some(ref payload) = descriptor.payload {
            if descriptor.method.sends_query() {
                append_query_pairs(&mut url, payload);
            } else {
                body = Some(payload);
            }
        }

        let mut request = client.request(descriptor.method.to_reqwest(), url.clone());

        for (key, value) in descriptor.effective_headers() {
            request = request.header(&key, &value);
        }

        if let Some(payload) = body {
            request = request.json(payload);
        }

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|err| TransportError::Connection(Arc::new(err)))?;
            Self::read_response(response).await
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(outcome) => {
                if let Ok(ref response) = outcome {
                    debug!(url = %url, status = response.status, "request settled");
                }
                outcome
            }
            Err(_) => {
                state.mark_timed_out();
                warn!(url = %url, ?timeout, "request timed out");
                Err(TransportError::TimedOut(timeout))
            }
        }
    }

    async fn read_response(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let ok = response.status().is_success();

        let mut headers = IndexMap::new();
        for (key, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(key.to_string(), value.to_string());
            }
        }

        let is_json = headers
            .get("content-type")
            .map(|value| value.contains("json"))
            .unwrap_or(false);

        let text = response
            .text()
            .await
            .map_err(|err| TransportError::Connection(Arc::new(err)))?;

        let body = if is_json && !text.is_empty() {
            match serde_json::from_str(&text) {
                Ok(value) => Some(value),
                // A success response with an undecodable body is a transport
                // failure; error responses keep the raw text instead.
                Err(err) if ok => {
                    return Err(TransportError::Decode {
                        source: Arc::new(err),
                        status,
                        raw: text,
                    });
                }
                Err(_) => None,
            }
        } else {
            None
        };

        let response = HttpResponse {
            status,
            ok,
            headers,
            text,
            body,
        };

        if response.ok {
            Ok(response)
        } else {
            Err(TransportError::Status { response })
        }
    }
}

/// Serialize a payload object as query parameters.
fn append_query_pairs(url: &mut Url, payload: &Value) {
    match payload {
        Value::Object(map) => {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in map {
                match value {
                    Value::String(text) => {
                        pairs.append_pair(key, text);
                    }
                    Value::Null => {}
                    other => {
                        pairs.append_pair(key, &other.to_string());
                    }
                }
            }
        }
        other => {
            warn!(payload = %other, "ignoring non-object query payload");
        }
    }
}
