//! Base network service façade

use crate::error::{ErrorCode, ErrorData, SourceError};
use crate::net::{
    AbortHandle, DescriptorError, HttpMethod, HttpResponse, RequestDescriptor, RequestSender,
    TransportError,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::error;

/// Instance callback invoked with every settled result.
pub type ResultAction = Arc<dyn Fn(&RequestResult) + Send + Sync>;

/// Call-scoped callback invoked once for its call's settled result.
pub type CallHandler = Box<dyn FnOnce(&RequestResult) + Send>;

/// Strategy hook that may replace the default error classification with a
/// domain-specific one. Returning `None` leaves the default untouched.
pub type ErrorRefiner =
    Arc<dyn Fn(&TransportError, &AbortHandle, &RequestResult) -> Option<ErrorRefinement> + Send + Sync>;

/// Replacement classification produced by an [`ErrorRefiner`].
#[derive(Debug, Clone)]
pub struct ErrorRefinement {
    /// Error that replaces the default classification.
    pub error: ErrorData,
    /// Consumer-visible value that replaces the default one.
    pub result: Option<Value>,
}

/// Raw response metadata echoed on the settled result.
///
/// `None` status/text mark a settlement that never saw a response.
#[derive(Debug, Clone, Default)]
pub struct ResponseEcho {
    pub status: Option<u16>,
    pub ok: bool,
    pub text: Option<String>,
    pub body: Option<Value>,
}

impl ResponseEcho {
    fn from_response(response: &HttpResponse) -> Self {
        Self {
            status: Some(response.status),
            ok: response.ok,
            text: Some(response.text.clone()),
            body: response.body.clone(),
        }
    }
}

/// Settled outcome of a service call.
#[derive(Debug, Clone, Default)]
pub struct RequestResult {
    /// Raw decoded value before any consumer transformation.
    pub initial_result: Option<Value>,
    /// Consumer-visible value; equals `initial_result` unless a refiner
    /// substituted it.
    pub result: Option<Value>,
    /// Normalized error, `None` on success.
    pub error: Option<ErrorData>,
    /// Raw response metadata, `None` on pure transport failure.
    pub response: Option<ResponseEcho>,
    /// Opaque pass-through value supplied by the caller.
    pub context: Option<Value>,
}

/// Call-scoped overrides; a set field always wins over the instance default.
#[derive(Default)]
pub struct RequestOverrides {
    /// Replaces the computed `base/suffix` URL entirely.
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub header_set: Option<IndexMap<String, String>>,
    pub timeout: Option<Duration>,
    pub content_type: Option<String>,
    /// Opaque pass-through, echoed on the result.
    pub context: Option<Value>,
    /// Fires when the call settles without error.
    pub result_handler: Option<CallHandler>,
    /// Fires when the call settles with an error.
    pub error_handler: Option<CallHandler>,
    /// Fires unconditionally after the outcome-specific handler.
    pub handler: Option<CallHandler>,
}

/// Control handle over one service call.
///
/// Settlement is infallible: raw transport errors never leak past the
/// service layer, they arrive normalized inside the [`RequestResult`].
#[derive(Debug)]
pub struct ServiceCall {
    url: String,
    method: HttpMethod,
    handle: AbortHandle,
    settled: oneshot::Receiver<RequestResult>,
}

impl ServiceCall {
    /// Effective URL the call was issued against.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Effective HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Cancel the call. Idempotent, no-op after settlement.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Whether the underlying request timed out.
    pub fn is_timed_out(&self) -> bool {
        self.handle.is_timed_out()
    }

    /// Detach a handle that survives consuming the call.
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.clone()
    }

    /// Await the normalized outcome.
    pub async fn settled(self) -> RequestResult {
        match self.settled.await {
            Ok(result) => result,
            // The wrapper task died before settling (runtime teardown).
            Err(_) => RequestResult {
                error: Some(ErrorData::from_code(ErrorCode::Aborted)),
                ..Default::default()
            },
        }
    }
}

/// Configurable, overridable façade over [`RequestSender`].
///
/// Each configured instance carries default endpoint, method, headers,
/// timeout and content type, two optional per-instance callbacks, and an
/// optional error-refinement strategy.
#[derive(Clone)]
pub struct ServiceBase {
    sender: RequestSender,
    request_url: String,
    request_url_end: String,
    request_method: HttpMethod,
    header_set: Option<IndexMap<String, String>>,
    request_timeout: Duration,
    content_type: String,
    result_action: Option<ResultAction>,
    error_action: Option<ResultAction>,
    error_refiner: Option<ErrorRefiner>,
}

impl ServiceBase {
    /// Create a service with defaults: GET, `application/json`, the sender's
    /// default timeout, no endpoint.
    pub fn new(sender: RequestSender) -> Self {
        let request_timeout = sender.default_timeout();

        Self {
            sender,
            request_url: String::new(),
            request_url_end: String::new(),
            request_method: HttpMethod::Get,
            header_set: None,
            request_timeout,
            content_type: "application/json".to_string(),
            result_action: None,
            error_action: None,
            error_refiner: None,
        }
    }

    /// Set the base request URL.
    pub fn with_request_url(mut self, url: impl Into<String>) -> Self {
        self.request_url = url.into();
        self
    }

    /// Set the URL suffix appended to the base URL.
    pub fn with_request_url_end(mut self, url_end: impl Into<String>) -> Self {
        self.request_url_end = url_end.into();
        self
    }

    /// Set the default HTTP method.
    pub fn with_request_method(mut self, method: HttpMethod) -> Self {
        self.request_method = method;
        self
    }

    /// Set the default header set.
    pub fn with_header_set(mut self, header_set: IndexMap<String, String>) -> Self {
        self.header_set = Some(header_set);
        self
    }

    /// Set the default request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the default content type; an empty string disables it.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Set the callback fired on every successful settlement.
    pub fn with_result_action(mut self, action: ResultAction) -> Self {
        self.result_action = Some(action);
        self
    }

    /// Set the callback fired on every failed settlement.
    pub fn with_error_action(mut self, action: ResultAction) -> Self {
        self.error_action = Some(action);
        self
    }

    /// Set the error-refinement strategy.
    pub fn with_error_refiner(mut self, refiner: ErrorRefiner) -> Self {
        self.error_refiner = Some(refiner);
        self
    }

    /// Base request URL.
    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    /// URL suffix.
    pub fn request_url_end(&self) -> &str {
        &self.request_url_end
    }

    /// Computed effective URL: `base/suffix`, empty when neither part is set.
    pub fn full_request_url(&self) -> String {
        if self.request_url.is_empty() && self.request_url_end.is_empty() {
            return String::new();
        }

        format!("{}/{}", self.request_url, self.request_url_end)
    }

    /// Default request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Issue a call with this instance's defaults merged with `overrides`.
    ///
    /// Fails synchronously, before any network activity, when the effective
    /// URL is empty. The instance callbacks and any call-scoped handlers fire
    /// exactly once per call whether or not the returned [`ServiceCall`] is
    /// awaited.
    pub fn send_request(
        &self,
        payload: Option<Value>,
        overrides: Option<RequestOverrides>,
    ) -> Result<ServiceCall, DescriptorError> {
        let overrides = overrides.unwrap_or_default();

        let url = overrides.url.unwrap_or_else(|| self.full_request_url());
        let method = overrides.method.unwrap_or(self.request_method);
        let header_set = overrides
            .header_set
            .or_else(|| self.header_set.clone())
            .unwrap_or_default();
        let timeout = overrides.timeout.unwrap_or(self.request_timeout);
        let content_type = match overrides.content_type {
            Some(content_type) => Some(content_type),
            None if self.content_type.is_empty() => None,
            None => Some(self.content_type.clone()),
        };

        let mut descriptor = RequestDescriptor::new(url)?
            .with_method(method)
            .with_headers(header_set)
            .with_timeout(timeout);

        if let Some(content_type) = content_type {
            descriptor = descriptor.with_content_type(content_type);
        }

        if let Some(payload) = payload {
            descriptor = descriptor.with_payload(payload);
        }

        let control = self.sender.send(descriptor)?;
        let handle = control.abort_handle();
        let url = control.descriptor().url.clone();

        let (settle_tx, settle_rx) = oneshot::channel();

        let result_action = self.result_action.clone();
        let error_action = self.error_action.clone();
        let error_refiner = self.error_refiner.clone();
        let context = overrides.context;
        let result_handler = overrides.result_handler;
        let error_handler = overrides.error_handler;
        let handler = overrides.handler;
        let task_handle = handle.clone();

        tokio::spawn(async move {
            let result = match control.settled().await {
                Ok(response) => handle_request_result(response, context, result_action.as_ref()),
                Err(raw) => handle_request_error(
                    raw,
                    &task_handle,
                    context,
                    error_action.as_ref(),
                    error_refiner.as_ref(),
                ),
            };

            if result.error.is_some() {
                if let Some(error_handler) = error_handler {
                    error_handler(&result);
                }
            } else if let Some(result_handler) = result_handler {
                result_handler(&result);
            }

            if let Some(handler) = handler {
                handler(&result);
            }

            // The receiver may be gone if the caller dropped the call handle.
            let _ = settle_tx.send(result);
        });

        Ok(ServiceCall {
            url,
            method,
            handle,
            settled: settle_rx,
        })
    }
}

/// Wrap a settled response into a result.
fn handle_request_result(
    response: HttpResponse,
    context: Option<Value>,
    action: Option<&ResultAction>,
) -> RequestResult {
    // A response that settled as success but still carries a not-ok marker
    // surfaces as an invalid-status error.
    let error = (!response.ok).then(|| ErrorData::from_code(ErrorCode::InvalidHttpStatus));

    let result = response
        .body
        .clone()
        .or_else(|| Some(Value::String(response.text.clone())));

    let request_result = RequestResult {
        initial_result: result.clone(),
        result,
        error,
        response: Some(ResponseEcho::from_response(&response)),
        context,
    };

    if let Some(action) = action {
        action(&request_result);
    }

    request_result
}

/// Classify a raw failure and wrap it into a result.
fn handle_request_error(
    raw: TransportError,
    handle: &AbortHandle,
    context: Option<Value>,
    action: Option<&ResultAction>,
    refiner: Option<&ErrorRefiner>,
) -> RequestResult {
    let response = match &raw {
        TransportError::Status { response } => Some(ResponseEcho::from_response(response)),
        TransportError::Decode { status, raw, .. } => Some(ResponseEcho {
            status: Some(*status),
            ok: false,
            text: Some(raw.clone()),
            body: None,
        }),
        _ => None,
    };

    let mut result = RequestResult {
        initial_result: None,
        result: None,
        error: classify_error(&raw, handle.is_timed_out()),
        response,
        context,
    };

    if let Some(refiner) = refiner {
        if let Some(refinement) = refiner(&raw, handle, &result) {
            result.error = Some(refinement.error);
            result.result = refinement.result;
        }
    }

    if result.error.is_none() {
        let original: SourceError = Arc::new(raw.clone());
        result.error = Some(ErrorData::unclassified(original));
    }

    result.initial_result = result.result.clone();

    if let Some(action) = action {
        action(&result);
    }

    let code = result.error.as_ref().map(|error| error.code().code());
    error!(?code, message = %raw, "request failed");

    result
}

/// Default classification of a raw transport failure.
///
/// Leaves unrecognized failures unclassified for the refiner.
fn classify_error(raw: &TransportError, timed_out: bool) -> Option<ErrorData> {
    match raw {
        TransportError::Connection(source) => {
            let original: SourceError = source.clone();
            Some(ErrorData::new(ErrorCode::ConnectionError, None, Some(original)))
        }
        TransportError::Decode { source, .. } => {
            let original: SourceError = source.clone();
            Some(ErrorData::new(ErrorCode::InvalidResult, None, Some(original)))
        }
        TransportError::TimedOut(_) => Some(ErrorData::from_code(ErrorCode::RequestTimeout)),
        TransportError::Aborted => Some(ErrorData::from_code(ErrorCode::Aborted)),
        TransportError::Status { response } if !response.ok => {
            Some(ErrorData::from_code(ErrorCode::InvalidHttpStatus))
        }
        _ if timed_out => Some(ErrorData::from_code(ErrorCode::RequestTimeout)),
        _ => None,
    }
}
