//! npms.io service
//!
//! Configured [`ServiceBase`] for the npms API, plus the domain-specific
//! error refinement: a failed response whose body is a structured
//! `{code: "NOT_FOUND"}` payload is remapped to
//! [`ErrorCode::EndpointNotFound`] regardless of the transport status.

mod types;

pub use types::{
    NpmsErrorResponse, PackageFlags, PackageScore, PackageSummary, ScoreDetail, SearchSuggestion,
};

use super::base::{
    ErrorRefinement, RequestOverrides, RequestResult, ServiceBase, ServiceCall,
};
use crate::config::NetSettings;
use crate::error::{ErrorCode, ErrorData, SourceError};
use crate::net::{AbortHandle, DescriptorError, RequestSender, TransportError};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Request timeout for npms calls.
pub const NPMS_SERVICE_TIMEOUT: Duration = Duration::from_millis(500);

const SEARCH_PATH: &str = "search";
const SUGGESTIONS_PATH: &str = "suggestions";

/// npms API service.
#[derive(Clone)]
pub struct NpmsService {
    base: ServiceBase,
}

impl NpmsService {
    /// Create a service pointed at the configured npms API base URL.
    pub fn new(sender: RequestSender, settings: &NetSettings) -> Self {
        let base = ServiceBase::new(sender)
            .with_request_url(settings.npm_api_url.clone())
            .with_request_timeout(NPMS_SERVICE_TIMEOUT)
            .with_content_type("")
            .with_error_refiner(Arc::new(refine_not_found));

        Self { base }
    }

    /// The underlying configured service.
    pub fn base(&self) -> &ServiceBase {
        &self.base
    }

    /// Issue a call against `url_end` under the API base URL.
    pub fn send(
        &self,
        url_end: &str,
        payload: Option<Value>,
        overrides: Option<RequestOverrides>,
    ) -> Result<ServiceCall, DescriptorError> {
        if url_end.is_empty() {
            return Err(DescriptorError::MissingUrlSuffix);
        }

        self.base
            .clone()
            .with_request_url_end(url_end)
            .send_request(payload, overrides)
    }

    /// Fetch search suggestions for `term`.
    pub fn request_suggestions(&self, term: &str) -> Result<ServiceCall, DescriptorError> {
        self.send(
            &format!("{}/{}", SEARCH_PATH, SUGGESTIONS_PATH),
            Some(json!({ "q": term })),
            None,
        )
    }
}

/// Decode a settled suggestions result into typed entries.
///
/// A malformed success payload surfaces as [`ErrorCode::InvalidResult`] with
/// the decode error attached.
pub fn decode_suggestions(result: &RequestResult) -> Result<Vec<SearchSuggestion>, ErrorData> {
    let value = result.result.clone().unwrap_or(Value::Null);

    serde_json::from_value(value).map_err(|err| {
        let original: SourceError = Arc::new(err);
        ErrorData::new(ErrorCode::InvalidResult, None, Some(original))
    })
}

/// Remap structured `NOT_FOUND` payloads to [`ErrorCode::EndpointNotFound`].
///
/// Any failing response body matching the `{code, message}` shape with
/// `code == "NOT_FOUND"` is remapped, whatever the transport status was.
fn refine_not_found(
    _raw: &TransportError,
    _handle: &AbortHandle,
    default_result: &RequestResult,
) -> Option<ErrorRefinement> {
    let body = default_result.response.as_ref()?.body.as_ref()?;
    let payload: NpmsErrorResponse = serde_json::from_value(body.clone()).ok()?;

    if payload.code != "NOT_FOUND" {
        return None;
    }

    Some(ErrorRefinement {
        error: ErrorData::new(ErrorCode::EndpointNotFound, payload.message, None),
        result: None,
    })
}
