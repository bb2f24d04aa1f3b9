//! npms-rs: request control and search core for an npm package search client
//!
//! This crate holds the network-facing half of the application: a cancellable
//! HTTP request layer, a configurable service façade that normalizes failures
//! into a stable error taxonomy, and a debounced latest-wins orchestrator for
//! package search suggestions.

pub mod config;
pub mod error;
pub mod log;
pub mod net;
pub mod search;
pub mod service;
pub mod storage;

pub use config::Settings;
pub use error::{ErrorCode, ErrorData};
pub use net::{HttpMethod, HttpResponse, RequestControl, RequestDescriptor, RequestSender};
pub use search::{SearchOrchestrator, SuggestionSink};
pub use service::{NpmsService, RequestResult, ServiceBase, ServiceCall};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default request timeout in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Default search input debounce delay in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
