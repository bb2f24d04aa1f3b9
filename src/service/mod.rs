//! Service layer
//!
//! [`ServiceBase`] is the sole classification boundary: it merges per-call
//! overrides into instance defaults, delegates to the request layer, and
//! normalizes every raw failure into the error taxonomy before a consumer
//! sees it.

mod base;
pub mod npms;

pub use base::{
    CallHandler, ErrorRefinement, ErrorRefiner, RequestOverrides, RequestResult, ResponseEcho,
    ResultAction, ServiceBase, ServiceCall,
};
pub use npms::NpmsService;
