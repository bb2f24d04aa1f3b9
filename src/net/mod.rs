//! HTTP request layer
//!
//! Issues outbound calls described by a [`RequestDescriptor`] and hands the
//! caller a cancellable [`RequestControl`]. This layer performs no failure
//! classification: it settles with raw response metadata or a raw
//! [`TransportError`] for the service layer to normalize.

mod control;
mod descriptor;
mod method;
mod response;
mod sender;

pub use control::{AbortHandle, RequestControl};
pub use descriptor::{DescriptorError, RequestDescriptor};
pub use method::HttpMethod;
pub use response::{HttpResponse, TransportError};
pub use sender::RequestSender;
