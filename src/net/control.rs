//! Per-request control handle

use super::descriptor::RequestDescriptor;
use super::response::{HttpResponse, TransportError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, Notify};

#[derive(Debug, Default)]
pub(super) struct ControlState {
    aborted: AtomicBool,
    timed_out: AtomicBool,
    abort_signal: Notify,
}

impl ControlState {
    pub(super) fn mark_timed_out(&self) {
        self.timed_out.store(true, Ordering::SeqCst);
    }

    pub(super) async fn abort_requested(&self) {
        self.abort_signal.notified().await;
    }
}

/// Cheap cloneable handle to a request's abort/timeout flags.
///
/// Stays usable after the owning [`RequestControl`] has been consumed by
/// [`RequestControl::settled`].
#[derive(Debug, Clone)]
pub struct AbortHandle {
    state: Arc<ControlState>,
}

impl AbortHandle {
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self {
            state: Arc::new(ControlState::default()),
        }
    }

    /// Cancel the underlying transport operation if it is still pending.
    ///
    /// Idempotent: repeated calls have no additional effect, and a call after
    /// settlement is a no-op. The request future still settles (with an
    /// abort-flavored error) so awaiting callers always observe termination.
    pub fn abort(&self) {
        if !self.state.aborted.swap(true, Ordering::SeqCst) {
            self.state.abort_signal.notify_one();
        }
    }

    /// Whether an abort was requested.
    pub fn is_aborted(&self) -> bool {
        self.state.aborted.load(Ordering::SeqCst)
    }

    /// Whether the request timed out.
    pub fn is_timed_out(&self) -> bool {
        self.state.timed_out.load(Ordering::SeqCst)
    }
}

/// Control handle for a single issued request, exclusively owned by the
/// caller that issued it.
///
/// Transitions to settled exactly once; after [`AbortHandle::abort`] the
/// settlement is an [`TransportError::Aborted`] rejection and no further
/// network side effects occur.
#[derive(Debug)]
pub struct RequestControl {
    descriptor: RequestDescriptor,
    handle: AbortHandle,
    settled: oneshot::Receiver<Result<HttpResponse, TransportError>>,
}

impl RequestControl {
    pub(super) fn new(
        descriptor: RequestDescriptor,
        state: Arc<ControlState>,
        settled: oneshot::Receiver<Result<HttpResponse, TransportError>>,
    ) -> Self {
        Self {
            descriptor,
            handle: AbortHandle { state },
            settled,
        }
    }

    /// Echo of the originating descriptor.
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    /// Cancel the request. See [`AbortHandle::abort`].
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Whether the request timed out.
    pub fn is_timed_out(&self) -> bool {
        self.handle.is_timed_out()
    }

    /// Detach a handle that survives consuming the control.
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.clone()
    }

    /// Await settlement. Never hangs: an aborted request settles with
    /// [`TransportError::Aborted`], and so does a request whose task was torn
    /// down before sending.
    pub async fn settled(self) -> Result<HttpResponse, TransportError> {
        match self.settled.await {
            Ok(outcome) => outcome,
            Err(_) => Err(TransportError::Aborted),
        }
    }
}
