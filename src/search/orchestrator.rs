//! Debounced latest-wins suggestion search

use crate::error::{ErrorData, SourceError};
use crate::service::npms::{decode_suggestions, NpmsService, SearchSuggestion};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Consumer of orchestrated search outcomes.
///
/// Failures are reported here and never propagate past the orchestrator.
pub trait SuggestionSink: Send + Sync {
    /// Apply the current suggestion list to visible state.
    fn apply_suggestions(&self, suggestions: Vec<SearchSuggestion>);

    /// Record a search failure.
    fn report_error(&self, error: &ErrorData);
}

#[derive(Default)]
struct Tasks {
    /// At most one live debounce task.
    pending_timer: Option<JoinHandle<()>>,
    /// At most one in-flight request.
    active_call: Option<crate::net::AbortHandle>,
}

struct Inner {
    service: NpmsService,
    sink: Arc<dyn SuggestionSink>,
    debounce: Duration,
    /// Monotonic request generation; results from older generations are
    /// discarded at settlement time.
    generation: AtomicU64,
    tasks: Mutex<Tasks>,
}

/// Debounces search input and applies only the latest generation's result.
///
/// Every input restarts the single debounce timer. When the timer elapses,
/// the previous in-flight call is aborted and a new generation is issued;
/// whichever order settlements arrive in, a result is applied only while its
/// generation is still the current one. The generation comparison, not
/// cancellation alone, is what enforces latest-wins: an in-flight transport
/// exchange may not abort reliably mid-flight.
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

impl SearchOrchestrator {
    /// Create an orchestrator delivering outcomes into `sink`.
    pub fn new(service: NpmsService, sink: Arc<dyn SuggestionSink>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                sink,
                debounce,
                generation: AtomicU64::new(0),
                tasks: Mutex::new(Tasks::default()),
            }),
        }
    }

    /// Handle a search-text-changed event.
    ///
    /// Restarts the debounce timer; a previous pending invocation never
    /// fires. Callers with no input text pass an empty string.
    pub fn search_text_changed(&self, text: impl Into<String>) {
        let text = text.into();
        let inner = self.inner.clone();

        let mut tasks = self.inner.tasks.lock().unwrap();

        if let Some(previous) = tasks.pending_timer.take() {
            previous.abort();
        }

        tasks.pending_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            Inner::debounce_elapsed(inner, text).await;
        }));
    }

    /// Tear down: clears the pending timer and aborts any in-flight call.
    ///
    /// Idempotent; late settlements can no longer apply.
    pub fn dispose(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);

        let mut tasks = self.inner.tasks.lock().unwrap();

        if let Some(timer) = tasks.pending_timer.take() {
            timer.abort();
        }

        if let Some(call) = tasks.active_call.take() {
            call.abort();
        }
    }
}

impl Drop for SearchOrchestrator {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Inner {
    async fn debounce_elapsed(self: Arc<Self>, text: String) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Supersede whatever was in flight for an older generation.
        let previous = self.tasks.lock().unwrap().active_call.take();
        if let Some(previous) = previous {
            previous.abort();
        }

        if !is_search_input_valid(&text) {
            self.sink.apply_suggestions(Vec::new());
            return;
        }

        let call = match self.service.request_suggestions(&text) {
            Ok(call) => call,
            Err(err) => {
                let original: SourceError = Arc::new(err);
                self.sink.apply_suggestions(Vec::new());
                self.sink.report_error(&ErrorData::unclassified(original));
                return;
            }
        };

        self.tasks.lock().unwrap().active_call = Some(call.abort_handle());

        let result = call.settled().await;

        if generation != self.generation.load(Ordering::SeqCst) {
            debug!(generation, "discarding superseded suggestions result");
            return;
        }

        if let Some(ref error) = result.error {
            self.sink.apply_suggestions(Vec::new());
            self.sink.report_error(error);
            return;
        }

        match decode_suggestions(&result) {
            Ok(suggestions) => self.sink.apply_suggestions(suggestions),
            Err(error) => {
                self.sink.apply_suggestions(Vec::new());
                self.sink.report_error(&error);
            }
        }
    }
}

/// Trimmed input must be non-empty to trigger a fetch.
fn is_search_input_valid(text: &str) -> bool {
    !text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_validation() {
        assert!(!is_search_input_valid(""));
        assert!(!is_search_input_valid(" "));
        assert!(!is_search_input_valid("   \t\n"));
        assert!(is_search_input_valid("react"));
        assert!(is_search_input_valid(" react "));
    }
}
