//! Search orchestration
//!
//! Consumes search-text-changed events, debounces them, fetches suggestions
//! through the npms service and guarantees only the most recent request's
//! result is ever applied.

mod orchestrator;

pub use orchestrator::{SearchOrchestrator, SuggestionSink};
