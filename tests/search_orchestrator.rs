//! Integration tests for debounced, latest-wins suggestion search.

use npms_rs::config::NetSettings;
use npms_rs::error::ErrorData;
use npms_rs::net::RequestSender;
use npms_rs::service::npms::SearchSuggestion;
use npms_rs::service::NpmsService;
use npms_rs::{SearchOrchestrator, SuggestionSink};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Default)]
struct RecordingSink {
    applied: Mutex<Vec<Vec<SearchSuggestion>>>,
    errors: Mutex<Vec<ErrorData>>,
}

impl RecordingSink {
    fn applied(&self) -> Vec<Vec<SearchSuggestion>> {
        self.applied.lock().unwrap().clone()
    }

    fn errors(&self) -> Vec<ErrorData> {
        self.errors.lock().unwrap().clone()
    }
}

impl SuggestionSink for RecordingSink {
    fn apply_suggestions(&self, suggestions: Vec<SearchSuggestion>) {
        self.applied.lock().unwrap().push(suggestions);
    }

    fn report_error(&self, error: &ErrorData) {
        self.errors.lock().unwrap().push(error.clone());
    }
}

fn orchestrator(server: &MockServer, sink: Arc<RecordingSink>) -> SearchOrchestrator {
    let settings = NetSettings {
        npm_api_url: server.uri(),
        ..Default::default()
    };
    let service = NpmsService::new(RequestSender::new().unwrap(), &settings);
    SearchOrchestrator::new(service, sink, DEBOUNCE)
}

fn suggestion(name: &str) -> serde_json::Value {
    json!({
        "package": {"name": name, "version": "1.0.0"},
        "score": {
            "final": 0.9,
            "detail": {"quality": 0.9, "popularity": 0.8}
        },
        "searchScore": 1000.0
    })
}

#[tokio::test]
async fn test_rapid_inputs_issue_a_single_request_for_the_last_term() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/suggestions"))
        .and(query_param("q", "react"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([suggestion("react")])))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let orchestrator = orchestrator(&server, sink.clone());

    orchestrator.search_text_changed("r");
    orchestrator.search_text_changed("re");
    orchestrator.search_text_changed("react");

    tokio::time::sleep(Duration::from_millis(600)).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let applied = sink.applied();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0][0].package.name, "react");
    assert!(sink.errors().is_empty());
}

#[tokio::test]
async fn test_invalid_inputs_resolve_empty_without_network() {
    let server = MockServer::start().await;

    let sink = Arc::new(RecordingSink::default());
    let orchestrator = orchestrator(&server, sink.clone());

    orchestrator.search_text_changed("");
    tokio::time::sleep(Duration::from_millis(300)).await;

    orchestrator.search_text_changed(" ");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());

    let applied = sink.applied();
    assert_eq!(applied.len(), 2);
    assert!(applied.iter().all(Vec::is_empty));
    assert!(sink.errors().is_empty());
}

#[tokio::test]
async fn test_latest_generation_wins_under_out_of_order_completion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/suggestions"))
        .and(query_param("q", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([suggestion("slow")]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/suggestions"))
        .and(query_param("q", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([suggestion("fast")])))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let orchestrator = orchestrator(&server, sink.clone());

    orchestrator.search_text_changed("slow");
    // Past the debounce window: the slow request is already in flight.
    tokio::time::sleep(Duration::from_millis(250)).await;
    orchestrator.search_text_changed("fast");

    tokio::time::sleep(Duration::from_millis(700)).await;

    let applied = sink.applied();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0][0].package.name, "fast");
}

#[tokio::test]
async fn test_failed_search_clears_suggestions_and_records_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/suggestions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let orchestrator = orchestrator(&server, sink.clone());

    orchestrator.search_text_changed("react");
    tokio::time::sleep(Duration::from_millis(400)).await;

    let applied = sink.applied();
    assert_eq!(applied.len(), 1);
    assert!(applied[0].is_empty());

    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].code(),
        npms_rs::ErrorCode::InvalidHttpStatus
    );
}

#[tokio::test]
async fn test_dispose_cancels_pending_and_in_flight_work() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/suggestions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([suggestion("react")]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let orchestrator = orchestrator(&server, sink.clone());

    orchestrator.search_text_changed("react");
    // Let the debounce elapse so the request is in flight, then tear down.
    tokio::time::sleep(Duration::from_millis(250)).await;
    orchestrator.dispose();

    tokio::time::sleep(Duration::from_millis(600)).await;

    assert!(sink.applied().is_empty());
    assert!(sink.errors().is_empty());
}

#[tokio::test]
async fn test_dropping_the_orchestrator_disposes_it() {
    let server = MockServer::start().await;

    let sink = Arc::new(RecordingSink::default());
    {
        let orchestrator = orchestrator(&server, sink.clone());
        orchestrator.search_text_changed("react");
    }

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(sink.applied().is_empty());
}
