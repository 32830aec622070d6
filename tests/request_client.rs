mod common;

use common::{InstantDelay, MockTransport, Reply, mock_client};
use correlation_matrix_wasm::domain::errors::AppError;
use correlation_matrix_wasm::infrastructure::http::{HttpMethod, RequestOptions};
use futures::executor::block_on;
use serde_json::{Value, json};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_millis(60_000);

#[test]
fn unreachable_server_gets_three_attempts_with_linear_backoff() {
    let transport = MockTransport::new();
    transport.reply("/health", Reply::Unreachable);
    let delay = InstantDelay::new();
    let client = mock_client(&transport, &delay);

    let result = block_on(client.request_json::<Value>("/health", RequestOptions::get()));

    assert!(matches!(result, Err(AppError::Network(_))));
    assert_eq!(transport.calls("/health"), 3);
    assert_eq!(
        delay.slept(),
        vec![
            TIMEOUT,
            Duration::from_millis(1_000),
            TIMEOUT,
            Duration::from_millis(2_000),
            TIMEOUT,
        ]
    );
}

#[test]
fn network_error_names_the_base_url() {
    let transport = MockTransport::new();
    transport.reply("/assets", Reply::Unreachable);
    let client = mock_client(&transport, &InstantDelay::new());

    let err = block_on(client.request_json::<Value>("/assets", RequestOptions::get())).unwrap_err();

    assert!(err.to_string().contains("http://localhost:5000/api"), "{}", err);
}

#[test]
fn recovers_when_a_retry_succeeds() {
    let transport = MockTransport::new();
    transport
        .reply("/health", Reply::Unreachable)
        .json("/health", json!({"status": "ok"}));
    let client = mock_client(&transport, &InstantDelay::new());

    let body = block_on(client.request_json::<Value>("/health", RequestOptions::get())).unwrap();

    assert_eq!(body, json!({"status": "ok"}));
    assert_eq!(transport.calls("/health"), 2);
}

#[test]
fn timeout_is_surfaced_without_retry() {
    let transport = MockTransport::new();
    transport.reply("/correlation", Reply::Hang);
    let delay = InstantDelay::new();
    let client = mock_client(&transport, &delay);

    let err = block_on(client.request_json::<Value>("/correlation", RequestOptions::get())).unwrap_err();

    assert_eq!(err, AppError::Timeout(TIMEOUT));
    assert_eq!(err.to_string(), "Request timed out after 60000 ms");
    assert_eq!(transport.calls("/correlation"), 1);
    assert_eq!(delay.slept(), vec![TIMEOUT]);
}

#[test]
fn server_error_carries_backend_message_and_is_not_retried() {
    let transport = MockTransport::new();
    transport.reply(
        "/correlation",
        Reply::Status(500, json!({"error": "Not enough data for GC=F"}).to_string()),
    );
    let client = mock_client(&transport, &InstantDelay::new());

    let err = block_on(client.request_json::<Value>("/correlation", RequestOptions::get())).unwrap_err();

    assert_eq!(
        err,
        AppError::Server {
            status: 500,
            message: "Not enough data for GC=F".to_string()
        }
    );
    assert_eq!(transport.calls("/correlation"), 1);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let transport = MockTransport::new();
    transport.reply("/assets", Reply::Status(200, "<!doctype html>".to_string()));
    let client = mock_client(&transport, &InstantDelay::new());

    let err = block_on(client.request_json::<Value>("/assets", RequestOptions::get())).unwrap_err();

    assert!(matches!(err, AppError::Parse(_)));
    assert_eq!(transport.calls("/assets"), 1);
}

#[test]
fn json_post_sets_method_headers_and_body() {
    let transport = MockTransport::new();
    transport.json("/search-assets", json!({"results": []}));
    let client = mock_client(&transport, &InstantDelay::new());

    let options = RequestOptions::post_json(&json!({"query": "nvda"}))
        .unwrap()
        .header("X-Client", "tests");
    let _: Value = block_on(client.request_json("/search-assets", options)).unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "http://localhost:5000/api/search-assets");
    assert!(
        request
            .headers
            .contains(&("Content-Type".to_string(), "application/json".to_string()))
    );
    assert!(
        request
            .headers
            .contains(&("X-Client".to_string(), "tests".to_string()))
    );
    assert_eq!(transport.last_body("/search-assets"), Some(json!({"query": "nvda"})));
}

#[test]
fn status_only_request_ignores_a_plain_text_body() {
    let transport = MockTransport::new();
    transport.reply("/health", Reply::Status(200, "OK".to_string()));
    let client = mock_client(&transport, &InstantDelay::new());

    assert_eq!(block_on(client.request_status("/health", RequestOptions::get())), Ok(()));
    assert_eq!(transport.calls("/health"), 1);
}

#[test]
fn status_only_request_still_reports_server_errors() {
    let transport = MockTransport::new();
    transport.reply("/health", Reply::Status(503, "Service Unavailable".to_string()));
    let client = mock_client(&transport, &InstantDelay::new());

    let err = block_on(client.request_status("/health", RequestOptions::get())).unwrap_err();

    assert_eq!(
        err,
        AppError::Server {
            status: 503,
            message: "HTTP status 503".to_string()
        }
    );
}
