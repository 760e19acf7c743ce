use std::time::Duration;

use carryover_config::GatewayConfig;
use carryover_protocols::ContextError;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::client::classify;

fn gateway_for(base_url: &str) -> BackendGateway {
    gateway_with_timeout(base_url, 5)
}

fn gateway_with_timeout(base_url: &str, timeout_secs: u64) -> BackendGateway {
    let config = GatewayConfig {
        base_url: base_url.to_string(),
        timeout_secs,
    };
    BackendGateway::new(&config).unwrap()
}

/// A local address with nothing listening on it.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[test]
fn test_scrape_request_defaults() {
    let req: ScrapeRequest = serde_json::from_value(json!({"url": "https://example.com"})).unwrap();
    assert_eq!(req, ScrapeRequest::new("https://example.com"));
    assert!(!req.summarize);
    assert_eq!(req.word_limit, 200);
}

#[test]
fn test_base_url_trailing_slash_is_dropped() {
    let gateway = gateway_for("http://127.0.0.1:8000/");
    assert_eq!(gateway.base_url(), "http://127.0.0.1:8000");
}

#[test]
fn test_classify_prefers_field_order() {
    let body = json!({"result": "late", "summary": "first"}).to_string();
    assert_eq!(classify(StatusCode::OK, &body, "scrape").unwrap(), "first");
}

#[test]
fn test_classify_skips_blank_fields() {
    let body = json!({"summary": "  ", "output": "fallback"}).to_string();
    assert_eq!(classify(StatusCode::OK, &body, "scrape").unwrap(), "fallback");
}

#[test]
fn test_classify_non_object_is_malformed() {
    let err = classify(StatusCode::OK, "\"just a string\"", "scrape").unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
}

#[test]
fn test_classify_server_error_without_body() {
    let err = classify(StatusCode::BAD_GATEWAY, "", "scrape").unwrap_err();
    match err {
        GatewayError::Server { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_summarize_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize-conversation"))
        .and(body_json(json!({"raw_conversation": "You said: hi"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "success", "summary": "- greeting"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server.uri());
    let summary = gateway.summarize("You said: hi").await.unwrap();
    assert_eq!(summary, "- greeting");
}

#[tokio::test]
async fn test_scrape_sends_defaults_and_reads_extracted_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .and(body_json(json!({
            "url": "https://example.com/post",
            "summarize": false,
            "word_limit": 200
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "url": "https://example.com/post",
            "extracted_text": "Article body"
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server.uri());
    let text = gateway
        .scrape(&ScrapeRequest::new("https://example.com/post"))
        .await
        .unwrap();
    assert_eq!(text, "Article body");
}

#[tokio::test]
async fn test_scrape_summary_with_word_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .and(body_json(json!({
            "url": "https://example.com",
            "summarize": true,
            "word_limit": 50
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "Short."})))
        .mount(&server)
        .await;

    let request = ScrapeRequest::new("https://example.com")
        .with_summarize(true)
        .with_word_limit(50);
    let text = gateway_for(&server.uri()).scrape(&request).await.unwrap();
    assert_eq!(text, "Short.");
}

#[tokio::test]
async fn test_empty_payload_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success", "extracted_text": ""})))
        .mount(&server)
        .await;

    let err = gateway_for(&server.uri())
        .scrape(&ScrapeRequest::new("https://example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ContextError::EmptyResult(_)));
}

#[tokio::test]
async fn test_server_error_carries_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "Request error: timeout"})))
        .mount(&server)
        .await;

    let err = gateway_for(&server.uri())
        .scrape(&ScrapeRequest::new("https://example.com"))
        .await
        .unwrap_err();
    match err {
        ContextError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Request error: timeout");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_reads_message_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize-conversation"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"status": "error", "message": "quota exhausted"})),
        )
        .mount(&server)
        .await;

    let err = gateway_for(&server.uri()).summarize("text").await.unwrap_err();
    assert!(err.to_string().contains("quota exhausted"));
}

#[tokio::test]
async fn test_client_error_is_http_kind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "url missing"})))
        .mount(&server)
        .await;

    let err = gateway_for(&server.uri())
        .scrape(&ScrapeRequest::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, ContextError::Http { status: 422 }));
}

#[tokio::test]
async fn test_unparseable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize-conversation"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let err = gateway_for(&server.uri()).summarize("text").await.unwrap_err();
    assert!(matches!(err, ContextError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_network_failure() {
    let base_url = closed_port_url();
    let err = gateway_for(&base_url).summarize("text").await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(
        err.to_string(),
        format!("Could not reach the context service at {}. Is it running?", base_url)
    );
}

#[tokio::test]
async fn test_slow_service_is_timeout_not_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize-conversation"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "summary": "late" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = gateway_with_timeout(&server.uri(), 1)
        .summarize("text")
        .await
        .unwrap_err();

    assert!(matches!(err, ContextError::Timeout(_)));
    assert!(!err.is_retryable());
    assert_eq!(
        err.to_string(),
        format!("The context service at {} did not answer within 1s", server.uri())
    );
}
