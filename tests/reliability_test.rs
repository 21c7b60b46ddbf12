#![cfg(feature = "natural-language-classifier")]

use metrics_util::debugging::DebuggingRecorder;
use serde_json::json;
use std::time::{Duration, Instant};
use watson_sdk::api::RetryConfig;
use watson_sdk::error::ServiceError;
use watson_sdk::service::NaturalLanguageClassifier;
use watson_sdk::traits::Service;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn client(server: &MockServer) -> NaturalLanguageClassifier {
    common::init_tracing();
    NaturalLanguageClassifier::with_username_and_password("user", "pass").with_endpoint(&server.uri())
}

fn classifiers_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "classifiers": [{ "classifier_id": "a" }] }))
}

#[tokio::test]
async fn test_timeout_enforced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/classifiers"))
        .respond_with(classifiers_ok().set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let mut service = client(&server);
    service.base_mut().set_timeout(Some(Duration::from_millis(200)));

    let start = Instant::now();
    let res = service.get_classifiers().await;
    match res.unwrap_err() {
        ServiceError::Timeout => (),
        e => panic!("Expected Timeout error, got: {}", e),
    }
    // It should have failed around the timeout, not after the delay.
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_metrics_recorded() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let _ = metrics::set_global_recorder(recorder);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/classifiers"))
        .respond_with(classifiers_ok())
        .mount(&server)
        .await;

    client(&server).get_classifiers().await.unwrap();

    let snapshot = snapshotter.snapshot();
    let counter_found = snapshot.into_vec().into_iter().any(|(ckey, _, _, _)| {
        let key = ckey.key();
        let has_label = |k: &str, v: &str| key.labels().any(|l| l.key() == k && l.value() == v);

        key.name() == "service_request.total"
            && has_label("service", "natural_language_classifier")
            && has_label("operation", "get_classifiers")
            && has_label("status", "success")
    });
    assert!(counter_found, "Request counter not found");
}

#[tokio::test]
async fn test_retry_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/classifiers"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/classifiers"))
        .respond_with(classifiers_ok())
        .expect(1)
        .mount(&server)
        .await;

    let mut service = client(&server);
    service.base_mut().set_retry(Some(RetryConfig {
        max_attempts: 3,
        initial_backoff_ms: 10,
    }));

    let res = service.get_classifiers().await;
    assert!(
        res.is_ok(),
        "Expected success after retries, got: {:?}",
        res.err()
    );
}

#[tokio::test]
async fn test_retry_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/classifiers"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .expect(3)
        .mount(&server)
        .await;

    let mut service = client(&server);
    service.base_mut().set_retry(Some(RetryConfig {
        max_attempts: 3,
        initial_backoff_ms: 10,
    }));

    let err = service.get_classifiers().await.unwrap_err();
    assert!(matches!(err, ServiceError::InternalServerError(ref m) if m == "boom"));
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/classifiers"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).get_classifiers().await.unwrap_err();
    assert!(matches!(err, ServiceError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/classifiers/x"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = client(&server);
    service.base_mut().set_retry(Some(RetryConfig {
        max_attempts: 5,
        initial_backoff_ms: 10,
    }));

    let err = service.get_classifier("x").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_circuit_breaker_fails_fast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/classifiers"))
        .respond_with(ResponseTemplate::new(503))
        .expect(5)
        .mount(&server)
        .await;

    let service = client(&server);
    for _ in 0..5 {
        let err = service.get_classifiers().await.unwrap_err();
        assert!(matches!(err, ServiceError::ServiceUnavailable(_)));
    }

    // The breaker is open now; the server sees no sixth request.
    let err = service.get_classifiers().await.unwrap_err();
    assert!(matches!(err, ServiceError::Unavailable));
}

#[cfg(feature = "alchemy-language")]
#[tokio::test]
async fn test_alchemy_in_band_rate_limit_is_retried() {
    use watson_sdk::service::{AlchemyLanguage, AlchemyRequest};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text/TextGetRankedKeywords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ERROR",
            "statusInfo": "daily-transaction-limit-exceeded"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/text/TextGetRankedKeywords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "keywords": [{ "text": "retry", "relevance": "0.9" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = AlchemyLanguage::with_api_key("k").with_endpoint(&server.uri());
    service.base_mut().set_retry(Some(RetryConfig {
        max_attempts: 2,
        initial_backoff_ms: 10,
    }));

    let keywords = service
        .get_keywords(&AlchemyRequest::text("please retry"))
        .await
        .unwrap();
    assert_eq!(keywords.keywords[0].text.as_deref(), Some("retry"));
}
