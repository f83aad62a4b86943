//! Integration tests: curl transport against a local scripted HTTP server.
//!
//! Exercises the full path (transport, validation, classification, retry
//! loop) over real sockets.

mod common;

use common::scripted_server::{self, request_header, Scripted};
use std::time::Duration;
use tenacious_core::{
    BearerToken, CurlTransport, ExecutionRequest, Method, NetworkError, OutboundRequest,
    RequestExecutor,
};

fn request(url: &str, max_attempts: u32) -> ExecutionRequest {
    ExecutionRequest::new(OutboundRequest::get(url).unwrap())
        .with_max_attempts(max_attempts)
        .unwrap()
        .with_retry_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn unavailable_twice_then_success() {
    let server = scripted_server::start(vec![
        Scripted::new(503, b""),
        Scripted::new(503, b""),
        Scripted::new(200, b"hello"),
    ]);
    let ex = RequestExecutor::new(CurlTransport::default());
    let outcome = ex.execute(&request(&server.url, 5)).await;
    assert_eq!(outcome, Ok(b"hello".to_vec()));
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn not_found_is_permanent_and_keeps_diagnostics() {
    let server = scripted_server::start(vec![Scripted::new(404, b"no such thing")]);
    let ex = RequestExecutor::new(CurlTransport::default());
    let outcome = ex.execute(&request(&server.url, 5)).await;
    assert_eq!(server.hits(), 1);
    match outcome {
        Err(NetworkError::EndpointError {
            status,
            headers,
            body,
        }) => {
            assert_eq!(status, 404);
            assert_eq!(body, b"no such thing".to_vec());
            assert!(headers
                .iter()
                .any(|(k, v)| k.eq_ignore_ascii_case("x-scripted") && v == "yes"));
        }
        other => panic!("expected endpoint error, got {:?}", other),
    }
}

#[tokio::test]
async fn gateway_timeouts_exhaust_budget() {
    let server = scripted_server::start(vec![Scripted::new(504, b"")]);
    let ex = RequestExecutor::new(CurlTransport::default());
    let outcome = ex.execute(&request(&server.url, 3)).await;
    assert_eq!(outcome, Err(NetworkError::Exhausted));
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn empty_body_respects_flag() {
    let server = scripted_server::start(vec![Scripted::new(200, b"")]);
    let ex = RequestExecutor::new(CurlTransport::default());

    let strict = ex.execute(&request(&server.url, 5)).await;
    assert_eq!(strict, Err(NetworkError::NoResponseData { status: 200 }));
    assert_eq!(server.hits(), 1);

    let lenient = ex
        .execute(&request(&server.url, 5).with_allow_empty_body(true))
        .await;
    assert_eq!(lenient, Ok(Vec::new()));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn refused_connection_is_retried_until_exhausted() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let ex = RequestExecutor::new(CurlTransport::default());
    let outcome = ex
        .execute(&request(&format!("http://127.0.0.1:{}/", port), 2))
        .await;
    assert_eq!(outcome, Err(NetworkError::Exhausted));
}

#[tokio::test]
async fn bearer_token_and_body_reach_server() {
    let server = scripted_server::start(vec![Scripted::new(408, b""), Scripted::new(201, b"created")]);
    let ex = RequestExecutor::new(CurlTransport::default()).with_authenticator(BearerToken::new("t0k"));
    let outbound = OutboundRequest::new(Method::Post, &server.url)
        .unwrap()
        .with_header("Content-Type", "application/json")
        .with_body(br#"{"a":1}"#.to_vec());
    let req = ExecutionRequest::new(outbound)
        .with_retry_interval(Duration::ZERO);

    assert_eq!(ex.execute(&req).await, Ok(b"created".to_vec()));
    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    for raw in &requests {
        assert!(raw.starts_with("POST "));
        assert_eq!(request_header(raw, "authorization"), Some("Bearer t0k"));
        assert_eq!(request_header(raw, "content-type"), Some("application/json"));
    }
}

#[tokio::test]
async fn callback_form_over_real_transport() {
    let server = scripted_server::start(vec![Scripted::new(599, b""), Scripted::new(200, b"cb")]);
    let ex = RequestExecutor::new(CurlTransport::default());
    let (tx, rx) = tokio::sync::oneshot::channel();
    let handle = ex
        .execute_with_callback(request(&server.url, 4), move |outcome| {
            let _ = tx.send(outcome);
        })
        .unwrap();
    assert_eq!(rx.await.unwrap(), Ok(b"cb".to_vec()));
    handle.join().await.unwrap();
    assert_eq!(server.hits(), 2);
}
