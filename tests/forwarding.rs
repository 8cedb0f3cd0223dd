//! Forwarder behaviour against a live mock backend.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use edge_forwarder::config::{BackendConfig, TimeoutConfig};
use edge_forwarder::forwarder::{Forwarder, InboundRequest};

mod common;

use common::MockResponse;

fn forwarder_for(addr: std::net::SocketAddr) -> Forwarder {
    Forwarder::new(
        BackendConfig::new(format!("http://{}", addr)),
        &TimeoutConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_rewrites_path_and_query() {
    let (addr, mut seen) =
        common::start_mock_backend(MockResponse::new(200).header("Content-Type", "text/plain").body("ok")).await;

    let req = InboundRequest::new("GET", "/.netlify/functions/proxy/api/items").with_query("x=1");
    let response = forwarder_for(addr).forward(&req).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "ok");
    assert!(!response.is_base64_encoded);

    let captured = seen.recv().await.unwrap();
    assert_eq!(captured.request_line(), "GET /api/items?x=1 HTTP/1.1");
    assert!(captured.body.is_empty());
    assert_eq!(captured.header("content-length"), None);
}

#[tokio::test]
async fn test_bare_mount_path_hits_root() {
    let (addr, mut seen) = common::start_mock_backend(MockResponse::new(204)).await;

    let response = forwarder_for(addr)
        .forward(&InboundRequest::new("GET", "/.netlify/functions/proxy").with_query(""))
        .await;

    assert_eq!(response.status_code, 204);
    assert_eq!(seen.recv().await.unwrap().target(), "/");
}

#[tokio::test]
async fn test_json_error_status_relayed_as_text() {
    let (addr, _seen) = common::start_mock_backend(
        MockResponse::new(404)
            .header("Content-Type", "application/json")
            .body("{\"err\":true}"),
    )
    .await;

    let response = forwarder_for(addr)
        .forward(&InboundRequest::new("GET", "/.netlify/functions/proxy/missing"))
        .await;

    assert_eq!(response.status_code, 404);
    assert_eq!(response.body, "{\"err\":true}");
    assert!(!response.is_base64_encoded);
    assert_eq!(response.headers["content-type"], "application/json");
}

#[tokio::test]
async fn test_binary_response_is_base64() {
    let png: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
    let (addr, _seen) = common::start_mock_backend(
        MockResponse::new(200)
            .header("Content-Type", "image/png")
            .body(png.clone()),
    )
    .await;

    let response = forwarder_for(addr)
        .forward(&InboundRequest::new("GET", "/.netlify/functions/proxy/logo.png"))
        .await;

    assert_eq!(response.status_code, 200);
    assert!(response.is_base64_encoded);
    assert_eq!(STANDARD.decode(&response.body).unwrap(), png);
}

#[tokio::test]
async fn test_missing_content_type_is_binary() {
    let (addr, _seen) = common::start_mock_backend(MockResponse::new(200).body("plain?")).await;

    let response = forwarder_for(addr)
        .forward(&InboundRequest::new("GET", "/.netlify/functions/proxy/raw"))
        .await;

    assert!(response.is_base64_encoded);
    assert_eq!(response.body, STANDARD.encode("plain?"));
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let (addr, mut seen) = common::start_mock_backend(
        MockResponse::new(302).header("Location", "/login"),
    )
    .await;

    let response = forwarder_for(addr)
        .forward(&InboundRequest::new("GET", "/.netlify/functions/proxy/account"))
        .await;

    assert_eq!(response.status_code, 302);
    assert_eq!(response.headers["location"], "/login");

    assert_eq!(seen.recv().await.unwrap().target(), "/account");
    assert!(seen.try_recv().is_err(), "redirect target must not be requested");
}

#[tokio::test]
async fn test_host_and_content_length_are_recomputed() {
    let (addr, mut seen) = common::start_mock_backend(MockResponse::new(201)).await;

    let req = InboundRequest::new("POST", "/.netlify/functions/proxy/items")
        .with_header("Host", "edge.example")
        .with_header("Content-Length", "9999")
        .with_header("content-type", "application/json")
        .with_header("x-custom", "kept")
        .with_body("{\"name\":\"widget\"}");
    let response = forwarder_for(addr).forward(&req).await;
    assert_eq!(response.status_code, 201);

    let captured = seen.recv().await.unwrap();
    assert_eq!(captured.header("host"), Some(addr.to_string()));
    assert_eq!(captured.header("content-length"), Some("17".to_string()));
    assert_eq!(captured.header("x-custom"), Some("kept".to_string()));
    assert_eq!(captured.body, b"{\"name\":\"widget\"}");
}

#[tokio::test]
async fn test_base64_request_body_is_decoded() {
    let (addr, mut seen) = common::start_mock_backend(MockResponse::new(200)).await;

    let raw = vec![0x00u8, 0x01, 0x02, 0xfe, 0xff];
    let req = InboundRequest::new("PUT", "/.netlify/functions/proxy/blob")
        .with_header("content-type", "application/octet-stream")
        .with_base64_body(STANDARD.encode(&raw));
    forwarder_for(addr).forward(&req).await;

    let captured = seen.recv().await.unwrap();
    assert_eq!(captured.request_line(), "PUT /blob HTTP/1.1");
    assert_eq!(captured.body, raw);
}

#[tokio::test]
async fn test_connection_refused_is_502() {
    let addr = common::unused_addr().await;

    let response = forwarder_for(addr)
        .forward(&InboundRequest::new("GET", "/.netlify/functions/proxy/api"))
        .await;

    assert_eq!(response.status_code, 502);
    assert!(response.body.starts_with("Proxy error: "));
    assert!(response.body.len() > "Proxy error: ".len());
    assert!(response.headers.is_empty());
    assert!(!response.is_base64_encoded);
}

#[tokio::test]
async fn test_request_timeout_is_502() {
    let (addr, _seen) = common::start_mock_backend(
        MockResponse::new(200).delayed(std::time::Duration::from_secs(3)),
    )
    .await;

    let timeouts = TimeoutConfig {
        connect_secs: None,
        request_secs: Some(1),
    };
    let forwarder = Forwarder::new(BackendConfig::new(format!("http://{}", addr)), &timeouts).unwrap();
    let response = forwarder
        .forward(&InboundRequest::new("GET", "/.netlify/functions/proxy/slow"))
        .await;

    assert_eq!(response.status_code, 502);
    assert!(response.body.starts_with("Proxy error: "));
}

#[tokio::test]
async fn test_glued_mount_suffix_stays_on_backend() {
    let (addr, mut seen) = common::start_mock_backend(MockResponse::new(404)).await;
    let (other, mut other_seen) = common::start_mock_backend(MockResponse::new(200).body("secret")).await;

    let path = format!("/.netlify/functions/proxy@{}/secret", other);
    let response = forwarder_for(addr).forward(&InboundRequest::new("GET", path.clone())).await;

    assert_eq!(response.status_code, 404);
    assert_eq!(seen.recv().await.unwrap().target(), path);
    assert!(other_seen.try_recv().is_err());
}

#[tokio::test]
async fn test_path_that_escapes_origin_is_rejected() {
    let (addr, mut seen) = common::start_mock_backend(MockResponse::new(200)).await;
    let (other, mut other_seen) = common::start_mock_backend(MockResponse::new(200).body("secret")).await;

    let path = format!("@{}/secret", other);
    let response = forwarder_for(addr).forward(&InboundRequest::new("GET", path)).await;

    assert_eq!(response.status_code, 502);
    assert!(response.body.starts_with("Proxy error: target URL"));
    assert!(seen.try_recv().is_err());
    assert!(other_seen.try_recv().is_err());
}

#[tokio::test]
async fn test_repeated_set_cookie_kept_apart() {
    let (addr, _seen) = common::start_mock_backend(
        MockResponse::new(200)
            .header("Content-Type", "text/plain")
            .header("Set-Cookie", "a=1; Expires=Wed, 21 Oct 2026 07:28:00 GMT")
            .header("Set-Cookie", "b=2")
            .body("ok"),
    )
    .await;

    let response = forwarder_for(addr)
        .forward(&InboundRequest::new("GET", "/.netlify/functions/proxy/login"))
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.multi_value_headers["set-cookie"],
        vec!["a=1; Expires=Wed, 21 Oct 2026 07:28:00 GMT", "b=2"]
    );
    assert!(!response.multi_value_headers.contains_key("content-type"));
}
