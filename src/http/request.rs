//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) when the client sent none
//! - Turn a real HTTP request into an `InboundRequest`
//!
//! # Design Decisions
//! - Request ID is set before tracing so every request span records it
//! - The request ID header is forwarded to the backend like any other header
//! - Bodies are base64-encoded unless textual and valid UTF-8

use axum::body::Bytes;
use axum::http::{header, request::Parts, HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use tower_http::trace::MakeSpan;
use uuid::Uuid;

use crate::forwarder::encoding::{self, BodyEncoding};
use crate::forwarder::headers;
use crate::forwarder::InboundRequest;

/// Request ID header name.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID carried by `headers`, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Opens one `request` span per request with its `request_id` recorded.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdSpan;

impl<B> MakeSpan<B> for RequestIdSpan {
    fn make_span(&mut self, request: &Request<B>) -> tracing::Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
            request_id = %request_id(request.headers()),
        )
    }
}

/// Build the forwarder's view of an HTTP request.
pub fn inbound_from_parts(parts: &Parts, body: Bytes) -> InboundRequest {
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let (body, is_base64_encoded) = encode_request_body(&body, BodyEncoding::classify(content_type));

    InboundRequest {
        method: parts.method.as_str().to_string(),
        path: parts.uri.path().to_string(),
        raw_query: parts.uri.query().map(str::to_string),
        headers: headers::to_string_map(&parts.headers),
        body,
        is_base64_encoded,
    }
}

fn encode_request_body(body: &Bytes, hint: BodyEncoding) -> (Option<String>, bool) {
    if body.is_empty() {
        return (None, false);
    }
    if hint == BodyEncoding::Text {
        if let Ok(text) = std::str::from_utf8(body) {
            return (Some(text.to_string()), false);
        }
    }
    (Some(encoding::encode_base64(body)), true)
}
