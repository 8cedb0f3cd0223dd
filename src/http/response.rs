//! Response handling and transformation.
//!
//! # Responsibilities
//! - Serialize an `OutboundResponse` onto the wire
//! - Decode base64 bodies back to raw bytes
//!
//! # Design Decisions
//! - Backend headers are relayed except framing headers, which the
//!   server recomputes for the body actually sent
//! - `multiValueHeaders` entries are written one line per value
//! - An out-of-range status or undecodable body becomes a 502

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::forwarder::encoding::decode_base64;
use crate::forwarder::OutboundResponse;

/// Headers describing the backend's framing, not ours.
const FRAMING_HEADERS: [&str; 3] = ["content-length", "transfer-encoding", "connection"];

/// Convert a forwarder result into an HTTP response.
pub fn into_http_response(out: OutboundResponse) -> Response {
    let body = if out.is_base64_encoded {
        match decode_base64(&out.body) {
            Ok(bytes) => Body::from(bytes),
            Err(e) => return into_http_response(e.into_response()),
        }
    } else {
        Body::from(out.body)
    };

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::from_u16(out.status_code).unwrap_or(StatusCode::BAD_GATEWAY);

    let headers = response.headers_mut();
    for (name, values) in &out.multi_value_headers {
        for value in values {
            append_header(headers, name, value);
        }
    }
    for (name, value) in &out.headers {
        let repeated = out
            .multi_value_headers
            .keys()
            .any(|multi| multi.eq_ignore_ascii_case(name));
        if !repeated {
            append_header(headers, name, value);
        }
    }

    response
}

fn append_header(headers: &mut HeaderMap, name: &str, value: &str) {
    if FRAMING_HEADERS.iter().any(|f| name.eq_ignore_ascii_case(f)) {
        return;
    }
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(value)) => {
            headers.append(name, value);
        }
        _ => tracing::warn!(header = %name, "Dropping unrepresentable response header"),
    }
}

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        into_http_response(self)
    }
}
