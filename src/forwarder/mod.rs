//! Request forwarding core.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → rewrite.rs (strip mount path, build target URL)
//!     → headers.rs (drop host / content-length)
//!     → encoding.rs (base64 → bytes when flagged)
//!     → backend call (reqwest, redirects never followed)
//!     → encoding.rs (classify content-type: text vs base64)
//!     → OutboundResponse
//! ```
//!
//! # Design Decisions
//! - One invocation, one backend call, one response; no retries
//! - Every failure is converted to a response (500 or 502), never propagated
//! - The forwarder is immutable and shared via `Arc` across requests
//! - The joined target must stay on the configured origin (scheme, host, port)

pub mod encoding;
pub mod error;
pub mod event;
pub mod headers;
pub mod rewrite;

use std::time::{Duration, Instant};

use reqwest::{redirect, Client, Method, Url};

use crate::config::{BackendConfig, TimeoutConfig};
use crate::observability::metrics;

pub use encoding::BodyEncoding;
pub use error::ForwardError;
pub use event::{InboundRequest, OutboundResponse};

/// Forwards normalized requests to a single backend origin.
#[derive(Debug, Clone)]
pub struct Forwarder {
    backend: BackendConfig,
    client: Client,
}

impl Forwarder {
    /// Build a forwarder with the given backend and timeouts.
    pub fn new(backend: BackendConfig, timeouts: &TimeoutConfig) -> Result<Self, ForwardError> {
        let mut builder = Client::builder().redirect(redirect::Policy::none());
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self::with_client(backend, builder.build()?))
    }

    /// Use a caller-supplied client. It should not follow redirects.
    pub fn with_client(backend: BackendConfig, client: Client) -> Self {
        Self { backend, client }
    }

    /// Forward one request and produce exactly one response.
    pub async fn forward(&self, req: &InboundRequest) -> OutboundResponse {
        let start_time = Instant::now();

        match self.try_forward(req).await {
            Ok(response) => {
                tracing::info!(
                    method = %req.method,
                    path = %req.path,
                    status = response.status_code,
                    base64 = response.is_base64_encoded,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Forwarded request"
                );
                let encoding = BodyEncoding::from_flag(response.is_base64_encoded);
                metrics::record_forward(&req.method, response.status_code, encoding.as_str(), start_time);
                response
            }
            Err(e) => {
                if e.is_configuration() {
                    tracing::error!(error = %e, "Backend origin missing, set BACKEND_URL");
                } else {
                    tracing::warn!(method = %req.method, path = %req.path, error = %e, "Forwarding failed");
                }
                let response = e.into_response();
                metrics::record_forward(&req.method, response.status_code, "error", start_time);
                response
            }
        }
    }

    async fn try_forward(&self, req: &InboundRequest) -> Result<OutboundResponse, ForwardError> {
        let origin = self.backend.origin().ok_or(ForwardError::MissingBackendUrl)?;

        let target = rewrite::target_url(
            origin,
            &req.path,
            &self.backend.mount_path,
            req.raw_query.as_deref(),
        );
        let url = parse_url(&target)?;
        if !same_origin(&parse_url(origin)?, &url) {
            return Err(ForwardError::OriginMismatch(target));
        }
        let method = Method::from_bytes(req.method.as_bytes())
            .map_err(|_| ForwardError::InvalidMethod(req.method.clone()))?;
        let headers = headers::to_header_map(&headers::sanitize(&req.headers))?;
        let body = encoding::decode_body(req.body.as_deref(), req.is_base64_encoded)?;

        tracing::debug!(method = %method, target = %url, has_body = body.is_some(), "Dispatching to backend");

        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }
        let response = request.send().await?;

        let status_code = response.status().as_u16();
        let response_headers = headers::to_string_map(response.headers());
        let multi_value_headers = headers::to_multi_value_map(response.headers());
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let (body, is_base64_encoded) = match BodyEncoding::classify(content_type) {
            BodyEncoding::Text => (response.text().await?, false),
            BodyEncoding::Base64 => (encoding::encode_base64(&response.bytes().await?), true),
        };

        Ok(OutboundResponse {
            status_code,
            headers: response_headers,
            multi_value_headers,
            body,
            is_base64_encoded,
        })
    }
}

fn parse_url(url: &str) -> Result<Url, ForwardError> {
    Url::parse(url).map_err(|source| ForwardError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Scheme, host, port, and credentials must all match.
fn same_origin(origin: &Url, target: &Url) -> bool {
    origin.origin() == target.origin()
        && origin.username() == target.username()
        && origin.password() == target.password()
}
