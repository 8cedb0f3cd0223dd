//! Forwarding errors and their mapping onto gateway responses.

use thiserror::Error;

use crate::forwarder::event::OutboundResponse;

/// Body returned when no backend origin is configured.
pub const MISSING_BACKEND_MESSAGE: &str =
    "Missing BACKEND_URL environment variable. Set it to the backend origin, e.g. https://example.com";

/// Prefix of every forwarding-failure body.
pub const PROXY_ERROR_PREFIX: &str = "Proxy error: ";

/// Everything that can stop a request from reaching the backend or coming back.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Deployment misconfiguration; never retried, never hits the network.
    #[error("backend URL is not configured")]
    MissingBackendUrl,

    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    #[error("invalid header {0:?}")]
    InvalidHeader(String),

    #[error("invalid target URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The joined URL resolves to a different scheme, host, or port than the origin.
    #[error("target URL {0:?} leaves the configured backend origin")]
    OriginMismatch(String),

    #[error("invalid base64 body: {0}")]
    BodyDecode(#[from] base64::DecodeError),

    #[error("{}", describe_upstream(.0))]
    Upstream(#[from] reqwest::Error),
}

impl ForwardError {
    /// Status code reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            ForwardError::MissingBackendUrl => 500,
            _ => 502,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ForwardError::MissingBackendUrl)
    }

    /// Convert into the response handed back to the hosting layer.
    pub fn into_response(self) -> OutboundResponse {
        match self {
            ForwardError::MissingBackendUrl => OutboundResponse::text(500, MISSING_BACKEND_MESSAGE),
            other => OutboundResponse::text(
                other.status_code(),
                format!("{}{}", PROXY_ERROR_PREFIX, other),
            ),
        }
    }
}

/// Display of a reqwest error followed by its whole source chain.
fn describe_upstream(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message = format!("{}: {}", message, cause);
        source = std::error::Error::source(cause);
    }
    message
}
