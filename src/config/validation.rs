//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Backend origin must be an absolute http(s) URL when present
//! - Bind and metrics addresses must parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - A missing origin is not an error here; it is reported per request

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.base_url {url:?} is not an absolute URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("backend.base_url {0:?} must use http or https")]
    UnsupportedScheme(String),

    #[error("backend.base_url {0:?} must not carry a query or fragment")]
    BaseUrlHasQuery(String),

    #[error("backend.mount_path {0:?} must start with '/'")]
    InvalidMountPath(String),

    #[error("{field} {value:?} is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a parsed configuration for semantic problems.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(origin) = config.backend.origin() {
        if let Err(e) = validate_origin(origin) {
            errors.push(e);
        }
    }

    if !config.backend.mount_path.starts_with('/') {
        errors.push(ValidationError::InvalidMountPath(
            config.backend.mount_path.clone(),
        ));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_origin(origin: &str) -> Result<(), ValidationError> {
    let url = Url::parse(origin).map_err(|e| ValidationError::InvalidBaseUrl {
        url: origin.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedScheme(origin.to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ValidationError::BaseUrlHasQuery(origin.to_string()));
    }
    Ok(())
}
