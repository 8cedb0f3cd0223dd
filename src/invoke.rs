//! One-shot, function-style invocation.
//!
//! Reads a single function event as JSON, forwards it, and writes the
//! response back as JSON: `{"statusCode", "headers", "body", "isBase64Encoded"}`.

use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::forwarder::{Forwarder, InboundRequest, OutboundResponse};

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to read event: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed event JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read the raw event from `path`, or stdin when `path` is `None` or `-`.
pub fn read_event(path: Option<&Path>) -> Result<String, InvokeError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Forward one JSON event and return the JSON response.
pub async fn invoke(forwarder: &Forwarder, event: &str) -> Result<String, InvokeError> {
    let request: InboundRequest = serde_json::from_str(event)?;
    let response: OutboundResponse = forwarder.forward(&request).await;
    Ok(serde_json::to_string(&response)?)
}
