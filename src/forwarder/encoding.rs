//! Payload encoding decisions.
//!
//! Bodies travel between the hosting layer and the forwarder as strings.
//! Textual payloads stay as-is; everything else is carried as base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::forwarder::error::ForwardError;

/// Content-type fragments that mark a payload as text.
const TEXTUAL_MARKERS: [&str; 4] = ["json", "javascript", "xml", "x-www-form-urlencoded"];

/// How a body is carried in an `OutboundResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Text,
    Base64,
}

impl BodyEncoding {
    /// Classify a `content-type` header value.
    ///
    /// Substring heuristic: `text/*`, or anything mentioning json,
    /// javascript, xml, or form-urlencoded. An empty value is binary.
    pub fn classify(content_type: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();
        let textual = content_type.starts_with("text/")
            || TEXTUAL_MARKERS.iter().any(|m| content_type.contains(m));

        if textual {
            BodyEncoding::Text
        } else {
            BodyEncoding::Base64
        }
    }

    /// Recover the encoding from an `isBase64Encoded` flag.
    pub fn from_flag(is_base64_encoded: bool) -> Self {
        if is_base64_encoded {
            BodyEncoding::Base64
        } else {
            BodyEncoding::Text
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BodyEncoding::Text => "text",
            BodyEncoding::Base64 => "base64",
        }
    }
}

/// Turn an inbound body into the bytes sent to the backend.
///
/// `None` (or an empty body) means the request carries no body at all.
pub fn decode_body(body: Option<&str>, is_base64: bool) -> Result<Option<Vec<u8>>, ForwardError> {
    match body {
        None | Some("") => Ok(None),
        Some(body) if is_base64 => Ok(Some(STANDARD.decode(body)?)),
        Some(body) => Ok(Some(body.as_bytes().to_vec())),
    }
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(body: &str) -> Result<Vec<u8>, ForwardError> {
    Ok(STANDARD.decode(body)?)
}
