//! Inbound and outbound descriptors exchanged with the hosting layer.
//!
//! Both serialize in function-event form (`httpMethod`, `rawQuery`,
//! `isBase64Encoded`, `statusCode`, `multiValueHeaders`) so the `invoke`
//! mode can read and write them as JSON directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One normalized inbound request, produced by the hosting layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InboundRequest {
    #[serde(rename = "httpMethod")]
    pub method: String,
    pub path: String,
    pub raw_query: Option<String>,
    /// Header names compare case-insensitively.
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

impl InboundRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.raw_query = Some(query.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a plain-text body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = false;
        self
    }

    /// Attach a body that is already base64-encoded.
    pub fn with_base64_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = true;
        self
    }
}

/// The single response handed back to the hosting layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundResponse {
    pub status_code: u16,
    /// One value per name; repeats are joined with `", "`.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Every value of each header the backend sent more than once.
    /// Takes precedence over `headers` when written to the wire.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub multi_value_headers: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl OutboundResponse {
    /// A plain-text response with no headers.
    pub fn text(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            multi_value_headers: BTreeMap::new(),
            body: body.into(),
            is_base64_encoded: false,
        }
    }
}
