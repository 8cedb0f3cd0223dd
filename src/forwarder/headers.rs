//! Header hygiene for both directions of a forwarded exchange.
//!
//! # Responsibilities
//! - Drop `host` and `content-length` from forwarded request headers
//! - Convert between string maps and `reqwest` header maps
//! - Copy backend response headers back without filtering
//! - Keep every value of repeated response headers (`set-cookie`)
//!
//! # Design Decisions
//! - Name comparison is ASCII case-insensitive
//! - The transport recomputes `content-length` from the forwarded body

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::forwarder::error::ForwardError;

/// Request headers never copied to the backend.
pub const STRIPPED_REQUEST_HEADERS: [&str; 2] = ["host", "content-length"];

/// Copy `headers`, dropping the ones the backend call must recompute.
pub fn sanitize(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter(|(name, _)| !is_stripped(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn is_stripped(name: &str) -> bool {
    STRIPPED_REQUEST_HEADERS
        .iter()
        .any(|stripped| name.eq_ignore_ascii_case(stripped))
}

/// Build the outbound header map. Invalid names or values fail the request.
pub fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ForwardError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ForwardError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| ForwardError::InvalidHeader(name.clone()))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// Flatten a header map into name → value, joining repeats with `", "`.
pub fn to_string_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        map.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    map
}

/// Every value of each header that occurs more than once, in arrival order.
///
/// Values such as `set-cookie` cannot be comma-joined safely, so the
/// flattened map alone would lose them.
pub fn to_multi_value_map(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    headers
        .keys()
        .filter_map(|name| {
            let values: Vec<String> = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            (values.len() > 1).then(|| (name.as_str().to_string(), values))
        })
        .collect()
}
