//! Path rewrite and target URL construction.
//!
//! # Design Decisions
//! - The mount prefix is stripped only as whole leading path segments
//! - Path and query pass through verbatim; nothing is re-encoded

/// Strip `mount_path` from the front of `path`; an empty remainder becomes `/`.
///
/// The prefix only matches at a segment boundary: `/proxy/x` and `/proxy`
/// are rewritten, `/proxyX` is passed through untouched.
pub fn rewrite_path<'a>(path: &'a str, mount_path: &str) -> &'a str {
    let rest = match path.strip_prefix(mount_path) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    };
    if rest.is_empty() {
        "/"
    } else {
        rest
    }
}

/// Join origin, rewritten path, and query into the backend URL.
pub fn target_url(base_url: &str, path: &str, mount_path: &str, raw_query: Option<&str>) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let path = rewrite_path(path, mount_path);

    match raw_query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{}{}?{}", base, path, query),
        None => format!("{}{}", base, path),
    }
}
