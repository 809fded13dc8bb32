//! Response formatting: pretty JSON body and pagination `Link` header.

use axum::{
    body::Body,
    http::{self, header, HeaderValue, StatusCode},
    response::Response,
};

use super::error::DispatchError;
use crate::api::PagedResult;

/// Build the RFC 5988 `Link` value for the cursors of `paged`, if any.
///
/// Each entry is `<{base}{path}?{cursor}>; rel="…"`; entries are joined
/// into a single header value.
pub fn link_header(base: &str, path: &str, paged: &PagedResult) -> Option<String> {
    let links: Vec<String> = [("prev", paged.prev.as_deref()), ("next", paged.next.as_deref())]
        .into_iter()
        .filter_map(|(rel, cursor)| {
            cursor.map(|cursor| format!("<{}{}?{}>; rel=\"{}\"", base, path, cursor, rel))
        })
        .collect();

    if links.is_empty() {
        None
    } else {
        Some(links.join(", "))
    }
}

/// Turn a provider result into a 200 response.
pub fn format(paged: &PagedResult, base: &str, path: &str) -> Result<Response, DispatchError> {
    let body = serde_json::to_string_pretty(&paged.result)
        .map_err(|e| DispatchError::Response(e.to_string()))?;

    let mut builder = http::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(link) = link_header(base, path, paged) {
        let value = HeaderValue::from_str(&link)
            .map_err(|e| DispatchError::Response(format!("invalid Link header: {}", e)))?;
        builder = builder.header(header::LINK, value);
    }

    builder
        .body(Body::from(body))
        .map_err(|e| DispatchError::Response(e.to_string()))
}
