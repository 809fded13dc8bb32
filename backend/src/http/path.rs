//! Request path parsing.
//!
//! Route grammar: `/{prefix}/{handler}/{since}/{contributor...}[?query]`
//! where `since` is `*` or `YYYYMMDD` and the contributor identifier spans
//! all remaining segments (it may itself contain `/`).

use std::collections::BTreeMap;

use axum::{extract::Query, http::Uri};

use crate::api::{ContributionQuery, DateFilter, InvalidDateFilter, RouteKey};

/// Why a URL does not match the route grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("URL is not a valid request target: {0}")]
    Malformed(String),

    #[error("path is not under /{0}/")]
    OutsidePrefix(String),

    #[error("missing {0} segment")]
    MissingSegment(&'static str),

    #[error(transparent)]
    Date(#[from] InvalidDateFilter),

    #[error("malformed query string: {0}")]
    Query(String),
}

/// A parsed contribution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub route: RouteKey,
    pub query: ContributionQuery,
}

/// Parse a request target (`/path?query` or an absolute URL) under `prefix`.
///
/// `prefix` is given without slashes, e.g. `author`.
pub fn parse(raw_url: &str, prefix: &str) -> Result<ParsedPath, ParseFailure> {
    let uri: Uri = raw_url
        .parse()
        .map_err(|e: axum::http::uri::InvalidUri| ParseFailure::Malformed(e.to_string()))?;

    let tail = uri
        .path()
        .strip_prefix('/')
        .and_then(|path| path.strip_prefix(prefix))
        .filter(|tail| tail.is_empty() || tail.starts_with('/'))
        .ok_or_else(|| ParseFailure::OutsidePrefix(prefix.to_string()))?;
    let rest = tail.strip_prefix('/').unwrap_or(tail);

    let mut segments = rest.split('/');
    let handler = non_empty(segments.next()).ok_or(ParseFailure::MissingSegment("handler"))?;
    let since = non_empty(segments.next()).ok_or(ParseFailure::MissingSegment("since-date"))?;

    let contributor_id = segments.collect::<Vec<_>>().join("/");
    if contributor_id.is_empty() {
        return Err(ParseFailure::MissingSegment("contributor"));
    }

    let since: DateFilter = since.parse()?;

    let Query(extra) = Query::<BTreeMap<String, String>>::try_from_uri(&uri)
        .map_err(|e| ParseFailure::Query(e.body_text()))?;

    Ok(ParsedPath {
        route: RouteKey::new(handler),
        query: ContributionQuery {
            contributor_id,
            since,
            extra,
        },
    })
}

fn non_empty(segment: Option<&str>) -> Option<&str> {
    segment.filter(|s| !s.is_empty())
}
