//! Contribution providers.
//!
//! A provider is an adapter that, given a contributor identifier, a
//! since-date filter and optional pagination parameters, fetches data from
//! one external source and normalizes it into a [`ContributionResult`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Dispatcher (http::handlers)                              │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │ ContributionQuery
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  ContributionProvider trait                               │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//!     ┌────────┬──────┴──────┬──────────┐
//!     │  demo  │   biblio    │  github  │  zenodo
//!     └────────┴─────────────┴──────────┘
//! ```
//!
//! Providers return `Ok(None)` when the source has nothing for the
//! contributor and reserve `Err` for unexpected failures.
//!
//! [`ContributionResult`]: crate::api::ContributionResult

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::api::{ContributionQuery, PagedResult};

pub mod biblio;
pub mod demo;
pub mod github;
pub mod zenodo;

pub use biblio::BiblioProvider;
pub use demo::DemoProvider;
pub use github::GithubProvider;
pub use zenodo::ZenodoProvider;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Unexpected provider failures.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level failure talking to the upstream API.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status other than 404.
    #[error("upstream {url} answered with status {status}")]
    UpstreamStatus { status: u16, url: String },

    /// Upstream payload could not be decoded.
    #[error("malformed upstream payload: {0}")]
    Decode(String),

    /// A request parameter (e.g. `page`) is not acceptable to this provider.
    #[error("invalid query parameter: {0}")]
    InvalidQuery(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Decode(err.to_string())
    }
}

/// Adapter implementations the registry can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Fixed demonstration data
    Demo,
    /// Bibliographic repository export
    Biblio,
    /// Code-hosting repositories
    Github,
    /// Data-archive records
    Zenodo,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Demo,
        ProviderKind::Biblio,
        ProviderKind::Github,
        ProviderKind::Zenodo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Demo => "demo",
            ProviderKind::Biblio => "biblio",
            ProviderKind::Github => "github",
            ProviderKind::Zenodo => "zenodo",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    /// Parse a provider kind, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "demo" => Ok(Self::Demo),
            "biblio" => Ok(Self::Biblio),
            "github" => Ok(Self::Github),
            "zenodo" => Ok(Self::Zenodo),
            _ => Err(format!("Unknown provider kind: {}", s)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The capability every backend adapter implements.
#[async_trait]
pub trait ContributionProvider: Send + Sync {
    /// Which adapter this is.
    fn kind(&self) -> ProviderKind;

    /// Fetch contributions for `query`.
    ///
    /// Returns `Ok(None)` when nothing is known about the contributor.
    async fn contributions(&self, query: &ContributionQuery) -> ProviderResult<Option<PagedResult>>;
}

/// GET `url` and return its body.
///
/// A 404 or an empty body is "no data" (`Ok(None)`), any other non-success
/// status is an error.
pub(crate) async fn fetch_text(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> ProviderResult<Option<String>> {
    debug!(url, ?query, "Fetching upstream");

    let response = client.get(url).query(query).send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        warn!(url, "Upstream has no such contributor");
        return Ok(None);
    }

    if !status.is_success() {
        return Err(ProviderError::UpstreamStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(body))
}

/// Parse the `YYYY-MM-DD` prefix of a date or timestamp string.
pub(crate) fn date_prefix(value: &str) -> ProviderResult<NaiveDate> {
    let prefix = value
        .get(..10)
        .ok_or_else(|| ProviderError::Decode(format!("date too short: '{}'", value)))?;

    NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .map_err(|e| ProviderError::Decode(format!("bad date '{}': {}", value, e)))
}

/// The four-digit year at the start of `value`, if there is one.
pub(crate) fn year_prefix(value: &str) -> Option<String> {
    value
        .get(..4)
        .filter(|year| year.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}

/// Reduce an identifier URL such as `https://orcid.org/0000-0001` to its last segment.
pub(crate) fn last_segment(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}
