//! Public API surface for the contribution server.
//!
//! This file consolidates the data model shared by the path parser, the
//! providers and the response formatter. Body types derive
//! Serialize/Deserialize for JSON serialization.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire token for the "all time" date filter.
pub const ALL_TIME: &str = "*";

/// Lower bound on the accession date of returned contributions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DateFilter {
    /// No filtering.
    AllTime,
    /// Only contributions accessed on or after this date.
    Since(NaiveDate),
}

/// Error returned when a since-date does not match `*` or `YYYYMMDD`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid since-date '{0}': expected '*' or YYYYMMDD")]
pub struct InvalidDateFilter(pub String);

impl DateFilter {
    /// Whether a contribution accessed on `date` passes the filter.
    pub fn includes(&self, date: NaiveDate) -> bool {
        match self {
            DateFilter::AllTime => true,
            DateFilter::Since(since) => date >= *since,
        }
    }

    /// The `*` / `YYYYMMDD` form used in URLs.
    pub fn to_wire(&self) -> String {
        match self {
            DateFilter::AllTime => ALL_TIME.to_string(),
            DateFilter::Since(date) => date.format("%Y%m%d").to_string(),
        }
    }
}

impl FromStr for DateFilter {
    type Err = InvalidDateFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_TIME {
            return Ok(DateFilter::AllTime);
        }

        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidDateFilter(s.to_string()));
        }

        NaiveDate::parse_from_str(s, "%Y%m%d")
            .map(DateFilter::Since)
            .map_err(|_| InvalidDateFilter(s.to_string()))
    }
}

/// Normalized form: `*` or `YYYY-MM-DD`.
impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFilter::AllTime => f.write_str(ALL_TIME),
            DateFilter::Since(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Selects which registered provider serves a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub handler_name: String,
}

impl RouteKey {
    pub fn new(handler_name: impl Into<String>) -> Self {
        Self {
            handler_name: handler_name.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.handler_name)
    }
}

/// What a provider is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionQuery {
    /// Contributor identifier; may itself contain `/` (e.g. an ORCID URL).
    pub contributor_id: String,
    pub since: DateFilter,
    /// Query-string parameters of the request, such as a `page` cursor.
    pub extra: BTreeMap<String, String>,
}

impl ContributionQuery {
    pub fn new(contributor_id: impl Into<String>, since: DateFilter) -> Self {
        Self {
            contributor_id: contributor_id.into(),
            since,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Look up a query-string parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}

/// One unit of external contribution: a publication, repository or record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContributionRecord {
    pub contribution_page: String,
    pub accession_date: NaiveDate,
    /// Four-digit publication year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cite_as: Option<String>,
}

impl ContributionRecord {
    pub fn new(contribution_page: impl Into<String>, accession_date: NaiveDate) -> Self {
        Self {
            contribution_page: contribution_page.into(),
            accession_date,
            publication_date: None,
            cite_as: None,
        }
    }

    pub fn with_publication_date(mut self, year: impl Into<String>) -> Self {
        self.publication_date = Some(year.into());
        self
    }

    pub fn with_cite_as(mut self, url: impl Into<String>) -> Self {
        self.cite_as = Some(url.into());
        self
    }
}

/// The normalized response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionResult {
    pub contributor: String,
    pub contributions: Vec<ContributionRecord>,
}

impl ContributionResult {
    pub fn new(contributor: impl Into<String>) -> Self {
        Self {
            contributor: contributor.into(),
            contributions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}

/// A result plus opaque pagination cursors (query-string fragments such as `page=2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResult {
    pub result: ContributionResult,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl PagedResult {
    pub fn new(result: ContributionResult) -> Self {
        Self {
            result,
            prev: None,
            next: None,
        }
    }

    pub fn with_prev(mut self, cursor: impl Into<String>) -> Self {
        self.prev = Some(cursor.into());
        self
    }

    pub fn with_next(mut self, cursor: impl Into<String>) -> Self {
        self.next = Some(cursor.into());
        self
    }
}

impl From<ContributionResult> for PagedResult {
    fn from(result: ContributionResult) -> Self {
        Self::new(result)
    }
}
