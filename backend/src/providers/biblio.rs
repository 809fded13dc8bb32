//! Bibliographic repository provider (Biblio-style publication export).
//!
//! The export endpoint answers with newline-delimited JSON, one publication
//! per line.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{date_prefix, fetch_text, ContributionProvider, ProviderResult};
use crate::api::{ContributionQuery, ContributionRecord, ContributionResult, PagedResult};
use super::ProviderKind;

pub const DEFAULT_BASE_URL: &str = "https://biblio.ugent.be";

const DOI_RESOLVER: &str = "https://doi.org/";
const HANDLE_RESOLVER: &str = "http://hdl.handle.net/";

#[derive(Debug, Deserialize)]
struct ExportLine {
    #[serde(default)]
    biblio_id: Value,
    #[serde(default)]
    date_updated: Option<String>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    doi: Option<Vec<String>>,
    #[serde(default)]
    handle: Option<String>,
}

/// Provider backed by a Biblio publication export.
#[derive(Debug, Clone)]
pub struct BiblioProvider {
    client: Client,
    base_url: String,
}

impl BiblioProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn an export body into a result for `query`.
    pub fn parse_export(
        &self,
        body: &str,
        query: &ContributionQuery,
    ) -> ProviderResult<ContributionResult> {
        let mut result = ContributionResult::new(&query.contributor_id);

        for line in body.lines().filter(|line| !line.trim().is_empty()) {
            let entry: ExportLine = serde_json::from_str(line)?;
            let Some(id) = scalar_text(&entry.biblio_id) else {
                warn!(biblio_id = %entry.biblio_id, "Skipping publication without biblio_id");
                continue;
            };

            let Some(updated) = entry.date_updated.as_deref() else {
                warn!(biblio_id = %id, "Skipping publication without date_updated");
                continue;
            };
            let accession_date = date_prefix(updated)?;
            if !query.since.includes(accession_date) {
                continue;
            }

            let mut record = ContributionRecord::new(
                format!("{}/publication/{}", self.base_url, id),
                accession_date,
            );

            if let Some(year) = entry.year.as_ref().and_then(scalar_text) {
                record = record.with_publication_date(year);
            }

            if let Some(cite_as) = cite_as(entry.doi.as_deref(), entry.handle.as_deref()) {
                record = record.with_cite_as(cite_as);
            }

            result.contributions.push(record);
        }

        Ok(result)
    }
}

#[async_trait]
impl ContributionProvider for BiblioProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Biblio
    }

    async fn contributions(&self, query: &ContributionQuery) -> ProviderResult<Option<PagedResult>> {
        let url = format!(
            "{}/person/{}/publication/export",
            self.base_url, query.contributor_id
        );

        let Some(body) = fetch_text(&self.client, &url, &[("format", "json")]).await? else {
            return Ok(None);
        };

        self.parse_export(&body, query).map(|result| Some(PagedResult::new(result)))
    }
}

/// First DOI wins over the handle; bare identifiers get a resolver prefix.
fn cite_as(doi: Option<&[String]>, handle: Option<&str>) -> Option<String> {
    if let Some(doi) = doi.and_then(|d| d.first()).filter(|d| !d.is_empty()) {
        return Some(resolvable(doi, DOI_RESOLVER));
    }

    handle
        .filter(|h| !h.is_empty())
        .map(|h| resolvable(h, HANDLE_RESOLVER))
}

fn resolvable(id: &str, resolver: &str) -> String {
    if id.starts_with("http") {
        id.to_string()
    } else {
        format!("{}{}", resolver, id)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
