//! Data-archive provider: records deposited on a Zenodo-compatible API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{
    date_prefix, fetch_text, last_segment, year_prefix, ContributionProvider, ProviderResult,
};
use crate::api::{ContributionQuery, ContributionRecord, ContributionResult, PagedResult};
use super::ProviderKind;

pub const DEFAULT_BASE_URL: &str = "https://zenodo.org/api/records";

/// Search field matching a creator's persistent identifier (e.g. an ORCID).
const CREATOR_IDENTIFIER_FIELD: &str = "metadata.creators.person_or_org.identifiers.identifier";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    links: HitLinks,
    updated: String,
    #[serde(default)]
    metadata: HitMetadata,
    #[serde(default)]
    doi_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HitLinks {
    self_html: String,
}

#[derive(Debug, Default, Deserialize)]
struct HitMetadata {
    #[serde(default)]
    publication_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ZenodoProvider {
    client: Client,
    base_url: String,
}

impl ZenodoProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Turn a search response into a result; `None` when there are no hits.
    pub fn parse_search(
        &self,
        body: &str,
        query: &ContributionQuery,
    ) -> ProviderResult<Option<ContributionResult>> {
        let response: SearchResponse = serde_json::from_str(body)?;
        if response.hits.hits.is_empty() {
            return Ok(None);
        }

        let mut result = ContributionResult::new(&query.contributor_id);
        for hit in response.hits.hits {
            let accession_date = date_prefix(&hit.updated)?;
            if !query.since.includes(accession_date) {
                continue;
            }

            let mut record = ContributionRecord::new(hit.links.self_html, accession_date);
            if let Some(year) = hit.metadata.publication_date.as_deref().and_then(year_prefix) {
                record = record.with_publication_date(year);
            }
            if let Some(doi_url) = hit.doi_url.filter(|d| !d.is_empty()) {
                record = record.with_cite_as(doi_url);
            }
            result.contributions.push(record);
        }

        Ok(Some(result))
    }
}

#[async_trait]
impl ContributionProvider for ZenodoProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Zenodo
    }

    async fn contributions(&self, query: &ContributionQuery) -> ProviderResult<Option<PagedResult>> {
        let search = format!(
            "{}:{}",
            CREATOR_IDENTIFIER_FIELD,
            last_segment(&query.contributor_id)
        );

        let Some(body) = fetch_text(&self.client, &self.base_url, &[("q", search.as_str())]).await?
        else {
            return Ok(None);
        };

        Ok(self.parse_search(&body, query)?.map(PagedResult::new))
    }
}
