//! Code-hosting provider: a user's public repositories on a GitHub-compatible API.
//!
//! Repositories are requested most-recently-updated first, one page at a
//! time. Because of that ordering, the first repository older than the
//! since-date marks the end of the relevant data and no `next` cursor is
//! produced after it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{
    date_prefix, fetch_text, last_segment, year_prefix, ContributionProvider, ProviderError,
    ProviderResult,
};
use crate::api::{ContributionQuery, ContributionRecord, ContributionResult, PagedResult};
use super::ProviderKind;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_PAGE_LENGTH: u32 = 10;

/// Query parameter carrying the page cursor.
pub const PAGE_PARAM: &str = "page";

#[derive(Debug, Deserialize)]
struct Repository {
    html_url: String,
    updated_at: String,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GithubProvider {
    client: Client,
    base_url: String,
    page_length: u32,
}

impl GithubProvider {
    pub fn new(client: Client, base_url: impl Into<String>, page_length: u32) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_length: page_length.max(1),
        }
    }

    pub fn page_length(&self) -> u32 {
        self.page_length
    }

    /// Turn one page of repositories into a paged result.
    ///
    /// Returns `None` when the page is empty.
    pub fn parse_page(
        &self,
        body: &str,
        query: &ContributionQuery,
        page: Option<u32>,
    ) -> ProviderResult<Option<PagedResult>> {
        let repositories: Vec<Repository> = serde_json::from_str(body)?;
        if repositories.is_empty() {
            return Ok(None);
        }

        let mut result = ContributionResult::new(&query.contributor_id);
        let mut reached_since = false;

        for repo in repositories {
            let accession_date = date_prefix(&repo.updated_at)?;
            if !query.since.includes(accession_date) {
                reached_since = true;
                continue;
            }

            let mut record = ContributionRecord::new(repo.html_url, accession_date);
            if let Some(year) = repo.created_at.as_deref().and_then(year_prefix) {
                record = record.with_publication_date(year);
            }
            result.contributions.push(record);
        }

        let last_page = reached_since || result.len() < self.page_length as usize;
        let mut paged = PagedResult::new(result);

        if let Some(current) = page.filter(|p| *p > 1) {
            paged = paged.with_prev(format!("{}={}", PAGE_PARAM, current - 1));
        }
        if !last_page {
            if let Some(next) = page.unwrap_or(1).checked_add(1) {
                paged = paged.with_next(format!("{}={}", PAGE_PARAM, next));
            }
        }

        Ok(Some(paged))
    }
}

/// Read the optional page number; it must be a positive integer.
pub fn requested_page(query: &ContributionQuery) -> ProviderResult<Option<u32>> {
    match query.param(PAGE_PARAM) {
        None => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(page) if page > 0 => Ok(Some(page)),
            _ => Err(ProviderError::InvalidQuery(format!(
                "{} must be a positive integer, got '{}'",
                PAGE_PARAM, raw
            ))),
        },
    }
}

#[async_trait]
impl ContributionProvider for GithubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Github
    }

    async fn contributions(&self, query: &ContributionQuery) -> ProviderResult<Option<PagedResult>> {
        let page = requested_page(query)?;
        let login = last_segment(&query.contributor_id);
        let url = format!("{}/users/{}/repos", self.base_url, login);

        let per_page = self.page_length.to_string();
        let page_text = page.map(|p| p.to_string());
        let mut params = vec![("sort", "updated"), ("per_page", per_page.as_str())];
        if let Some(page_text) = page_text.as_deref() {
            params.push((PAGE_PARAM, page_text));
        }

        let Some(body) = fetch_text(&self.client, &url, &params).await? else {
            return Ok(None);
        };

        self.parse_page(&body, query, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DateFilter;

    fn repos(updated: &[&str]) -> String {
        let items: Vec<_> = updated
            .iter()
            .enumerate()
            .map(|(i, date)| {
                serde_json::json!({
                    "html_url": format!("https://github.com/octocat/repo{}", i),
                    "updated_at": format!("{}T00:00:00Z", date),
                    "created_at": "2019-04-01T00:00:00Z",
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    fn provider(page_length: u32) -> GithubProvider {
        GithubProvider::new(Client::new(), DEFAULT_BASE_URL, page_length)
    }

    #[test]
    fn test_empty_page_is_none() {
        let query = ContributionQuery::new("octocat", DateFilter::AllTime);
        assert!(provider(3).parse_page("[]", &query, None).unwrap().is_none());
    }

    #[test]
    fn test_full_first_page_links_to_page_two() {
        let query = ContributionQuery::new("octocat", DateFilter::AllTime);
        let body = repos(&["2024-03-01", "2024-02-01", "2024-01-01"]);
        let paged = provider(3).parse_page(&body, &query, None).unwrap().unwrap();

        assert_eq!(paged.result.len(), 3);
        assert_eq!(paged.next.as_deref(), Some("page=2"));
        assert!(paged.prev.is_none());
        assert_eq!(
            paged.result.contributions[0].publication_date.as_deref(),
            Some("2019")
        );
    }

    #[test]
    fn test_middle_page_links_both_ways() {
        let query = ContributionQuery::new("octocat", DateFilter::AllTime).with_extra("page", "3");
        let body = repos(&["2024-03-01", "2024-02-01"]);
        let page = requested_page(&query).unwrap();
        let paged = provider(2).parse_page(&body, &query, page).unwrap().unwrap();

        assert_eq!(paged.prev.as_deref(), Some("page=2"));
        assert_eq!(paged.next.as_deref(), Some("page=4"));
    }

    #[test]
    fn test_short_page_is_last() {
        let query = ContributionQuery::new("octocat", DateFilter::AllTime).with_extra("page", "2");
        let body = repos(&["2024-03-01"]);
        let paged = provider(3).parse_page(&body, &query, Some(2)).unwrap().unwrap();

        assert_eq!(paged.prev.as_deref(), Some("page=1"));
        assert!(paged.next.is_none());
    }

    #[test]
    fn test_reaching_since_date_stops_paging() {
        let query = ContributionQuery::new("octocat", "20240115".parse().unwrap());
        let body = repos(&["2024-03-01", "2024-02-01", "2024-01-01"]);
        let paged = provider(3).parse_page(&body, &query, None).unwrap().unwrap();

        assert_eq!(paged.result.len(), 2);
        assert!(paged.next.is_none());
    }

    #[test]
    fn test_highest_page_has_no_next_cursor() {
        let query = ContributionQuery::new("octocat", DateFilter::AllTime);
        let body = repos(&["2024-03-01"]);
        let paged = provider(1)
            .parse_page(&body, &query, Some(u32::MAX))
            .unwrap()
            .unwrap();

        assert_eq!(paged.result.len(), 1);
        assert_eq!(paged.prev, Some(format!("page={}", u32::MAX - 1)));
        assert!(paged.next.is_none());
    }

    #[test]
    fn test_requested_page_validation() {
        let query = ContributionQuery::new("octocat", DateFilter::AllTime);
        assert_eq!(requested_page(&query).unwrap(), None);

        for bad in ["0", "-1", "two", ""] {
            let query = query.clone().with_extra("page", bad);
            assert!(matches!(
                requested_page(&query),
                Err(ProviderError::InvalidQuery(_))
            ));
        }
    }
}
