//! Demonstration provider with fixed data and no I/O.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{ContributionProvider, ProviderResult};
use crate::api::{ContributionQuery, ContributionRecord, ContributionResult, PagedResult};
use super::ProviderKind;

/// Returns the same two records for any contributor.
#[derive(Debug, Clone, Default)]
pub struct DemoProvider;

impl DemoProvider {
    pub fn new() -> Self {
        Self
    }

    fn records() -> Vec<ContributionRecord> {
        [
            ("https://mirepo.org/item/9876", (2023, 1, 4)),
            ("https://mirepo.org/item/5432", (2022, 3, 20)),
        ]
        .into_iter()
        .filter_map(|(page, (y, m, d))| {
            NaiveDate::from_ymd_opt(y, m, d).map(|date| ContributionRecord::new(page, date))
        })
        .collect()
    }
}

#[async_trait]
impl ContributionProvider for DemoProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Demo
    }

    async fn contributions(&self, query: &ContributionQuery) -> ProviderResult<Option<PagedResult>> {
        let mut result = ContributionResult::new(&query.contributor_id);
        result.contributions = Self::records()
            .into_iter()
            .filter(|record| query.since.includes(record.accession_date))
            .collect();

        Ok(Some(PagedResult::new(result)))
    }
}
