//! Provider factory.
//!
//! This module maps a configured provider kind to a statically linked
//! adapter implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use super::config::ProviderSettings;
use super::{RegistryError, RegistryResult};
use crate::providers::{
    biblio, github, zenodo, BiblioProvider, ContributionProvider, DemoProvider, GithubProvider,
    ProviderKind, ZenodoProvider,
};

/// Default timeout for upstream HTTP calls.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(20);

/// Factory for creating provider instances.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Build the HTTP client shared by all adapters.
    pub fn http_client(timeout: Duration) -> RegistryResult<Client> {
        Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RegistryError::Client)
    }

    /// Create a provider with its default settings.
    pub fn create_default(kind: ProviderKind, client: &Client) -> Arc<dyn ContributionProvider> {
        match kind {
            ProviderKind::Demo => Arc::new(DemoProvider::new()),
            ProviderKind::Biblio => {
                Arc::new(BiblioProvider::new(client.clone(), biblio::DEFAULT_BASE_URL))
            }
            ProviderKind::Github => Arc::new(GithubProvider::new(
                client.clone(),
                github::DEFAULT_BASE_URL,
                github::DEFAULT_PAGE_LENGTH,
            )),
            ProviderKind::Zenodo => {
                Arc::new(ZenodoProvider::new(client.clone(), zenodo::DEFAULT_BASE_URL))
            }
        }
    }

    /// Create a provider from a registry entry.
    ///
    /// # Errors
    /// * unknown kind
    /// * a setting that the kind does not support
    pub fn create(
        settings: &ProviderSettings,
        client: &Client,
    ) -> RegistryResult<Arc<dyn ContributionProvider>> {
        let kind = settings
            .kind
            .parse::<ProviderKind>()
            .map_err(RegistryError::UnknownProvider)?;

        if settings.page_length.is_some() && kind != ProviderKind::Github {
            return Err(RegistryError::InvalidSetting(format!(
                "page_length is not supported by the {} provider",
                kind
            )));
        }
        if settings.base_url.is_some() && kind == ProviderKind::Demo {
            return Err(RegistryError::InvalidSetting(
                "base_url is not supported by the demo provider".to_string(),
            ));
        }

        let base_url = |default: &str| settings.base_url.clone().unwrap_or_else(|| default.to_string());

        let provider: Arc<dyn ContributionProvider> = match kind {
            ProviderKind::Demo => Arc::new(DemoProvider::new()),
            ProviderKind::Biblio => Arc::new(BiblioProvider::new(
                client.clone(),
                base_url(biblio::DEFAULT_BASE_URL),
            )),
            ProviderKind::Github => {
                let page_length = settings.page_length.unwrap_or(github::DEFAULT_PAGE_LENGTH);
                if page_length == 0 {
                    return Err(RegistryError::InvalidSetting(
                        "page_length must be at least 1".to_string(),
                    ));
                }
                Arc::new(GithubProvider::new(
                    client.clone(),
                    base_url(github::DEFAULT_BASE_URL),
                    page_length,
                ))
            }
            ProviderKind::Zenodo => Arc::new(ZenodoProvider::new(
                client.clone(),
                base_url(zenodo::DEFAULT_BASE_URL),
            )),
        };

        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_unsupported_settings() {
        let client = Client::new();

        let settings = ProviderSettings {
            kind: "zenodo".to_string(),
            base_url: None,
            page_length: Some(5),
        };
        assert!(matches!(
            ProviderFactory::create(&settings, &client),
            Err(RegistryError::InvalidSetting(_))
        ));

        let settings = ProviderSettings {
            kind: "github".to_string(),
            base_url: None,
            page_length: Some(0),
        };
        assert!(matches!(
            ProviderFactory::create(&settings, &client),
            Err(RegistryError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_create_builds_requested_kind() {
        let client = Client::new();
        for kind in ProviderKind::ALL {
            let settings = ProviderSettings::from_kind(kind.as_str());
            let provider = ProviderFactory::create(&settings, &client).unwrap();
            assert_eq!(provider.kind(), kind);
            assert_eq!(ProviderFactory::create_default(kind, &client).kind(), kind);
        }
    }
}
