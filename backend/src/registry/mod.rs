//! Handler registry.
//!
//! Maps the handler name of a request to a statically linked provider. The
//! registry is built once at startup and is read-only afterwards, so it is
//! shared between requests behind an `Arc` without any locking.
//!
//! Two modes are supported:
//! - **named**: handler names come from a configuration file
//!   ([`HandlersConfig`]); unknown names do not resolve.
//! - **single**: every request is served by one default provider whatever
//!   its handler name.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, info};

use crate::providers::ContributionProvider;

pub mod config;
pub mod factory;

pub use config::{HandlerEntry, HandlersConfig, ProviderSettings};
pub use crate::providers::ProviderKind;
pub use factory::{ProviderFactory, DEFAULT_UPSTREAM_TIMEOUT};

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while building the registry at startup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration error: {0}")]
    UnknownProvider(String),

    #[error("Invalid provider setting: {0}")]
    InvalidSetting(String),

    #[error("Configuration error: no handlers registered")]
    Empty,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Clone)]
enum Mode {
    Named(BTreeMap<String, Arc<dyn ContributionProvider>>),
    Single(Arc<dyn ContributionProvider>),
}

/// Immutable handler-name → provider table.
#[derive(Clone)]
pub struct HandlerRegistry {
    mode: Mode,
}

impl HandlerRegistry {
    /// A registry resolving only the given names.
    pub fn named<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = (S, Arc<dyn ContributionProvider>)>,
        S: Into<String>,
    {
        let providers = providers
            .into_iter()
            .map(|(name, provider)| (name.into(), provider))
            .collect();

        Self {
            mode: Mode::Named(providers),
        }
    }

    /// A registry serving every handler name with `provider`.
    pub fn single(provider: Arc<dyn ContributionProvider>) -> Self {
        Self {
            mode: Mode::Single(provider),
        }
    }

    /// Build a named registry from a parsed configuration.
    pub fn from_config(config: &HandlersConfig, client: &Client) -> RegistryResult<Self> {
        if config.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut providers = BTreeMap::new();
        for (name, entry) in &config.handlers {
            let provider = ProviderFactory::create(&entry.settings(), client)?;
            debug!(handler = %name, kind = %provider.kind(), "Registered handler");
            providers.insert(name.clone(), provider);
        }

        info!(count = providers.len(), "Handler registry built");
        Ok(Self {
            mode: Mode::Named(providers),
        })
    }

    /// Build a named registry from a JSON or TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P, client: &Client) -> RegistryResult<Self> {
        let config = HandlersConfig::from_file(path)?;
        Self::from_config(&config, client)
    }

    /// Look up the provider serving `name`.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn ContributionProvider>> {
        match &self.mode {
            Mode::Named(providers) => providers.get(name).cloned(),
            Mode::Single(provider) => Some(Arc::clone(provider)),
        }
    }

    /// Registered handler names, sorted; in single mode, the default provider's kind.
    pub fn names(&self) -> Vec<String> {
        match &self.mode {
            Mode::Named(providers) => providers.keys().cloned().collect(),
            Mode::Single(provider) => vec![provider.kind().to_string()],
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self.mode, Mode::Single(_))
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("single", &self.is_single())
            .field("names", &self.names())
            .finish()
    }
}
