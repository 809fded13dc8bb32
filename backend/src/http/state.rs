//! Application state for the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::registry::HandlerRegistry;

/// Default deadline for one provider invocation.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state passed to all handlers.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Handler name → provider table
    pub registry: Arc<HandlerRegistry>,
    /// Route prefix without slashes, e.g. `author`
    pub prefix: Arc<str>,
    /// Absolute origin used in pagination links
    pub base: Arc<str>,
    /// Deadline for a single provider call
    pub provider_timeout: Duration,
}

impl AppState {
    /// Create a new application state with the given registry.
    pub fn new(registry: HandlerRegistry, prefix: &str, base: &str) -> Self {
        Self {
            registry: Arc::new(registry),
            prefix: Arc::from(prefix.trim_matches('/')),
            base: Arc::from(base.trim_end_matches('/')),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Create the state described by a resolved server configuration.
    pub fn from_config(config: &ServerConfig, registry: HandlerRegistry) -> Self {
        Self::new(registry, &config.prefix, &config.base)
            .with_provider_timeout(config.provider_timeout)
    }
}
