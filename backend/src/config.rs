//! Server configuration from the command line and environment variables.
//!
//! # Environment Variables
//!
//! - `AUTHORIDY_HOST`: listen host (default: localhost)
//! - `AUTHORIDY_PORT`: listen port (default: 8000)
//! - `AUTHORIDY_BASE`: absolute origin used in `Link` headers (default: `http://{host}:{port}`)
//! - `AUTHORIDY_PUBLIC_PATH`: static asset directory (default: ./public)
//! - `AUTHORIDY_PREFIX`: route prefix segment (default: author)
//! - `AUTHORIDY_HANDLERS`: JSON or TOML handler mapping file
//! - `AUTHORIDY_DEFAULT_HANDLER`: provider used when no handler file is given (default: demo)
//! - `AUTHORIDY_PROVIDER_TIMEOUT`: per-request provider deadline in seconds (default: 30)
//! - `AUTHORIDY_UPSTREAM_TIMEOUT`: upstream HTTP timeout in seconds (default: 20)

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use reqwest::Url;
use tracing::{info, warn};

use crate::http::state::DEFAULT_PROVIDER_TIMEOUT;
use crate::registry::{
    HandlerRegistry, ProviderFactory, ProviderKind, RegistryResult, DEFAULT_UPSTREAM_TIMEOUT,
};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_PREFIX: &str = "author";
pub const DEFAULT_PUBLIC_PATH: &str = "./public";

/// Contributor contribution server.
#[derive(Parser, Debug)]
#[command(name = "authoridy-server")]
#[command(version)]
#[command(about = "Aggregates a contributor's external contributions over HTTP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    #[command(alias = "serve")]
    StartServer(ServeArgs),

    /// Validate a handler mapping file and list its handlers
    CheckHandlers {
        /// JSON or TOML handler mapping file
        handlers: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen host
    #[arg(long, env = "AUTHORIDY_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Listen port
    #[arg(long, env = "AUTHORIDY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Absolute origin used when building pagination links
    #[arg(long, env = "AUTHORIDY_BASE")]
    pub base: Option<String>,

    /// Directory of static assets
    #[arg(long = "public", env = "AUTHORIDY_PUBLIC_PATH", default_value = DEFAULT_PUBLIC_PATH)]
    pub public_path: PathBuf,

    /// Route prefix segment
    #[arg(long, env = "AUTHORIDY_PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Provider serving every request when no handler file is given
    #[arg(long, env = "AUTHORIDY_DEFAULT_HANDLER", default_value = "demo")]
    pub default_handler: ProviderKind,

    /// Per-request provider deadline in seconds
    #[arg(long, env = "AUTHORIDY_PROVIDER_TIMEOUT", default_value_t = DEFAULT_PROVIDER_TIMEOUT.as_secs())]
    pub provider_timeout: u64,

    /// Upstream HTTP timeout in seconds
    #[arg(long, env = "AUTHORIDY_UPSTREAM_TIMEOUT", default_value_t = DEFAULT_UPSTREAM_TIMEOUT.as_secs())]
    pub upstream_timeout: u64,

    /// JSON or TOML handler mapping file
    #[arg(env = "AUTHORIDY_HANDLERS")]
    pub handlers: Option<PathBuf>,
}

/// Configuration errors detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("route prefix must not be empty")]
    EmptyPrefix,

    #[error("invalid base URL '{0}': {1}")]
    InvalidBase(String, String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Resolved server configuration, constructed once at process start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Absolute origin (scheme, host, port) without trailing slash.
    pub base: String,
    /// Static asset directory, if it exists.
    pub public_path: Option<PathBuf>,
    /// Route prefix without surrounding slashes.
    pub prefix: String,
    pub handlers: Option<PathBuf>,
    pub default_handler: ProviderKind,
    pub provider_timeout: Duration,
    pub upstream_timeout: Duration,
}

impl ServerConfig {
    /// Validate and normalize command-line arguments.
    pub fn from_args(args: ServeArgs) -> Result<Self, ConfigError> {
        let prefix = normalize_prefix(&args.prefix)?;

        let base = args
            .base
            .unwrap_or_else(|| format!("http://{}:{}", args.host, args.port));
        let base = normalize_base(&base)?;

        if args.provider_timeout == 0 {
            return Err(ConfigError::ZeroTimeout("provider timeout"));
        }
        if args.upstream_timeout == 0 {
            return Err(ConfigError::ZeroTimeout("upstream timeout"));
        }

        let public_path = if args.public_path.is_dir() {
            Some(args.public_path)
        } else {
            warn!(path = %args.public_path.display(), "Public path not found, static files disabled");
            None
        };

        Ok(Self {
            host: args.host,
            port: args.port,
            base,
            public_path,
            prefix,
            handlers: args.handlers,
            default_handler: args.default_handler,
            provider_timeout: Duration::from_secs(args.provider_timeout),
            upstream_timeout: Duration::from_secs(args.upstream_timeout),
        })
    }

    /// Build the handler registry this configuration selects.
    ///
    /// A handler file gives a named registry; otherwise every request goes
    /// to the default provider.
    pub fn build_registry(&self) -> RegistryResult<HandlerRegistry> {
        let client = ProviderFactory::http_client(self.upstream_timeout)?;

        match &self.handlers {
            Some(path) => {
                info!(path = %path.display(), "Loading handler mapping");
                HandlerRegistry::from_file(path, &client)
            }
            None => {
                info!(kind = %self.default_handler, "No handler mapping given, using single default handler");
                Ok(HandlerRegistry::single(ProviderFactory::create_default(
                    self.default_handler,
                    &client,
                )))
            }
        }
    }
}

/// Strip surrounding slashes; the result must not be empty.
pub fn normalize_prefix(prefix: &str) -> Result<String, ConfigError> {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyPrefix);
    }
    Ok(trimmed.to_string())
}

/// Check that `base` is an absolute http(s) origin and strip its trailing slash.
pub fn normalize_base(base: &str) -> Result<String, ConfigError> {
    let url = Url::parse(base)
        .map_err(|e| ConfigError::InvalidBase(base.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(ConfigError::InvalidBase(
            base.to_string(),
            "expected an absolute http(s) origin".to_string(),
        ));
    }

    Ok(base.trim_end_matches('/').to_string())
}
