//! authoridy HTTP Server Binary
//!
//! This is the main entry point for the contribution server. It resolves
//! the configuration, builds the handler registry once, sets up the HTTP
//! router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Single demo handler for every request
//! cargo run --bin authoridy-server -- start-server
//!
//! # Named handlers from a mapping file
//! cargo run --bin authoridy-server -- start-server --port 8080 handlers.json
//! ```
//!
//! See [`authoridy::config`] for the environment variables. `RUST_LOG`
//! sets the log filter (default: info).

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use authoridy::config::{Cli, Commands, ServeArgs, ServerConfig};
use authoridy::http::{create_router, AppState};
use authoridy::registry::{HandlerRegistry, ProviderFactory, DEFAULT_UPSTREAM_TIMEOUT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::StartServer(args) => serve(args).await,
        Commands::CheckHandlers { handlers } => {
            let client = ProviderFactory::http_client(DEFAULT_UPSTREAM_TIMEOUT)?;
            let registry = HandlerRegistry::from_file(&handlers, &client)
                .with_context(|| format!("invalid handler mapping {}", handlers.display()))?;
            for name in registry.names() {
                let kind = registry
                    .resolve(&name)
                    .map(|provider| provider.kind().to_string())
                    .unwrap_or_default();
                println!("{}\t{}", name, kind);
            }
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    info!("Starting authoridy HTTP server");

    let config = ServerConfig::from_args(args)?;
    let registry = config
        .build_registry()
        .context("Failed to build handler registry")?;
    info!(handlers = ?registry.names(), single = registry.is_single(), "Handler registry ready");

    let state = AppState::from_config(&config, registry);
    let app = create_router(state, config.public_path.as_deref());

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!("Server listening on http://{}", listener.local_addr()?);
    info!(
        "Contributions: {}/{}/{{handler}}/{{since}}/{{contributor}}",
        config.base, config.prefix
    );

    axum::serve(listener, app).await?;

    Ok(())
}
