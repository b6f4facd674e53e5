//! Result Engine HTTP service.

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use result_engine::api::{AppState, create_router};
use result_engine::config::ConfigLoader;

/// Result Engine CLI
#[derive(Parser)]
#[command(name = "result-engine")]
#[command(about = "Result computation and entitlement service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration directory
    #[arg(short, long, env = "RESULT_ENGINE_CONFIG", default_value = "./config/default")]
    config: String,

    /// Listen address
    #[arg(
        short,
        long,
        env = "RESULT_ENGINE_LISTEN_ADDR",
        default_value = "127.0.0.1:8080"
    )]
    listen: SocketAddr,

    /// Log level
    #[arg(long, env = "RESULT_ENGINE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "RESULT_ENGINE_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = ConfigLoader::load(&cli.config)?;
    info!(
        institution = %config.institution().code,
        schemes = config.config().schemes().len(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    info!(listen = %cli.listen, version = env!("CARGO_PKG_VERSION"), "Result engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}
