//! Auth service with structured, correlation-aware logging.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use service_logging::config::{env_lookup, load_config, resolve_logger_config, ServiceConfig};
use service_logging::correlation::probe_entropy;
use service_logging::observability::{init_logging, TracingSink};
use service_logging::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "auth-service", version, about = "Auth service with structured logging")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, env = "SERVICE_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overriding the configuration file.
    #[arg(long, env = "BIND_ADDRESS")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    let logger = Arc::new(resolve_logger_config(&config.logging, env_lookup)?);
    let transport = init_logging(&logger)?;

    tracing::info!(
        service = %logger.service,
        environment = %logger.environment,
        version = %logger.version,
        level = %logger.level,
        transport = ?transport,
        "{} starting",
        logger.service
    );

    probe_entropy()?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, logger, Arc::new(TracingSink::new(transport)));
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
