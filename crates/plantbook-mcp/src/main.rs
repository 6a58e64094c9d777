//! plantbook-mcp: Open Plantbook MCP server
//!
//! Usage:
//!   plantbook-mcp [--config ~/.config/plantbook-mcp/config.toml] [--log debug]
//!
//! Speaks MCP over stdio. Credentials come from the config file or the
//! `OPENPLANTBOOK_*` environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rmcp::{transport::stdio, ServiceExt};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use plantbook_client::{ClientConfig, OpenPlantbookClient};
use plantbook_core::config::{LogConfig, PlantbookConfig};
use plantbook_mcp::server::{PlantbookMcp, ToolSettings, TOOL_COUNT};

#[derive(Parser, Debug)]
#[command(
    name = "plantbook-mcp",
    version,
    about = "MCP server for Open Plantbook plant care data"
)]
struct Cli {
    /// Path to config.toml (default: $XDG_CONFIG_HOME/plantbook-mcp/config.toml)
    #[arg(long, short = 'c', env = "PLANTBOOK_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "PLANTBOOK_MCP_LOG")]
    log: Option<String>,

    /// Log format; overrides the config file
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    fn from_config(log: &LogConfig) -> Self {
        if log.format.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = PlantbookConfig::load(cli.config.as_deref());

    let log_config = loaded.as_ref().map(|c| c.log.clone()).unwrap_or_default();
    let level = cli
        .log
        .clone()
        .unwrap_or_else(|| log_config.effective_level().to_string());
    let format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| LogFormat::from_config(&log_config));
    init_logging(&level, &format);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            print_credentials_hint(&e);
            std::process::exit(1);
        }
    };

    let client_config = ClientConfig::from_core(&config)?;
    let client = OpenPlantbookClient::new(client_config).context("creating API client")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        auth_method = client.auth_method(),
        base_url = %config.api.base_url,
        cache_enabled = client.cache_enabled(),
        cache_ttl_hours = config.cache.ttl_hours,
        "plantbook-mcp starting"
    );

    let server = PlantbookMcp::new(Arc::new(client), ToolSettings::from_config(&config));
    info!(count = TOOL_COUNT, "registered tools");

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("MCP server error: {:?}", e);
    })?;
    let cancel = service.cancellation_token();

    tokio::select! {
        reason = service.waiting() => {
            let reason = reason.context("MCP service task failed")?;
            info!(?reason, "MCP session ended");
        }
        signal = shutdown_signal() => {
            info!(signal = signal?, "shutdown signal received");
            cancel.cancel();
        }
    }

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate()).context("registering SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("registering SIGINT handler")?;
    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

fn print_credentials_hint(error: &plantbook_core::PlantbookError) {
    eprintln!("Configuration error: {error}");
    eprintln!();
    eprintln!("Provide credentials via environment variables:");
    eprintln!("  OPENPLANTBOOK_API_KEY=xxx  (for API key auth)");
    eprintln!("OR");
    eprintln!("  OPENPLANTBOOK_CLIENT_ID=xxx OPENPLANTBOOK_CLIENT_SECRET=xxx  (for OAuth2)");
}

/// Logs always go to stderr; stdout carries the JSON-RPC stream.
fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
                .init();
        }
    }
}
