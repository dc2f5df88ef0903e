//! Specification Assistant - Rust Backend
//!
//! Relays prompts to DeepSeek or Claude so API keys never reach the browser,
//! and serves the single-page front end.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod error;
mod llm;
mod prompts;

use config::Config;
use llm::LlmRouter;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug level logging
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Directory with index.html and front-end assets (overrides STATIC_DIR)
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmRouter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Determine log level based on --debug flag
    let log_level = if args.debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Initialize logging (File + Stdout)
    let file_appender = tracing_appender::rolling::daily("logs", "tz_assistant.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(env_filter)
        .init();

    tracing::info!("Log level: {}", log_level);

    // Load environment variables
    dotenvy::dotenv().ok();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(static_dir) = args.static_dir {
        config.server.static_dir = static_dir;
    }

    let llm = LlmRouter::from_config(&config)?;
    tracing::info!(
        deepseek_model = %config.deepseek.model,
        claude_model = %config.claude.model,
        static_dir = %config.server.static_dir.display(),
        "Providers configured"
    );

    let server = config.server;
    let app = api::router(AppState { llm }, &server.static_dir);

    // Start server
    tracing::info!("Starting server on {}:{}", server.host, server.port);

    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
