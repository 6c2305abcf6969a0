use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use tokenwiz::config::{LoggingConfig, Settings};
use tokenwiz::provider::{CredentialSource, HubFetcher, TokenizerProvider};
use tokenwiz::server::{self, types::{ErrorResponse, TokenizeRequest, TokenizeResponse}, ApiServer, AppState};

mod cli;
use cli::{Cli, Command};

/// Main entry point for tokenwiz
///
/// Loads layered settings, sets up logging, then either serves the HTTP API
/// (the default) or tokenizes a single text from the command line.
///
/// # Errors
/// Returns an error if settings are invalid, the HTTP client cannot be built,
/// or the server fails to bind
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::from_dir(&cli.config_dir)
        .with_context(|| format!("Failed to load settings from {}", cli.config_dir.display()))?;

    let _guard = init_logging(&settings.logging);
    info!("tokenwiz starting up...");

    let state = build_state(&settings)?;

    match cli.command.unwrap_or(Command::Serve { host: None, port: None }) {
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| settings.server.host.clone());
            let port = port.unwrap_or(settings.server.port);

            let server = ApiServer::new(state, host, port);
            server
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;
        }
        Command::Tokenize { tokenizer, text } => {
            let request = TokenizeRequest { text, tokenizer_name: tokenizer };
            let response = match server::handle(&state, request).await {
                Ok(tokens) => TokenizeResponse::Tokens(tokens),
                Err(e) => TokenizeResponse::Error(ErrorResponse { error: e.to_string() }),
            };
            println!("{}", serde_json::to_string(&response)?);
        }
    }

    Ok(())
}

fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let fetcher = HubFetcher::new(&settings.hub).context("Failed to build hub HTTP client")?;
    info!(endpoint = %settings.hub.endpoint, revision = %settings.hub.revision, "Hub client ready");

    let provider = Arc::new(TokenizerProvider::new(Arc::new(fetcher)));
    let credentials = CredentialSource::Env(settings.hub.token_env.clone());

    Ok(AppState::new(provider, credentials, Duration::from_secs(settings.server.request_timeout_secs))
        .with_error_status_codes(settings.server.error_status_codes))
}

/// Logs go to a daily rolling file when a directory is configured, stderr
/// otherwise. `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.to_lowercase()));

    match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::RollingFileAppender::new(
                tracing_appender::rolling::Rotation::DAILY,
                directory,
                "tokenwiz",
            );
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                // Disable ANSI colors for cleaner log files
                .with_ansi(false)
                .with_line_number(true)
                .with_file(true)
                .with_thread_ids(true)
                .with_target(false)
                .init();

            Some(guard)
        }
        None => {
            // stderr keeps stdout clean for `tokenwiz tokenize` output
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();

            None
        }
    }
}
