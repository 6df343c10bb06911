use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use lexis_config::lookup::LookupErrorPolicy;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod state;
pub mod ui;

#[cfg(test)]
mod tests {
    mod command_tests;
    mod event_flow_tests;
    mod render_tests;
}

use self::controller::{AppController, ChannelSet};
use self::state::AppState;

/// Look up words with an AI explanation and keep a personal word list
#[derive(Parser, Debug)]
#[command(name = "lexis", version)]
struct Args {
    /// JSON config file (defaults to ./lexis.json when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:3000
    #[arg(long)]
    base_url: Option<String>,

    /// What to do when a lookup fails: silent or notify
    #[arg(long)]
    on_lookup_error: Option<LookupErrorPolicy>,

    /// Look this word up right after start
    word: Option<String>,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout belongs to the transcript
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = profile::load_config(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.backend.base_url = base_url;
    }
    if let Some(policy) = args.on_lookup_error {
        config.lookup.on_error = policy;
    }

    init_tracing(&config.log_filter);

    let channels = ChannelSet::new(config.channel_capacity);
    let state = Arc::new(AppState::new(config, channels.notices.0.clone())?);
    let app = AppController::new(state, channels);

    app.queue_startup(args.word)?;
    let mut tasks = app.spawn_tasks().await?;

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for ctrl+c: {e}");
            }
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task exited: {e}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    app.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::warn!("Task exited during shutdown: {e}");
        }
    }

    Ok(())
}
