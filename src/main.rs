//! quizbowl-tracker binary entrypoint: replays a JSON-lines transcript from stdin through the game
//! services and writes events to stdout.

use anyhow::Context;
use tokio::io::{self, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizbowl_tracker::{config::AppConfig, services::transcript_service, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_state = AppState::new(AppConfig::load());
    let input = BufReader::new(io::stdin());
    let output = io::stdout();

    info!("reading transcript from stdin");
    tokio::select! {
        result = transcript_service::run(app_state, input, output) => {
            result.context("processing transcript")?;
        }
        _ = shutdown_signal() => {
            info!("shutdown requested");
        }
    }

    Ok(())
}

/// Configure tracing subscribers; logs go to stderr so stdout carries only data.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
