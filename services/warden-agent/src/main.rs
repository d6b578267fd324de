//! # Warden Agent
//!
//! HTTP command front end for starting, stopping and inspecting one server

mod public_address;
mod routes;

use clap::Parser;
use lifecycle_controller::{CancellationToken, LifecycleController, ShellActionInvoker};
use liveness_prober::SlpProber;
use public_address::HttpAddressLookup;
use routes::{router, AgentState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use warden_core::BUILD_INFO;

#[derive(Parser, Debug)]
#[command(name = "warden-agent", version = warden_core::VERSION)]
#[command(about = "Warden Agent - remote start/stop/status for a game server")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cfg = warden_core::load_from_path(&cli.config)?;
    info!("Starting Warden Agent {}", BUILD_INFO);

    let poll = cfg.poll_config();
    let shutdown = CancellationToken::new();
    let prober = Arc::new(SlpProber::new(poll.target.clone()));
    let invoker = Arc::new(ShellActionInvoker::new(cfg.action_commands()));
    let controller = LifecycleController::new(prober, invoker, poll).with_shutdown(shutdown.clone());

    let state = Arc::new(AgentState {
        controller: Arc::new(controller),
        address: Arc::new(HttpAddressLookup::new(cfg.public_ip_url.clone())?),
        server_port: cfg.server_port,
        started_at: Instant::now(),
    });

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Warden Agent listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Warden Agent stopped");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Resolves on Ctrl-C or SIGTERM and cancels any poll still waiting.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown requested, cancelling pending operations");
    token.cancel();
}
