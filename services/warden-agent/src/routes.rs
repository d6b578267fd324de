//! HTTP surface of the agent
//!
//! Each chat-style command maps to one controller operation. Mutating
//! commands block until the controller returns, so clients should show their
//! own "please wait" feedback.

use crate::public_address::AddressLookup;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use lifecycle_controller::LifecycleController;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};
use warden_core::{command_list, endpoints, Command, CommandInfo, CommandReply, StatusResponse};

pub const WELCOME: &str =
    "Welcome to the server control agent! Use the help command to see what it can do.";

#[derive(Clone)]
pub struct AgentState {
    pub controller: Arc<LifecycleController>,
    pub address: Arc<dyn AddressLookup>,
    pub server_port: u16,
    pub started_at: Instant,
}

impl std::fmt::Debug for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentState")
            .field("controller", &self.controller)
            .field("server_port", &self.server_port)
            .finish()
    }
}

pub fn router(state: Arc<AgentState>) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(health_check))
        .route(endpoints::METRICS, get(metrics))
        .route(endpoints::API_V1_STATUS, get(status))
        .route(endpoints::API_V1_COMMANDS, get(list_commands))
        .route(endpoints::API_V1_COMMAND, post(run_command))
        .with_state(state)
}

#[instrument]
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "warden-agent",
        "version": warden_core::VERSION
    }))
}

#[instrument(skip(state))]
async fn metrics(State(state): State<Arc<AgentState>>) -> Json<Value> {
    let stats = state.controller.stats();
    Json(json!({
        "service": "warden-agent",
        "uptime_seconds": state.started_at.elapsed().as_secs(),
        "failures": stats.failures(),
        "operations": stats,
    }))
}

#[instrument(skip(state))]
async fn status(State(state): State<Arc<AgentState>>) -> Json<StatusResponse> {
    Json(status_response(&state).await)
}

async fn list_commands() -> Json<Vec<CommandInfo>> {
    Json(command_list())
}

#[instrument(skip(state))]
async fn run_command(
    State(state): State<Arc<AgentState>>,
    Path(name): Path<String>,
) -> Result<Json<CommandReply>, (StatusCode, Json<Value>)> {
    let command: Command = name.parse().map_err(|err: warden_core::WardenError| {
        (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() })))
    })?;
    info!(%command, "dispatching command");

    let controller = &state.controller;
    let reply = match command {
        Command::Welcome => CommandReply::Welcome {
            message: WELCOME.to_string(),
        },
        Command::Help => CommandReply::Help {
            commands: command_list(),
        },
        Command::StartServer => CommandReply::Action {
            command,
            result: controller.start().await,
        },
        Command::StopServer => CommandReply::Action {
            command,
            result: controller.stop().await,
        },
        Command::RestartServer => CommandReply::Action {
            command,
            result: controller.restart().await,
        },
        Command::StatusServer => CommandReply::Status(status_response(&state).await),
    };
    Ok(Json(reply))
}

async fn status_response(state: &AgentState) -> StatusResponse {
    let (report, public_address) = tokio::join!(
        state.controller.status_report(),
        state.address.public_address()
    );
    StatusResponse {
        report,
        public_address,
        server_port: state.server_port,
    }
}
