//! # Warden Core
//!
//! Core types for remote lifecycle control of a single game server.
//!
//! - [`ServerState`] and [`StatusReport`] describe what a probe observed
//! - [`ActionOutcome`] is the only artifact of a start, stop or restart
//! - [`PollConfig`] is loaded once from [`WardenConfig`] and shared read-only

pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod outcome;
pub mod state;

pub use api::{command_list, CommandInfo, CommandReply, StatusResponse};
pub use command::Command;
pub use config::{load_from_path, ActionCommands, PollConfig, ProbeTarget, WardenConfig};
pub use error::{Result, WardenError};
pub use outcome::{ActionKind, ActionOutcome, FailureReason};
pub use state::{Metrics, ServerState, StatusReport, TargetState};

/// Current Warden version for compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Warden build information for logs and the health endpoint
pub const BUILD_INFO: &str = concat!(
    "Warden ",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_NAME"),
    ")"
);

/// HTTP endpoints served by the Warden agent
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const METRICS: &str = "/metrics";
    pub const API_V1_STATUS: &str = "/api/v1/status";
    pub const API_V1_COMMANDS: &str = "/api/v1/commands";
    pub const API_V1_COMMAND: &str = "/api/v1/commands/{name}";
}
