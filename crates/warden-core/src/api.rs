//! Request and reply bodies exchanged between the agent and its clients

use crate::command::Command;
use crate::outcome::ActionOutcome;
use crate::state::StatusReport;
use serde::{Deserialize, Serialize};

/// Status as rendered to operators: the probe result plus where to connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub report: StatusReport,
    pub public_address: String,
    pub server_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
}

impl From<Command> for CommandInfo {
    fn from(command: Command) -> Self {
        Self {
            name: command.name().to_string(),
            description: command.description().to_string(),
        }
    }
}

pub fn command_list() -> Vec<CommandInfo> {
    Command::ALL.into_iter().map(CommandInfo::from).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandReply {
    Welcome { message: String },
    Help { commands: Vec<CommandInfo> },
    Action { command: Command, result: ActionOutcome },
    Status(StatusResponse),
}
