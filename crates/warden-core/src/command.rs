//! Command table shared by every front end

use crate::error::WardenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    #[serde(rename = "start")]
    Welcome,
    Help,
    StartServer,
    StopServer,
    RestartServer,
    StatusServer,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Welcome,
        Command::Help,
        Command::StartServer,
        Command::StopServer,
        Command::RestartServer,
        Command::StatusServer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Welcome => "start",
            Self::Help => "help",
            Self::StartServer => "start_server",
            Self::StopServer => "stop_server",
            Self::RestartServer => "restart_server",
            Self::StatusServer => "status_server",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome message",
            Self::Help => "List available commands",
            Self::StartServer => "Start the server",
            Self::StopServer => "Stop the server",
            Self::RestartServer => "Restart the server",
            Self::StatusServer => "Show the status of the server",
        }
    }

    /// Whether the command changes server state and must be serialized.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            Self::StartServer | Self::StopServer | Self::RestartServer
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = WardenError;

    /// Accepts chat-style names with or without the leading slash.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('/');
        Self::ALL
            .into_iter()
            .find(|command| command.name() == name)
            .ok_or_else(|| WardenError::UnknownCommand {
                name: s.to_string(),
            })
    }
}
