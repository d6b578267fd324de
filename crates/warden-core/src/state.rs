//! Server state as observed by a single probe

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metrics reported by a reachable server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub online: u32,
    pub max: u32,
    pub latency_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motd: Option<String>,
}

/// Observed state of the controlled server.
///
/// Derived fresh from every probe and never cached. A probe only ever yields
/// `Online` or `Offline`; `Unknown` is for callers that could not ask at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "metrics", rename_all = "snake_case")]
pub enum ServerState {
    Unknown,
    Online(Option<Metrics>),
    Offline,
}

impl ServerState {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online(_))
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        match self {
            Self::Online(metrics) => metrics.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Online(_) => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// State a mutating operation converges towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    Online,
    Offline,
}

impl TargetState {
    pub fn is_reached_by(self, state: &ServerState) -> bool {
        match self {
            Self::Online => state.is_online(),
            Self::Offline => matches!(state, ServerState::Offline),
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "Online"),
            Self::Offline => write!(f, "Offline"),
        }
    }
}

/// Result of a read-only status query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub state: ServerState,
    pub observed_at: chrono::DateTime<chrono::Utc>,
}

impl StatusReport {
    pub fn observed(state: ServerState) -> Self {
        Self {
            state,
            observed_at: chrono::Utc::now(),
        }
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.state.metrics()
    }
}
