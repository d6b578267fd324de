//! Outcomes of lifecycle operations

use crate::state::TargetState;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// External action a mutating operation may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Start,
    Stop,
}

impl ActionKind {
    /// State the server is expected to converge to after this action.
    pub fn target(self) -> TargetState {
        match self {
            Self::Start => TargetState::Online,
            Self::Stop => TargetState::Offline,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

/// Why a mutating operation failed.
///
/// The `Display` strings are stable and meant to be matched by callers.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("could not invoke {action} action")]
    InvocationFailed { action: ActionKind },

    #[error("did not reach {target} within timeout")]
    ConvergenceTimeout { target: TargetState, timeout_ms: u64 },

    #[error("cancelled while waiting for {target}")]
    Cancelled { target: TargetState },
}

/// Result of `start`, `stop` or `restart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ActionOutcome {
    AlreadyInState,
    Succeeded,
    Failed(FailureReason),
}

impl ActionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Failed(reason) => Some(reason.to_string()),
            _ => None,
        }
    }
}
