//! Operation counters served by the agent's metrics endpoint

use serde::Serialize;
use warden_core::{ActionOutcome, FailureReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Start,
    Stop,
    Restart,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationStats {
    pub starts: u64,
    pub stops: u64,
    pub restarts: u64,
    pub status_reports: u64,
    pub succeeded: u64,
    pub already_in_state: u64,
    pub invocation_failures: u64,
    pub timeouts: u64,
    pub cancelled: u64,
}

impl OperationStats {
    pub(crate) fn record(&mut self, kind: OperationKind, outcome: &ActionOutcome) {
        match kind {
            OperationKind::Start => self.starts += 1,
            OperationKind::Stop => self.stops += 1,
            OperationKind::Restart => self.restarts += 1,
        }
        match outcome {
            ActionOutcome::AlreadyInState => self.already_in_state += 1,
            ActionOutcome::Succeeded => self.succeeded += 1,
            ActionOutcome::Failed(FailureReason::InvocationFailed { .. }) => {
                self.invocation_failures += 1
            }
            ActionOutcome::Failed(FailureReason::ConvergenceTimeout { .. }) => self.timeouts += 1,
            ActionOutcome::Failed(FailureReason::Cancelled { .. }) => self.cancelled += 1,
        }
    }

    pub fn failures(&self) -> u64 {
        self.invocation_failures + self.timeouts + self.cancelled
    }
}
