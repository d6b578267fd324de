//! Lifecycle Controller
//!
//! Every operation re-derives the server state from a fresh probe; nothing is
//! cached between calls. Mutating operations are serialized so the external
//! actions never overlap.

use crate::invoker::ActionInvoker;
use crate::poll::{poll_until, PollOutcome};
use crate::stats::{OperationKind, OperationStats};
use liveness_prober::Prober;
use parking_lot::Mutex as StatsLock;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use warden_core::{ActionKind, ActionOutcome, FailureReason, PollConfig, StatusReport};

pub struct LifecycleController {
    prober: Arc<dyn Prober>,
    invoker: Arc<dyn ActionInvoker>,
    poll: PollConfig,
    /// Held for the whole of a start, stop or restart.
    operation_lock: Mutex<()>,
    shutdown: CancellationToken,
    stats: StatsLock<OperationStats>,
}

impl std::fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("poll", &self.poll)
            .field("operation_in_flight", &self.operation_lock.try_lock().is_err())
            .field("shutdown", &self.shutdown.is_cancelled())
            .finish()
    }
}

impl LifecycleController {
    pub fn new(
        prober: Arc<dyn Prober>,
        invoker: Arc<dyn ActionInvoker>,
        poll: PollConfig,
    ) -> Self {
        info!(
            interval = ?poll.interval,
            timeout = ?poll.timeout,
            "Initializing lifecycle controller"
        );
        Self {
            prober,
            invoker,
            poll,
            operation_lock: Mutex::new(()),
            shutdown: CancellationToken::new(),
            stats: StatsLock::new(OperationStats::default()),
        }
    }

    /// Polls in progress give up once `token` is cancelled.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    pub fn stats(&self) -> OperationStats {
        self.stats.lock().clone()
    }

    #[instrument(skip(self), fields(operation_id = %Uuid::new_v4()))]
    pub async fn start(&self) -> ActionOutcome {
        let _guard = self.operation_lock.lock().await;
        let outcome = self.converge(ActionKind::Start).await;
        self.record(OperationKind::Start, &outcome);
        outcome
    }

    #[instrument(skip(self), fields(operation_id = %Uuid::new_v4()))]
    pub async fn stop(&self) -> ActionOutcome {
        let _guard = self.operation_lock.lock().await;
        let outcome = self.converge(ActionKind::Stop).await;
        self.record(OperationKind::Stop, &outcome);
        outcome
    }

    /// Stops then starts a running server; starts an offline one.
    ///
    /// The start is attempted whatever the stop's outcome, unless shutdown
    /// cancelled the stop. The start's outcome is the one returned.
    #[instrument(skip(self), fields(operation_id = %Uuid::new_v4()))]
    pub async fn restart(&self) -> ActionOutcome {
        let _guard = self.operation_lock.lock().await;

        if self.prober.probe().await.is_online() {
            let stopped = self.converge(ActionKind::Stop).await;
            self.record(OperationKind::Stop, &stopped);
            match stopped {
                ActionOutcome::Failed(FailureReason::Cancelled { .. }) => {
                    self.record(OperationKind::Restart, &stopped);
                    return stopped;
                }
                ActionOutcome::Failed(reason) => {
                    warn!(%reason, "stop did not complete, starting anyway");
                }
                _ => {}
            }
        }

        let outcome = self.converge(ActionKind::Start).await;
        self.record(OperationKind::Restart, &outcome);
        outcome
    }

    /// Single probe. Never polls, never waits on a running operation.
    pub async fn status_report(&self) -> StatusReport {
        let report = StatusReport::observed(self.prober.probe().await);
        self.stats.lock().status_reports += 1;
        report
    }

    /// Probe, invoke once if needed, then wait for the action's target state.
    async fn converge(&self, action: ActionKind) -> ActionOutcome {
        let target = action.target();

        let current = self.prober.probe().await;
        if target.is_reached_by(&current) {
            info!(%action, state = %current, "already in target state");
            return ActionOutcome::AlreadyInState;
        }

        if self.shutdown.is_cancelled() {
            warn!(%action, "shutting down, action not invoked");
            return ActionOutcome::Failed(FailureReason::Cancelled { target });
        }

        if let Err(err) = self.invoker.invoke(action).await {
            warn!(%action, error = %err, "action could not be invoked");
            return ActionOutcome::Failed(FailureReason::InvocationFailed { action });
        }

        let prober = &self.prober;
        let polled = poll_until(
            self.poll.interval,
            self.poll.timeout,
            &self.shutdown,
            || async move { target.is_reached_by(&prober.probe().await) },
        )
        .await;

        match polled {
            PollOutcome::Reached => {
                info!(%action, %target, "target state reached");
                ActionOutcome::Succeeded
            }
            PollOutcome::TimedOut => {
                warn!(%action, %target, timeout = ?self.poll.timeout, "target state not reached");
                ActionOutcome::Failed(FailureReason::ConvergenceTimeout {
                    target,
                    timeout_ms: u64::try_from(self.poll.timeout.as_millis()).unwrap_or(u64::MAX),
                })
            }
            PollOutcome::Cancelled => {
                warn!(%action, %target, "shutdown while waiting for target state");
                ActionOutcome::Failed(FailureReason::Cancelled { target })
            }
        }
    }

    fn record(&self, kind: OperationKind, outcome: &ActionOutcome) {
        self.stats.lock().record(kind, outcome);
    }
}
