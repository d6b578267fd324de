//! # Lifecycle Controller
//!
//! Drives a single server towards `Online` or `Offline`, using a [`Prober`]
//! as the only source of truth and an [`ActionInvoker`] to fire the external
//! start and stop actions.

pub use liveness_prober;
pub use warden_core;

mod controller;
mod invoker;
pub mod poll;
mod stats;

pub use controller::LifecycleController;
pub use invoker::{ActionInvoker, ShellActionInvoker};
pub use poll::{poll_until, PollOutcome};
pub use stats::{OperationKind, OperationStats};

// Re-export core types for convenience
pub use liveness_prober::Prober;
pub use tokio_util::sync::CancellationToken;
pub use warden_core::{ActionKind, ActionOutcome, FailureReason, PollConfig, StatusReport};
