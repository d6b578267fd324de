//! External start/stop actions

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};
use warden_core::{ActionCommands, ActionKind, Result, WardenError};

/// Fires the external action behind `start` or `stop`.
///
/// `Ok` means the action was launched, not that the server converged.
#[async_trait]
pub trait ActionInvoker: Send + Sync {
    async fn invoke(&self, action: ActionKind) -> Result<()>;
}

/// Runs the configured command line through `sh -c` inside the server directory.
#[derive(Debug, Clone)]
pub struct ShellActionInvoker {
    commands: ActionCommands,
}

impl ShellActionInvoker {
    pub fn new(commands: ActionCommands) -> Self {
        Self { commands }
    }

    fn command_line(&self, action: ActionKind) -> &str {
        match action {
            ActionKind::Start => &self.commands.start,
            ActionKind::Stop => &self.commands.stop,
        }
    }
}

#[async_trait]
impl ActionInvoker for ShellActionInvoker {
    #[instrument(skip(self), fields(dir = %self.commands.working_dir.display()))]
    async fn invoke(&self, action: ActionKind) -> Result<()> {
        let line = self.command_line(action);
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(line)
            .current_dir(&self.commands.working_dir)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|err| WardenError::ActionInvocation {
                action: action.to_string(),
                reason: err.to_string(),
            })?;

        info!(%action, command = line, pid = child.id(), "action launched");

        // Reap the child in the background so the caller only waits on the probe.
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => debug!(%action, "action exited cleanly"),
                Ok(status) => warn!(%action, %status, "action exited with failure"),
                Err(err) => warn!(%action, error = %err, "could not wait on action"),
            }
        });

        Ok(())
    }
}
