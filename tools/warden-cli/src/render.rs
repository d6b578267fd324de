//! Human-readable replies

use warden_core::{
    ActionOutcome, Command, CommandInfo, CommandReply, ServerState, StatusResponse,
};

pub fn pending_message(command: Command) -> Option<&'static str> {
    match command {
        Command::StartServer => Some("🟢 Starting the server...\nPlease wait. ⏳"),
        Command::StopServer => Some("🔴 Stopping the server...\nPlease wait. ⏳"),
        Command::RestartServer => Some("🔄 Restarting the server...\nPlease wait. ⏳"),
        _ => None,
    }
}

pub fn render_reply(reply: &CommandReply) -> String {
    match reply {
        CommandReply::Welcome { message } => format!("👋 {message}"),
        CommandReply::Help { commands } => render_help(commands),
        CommandReply::Action { command, result } => render_outcome(*command, result),
        CommandReply::Status(status) => render_status(status),
    }
}

pub fn render_help(commands: &[CommandInfo]) -> String {
    let mut out = String::from("🛠 Available commands:\n");
    for command in commands {
        out.push_str(&format!("\n👉 {} - {}", command.name, command.description));
    }
    out
}

pub fn render_outcome(command: Command, outcome: &ActionOutcome) -> String {
    let verb = match command {
        Command::StopServer => "stop",
        Command::RestartServer => "restart",
        _ => "start",
    };
    match (command, outcome) {
        (Command::StopServer, ActionOutcome::AlreadyInState) => {
            "✅ Server is already stopped.\nNo need to stop it again.".to_string()
        }
        (_, ActionOutcome::AlreadyInState) => {
            "✅ Server is already running.\nNo need to start it again.".to_string()
        }
        (Command::StopServer, ActionOutcome::Succeeded) => {
            "✅ Server stopped successfully! 🛑".to_string()
        }
        (Command::RestartServer, ActionOutcome::Succeeded) => {
            "✅ Server restarted successfully! 🔄".to_string()
        }
        (_, ActionOutcome::Succeeded) => "✅ Server started successfully! 🚀".to_string(),
        (_, ActionOutcome::Failed(reason)) => {
            format!("❌ Failed to {verb} the server: {reason}.\nPlease check the logs for details.")
        }
    }
}

pub fn render_state(state: &ServerState) -> String {
    match state {
        ServerState::Online(metrics) => {
            let mut out = String::from("✅ Server is Online!");
            if let Some(m) = metrics {
                out.push_str(&format!("\n👥 Players: {}/{}", m.online, m.max));
                if let Some(version) = &m.version {
                    out.push_str(&format!("\n🧱 Version: {version}"));
                }
                out.push_str(&format!("\n📶 Ping: {:.2} ms", m.latency_ms));
            }
            out
        }
        ServerState::Offline => "❌ Server is Offline or Unreachable!".to_string(),
        ServerState::Unknown => "❓ Server state is unknown.".to_string(),
    }
}

pub fn render_status(status: &StatusResponse) -> String {
    let mut out = render_state(&status.report.state);
    out.push_str(&format!("\n🌍 Public IP: {}", status.public_address));
    if status.report.state.is_online() {
        out.push_str(&format!("\n🔌 Server Port: {}", status.server_port));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::{ActionKind, FailureReason, Metrics, StatusReport, TargetState};

    #[test]
    fn already_running_start() {
        let text = render_outcome(Command::StartServer, &ActionOutcome::AlreadyInState);
        assert!(text.contains("already running"));
    }

    #[test]
    fn stop_success_and_idempotence_differ() {
        assert!(render_outcome(Command::StopServer, &ActionOutcome::Succeeded)
            .contains("stopped successfully"));
        assert!(render_outcome(Command::StopServer, &ActionOutcome::AlreadyInState)
            .contains("already stopped"));
    }

    #[test]
    fn failures_carry_the_reason() {
        let outcome = ActionOutcome::Failed(FailureReason::ConvergenceTimeout {
            target: TargetState::Online,
            timeout_ms: 30_000,
        });
        let text = render_outcome(Command::RestartServer, &outcome);
        assert!(text.starts_with("❌ Failed to restart the server"));
        assert!(text.contains("did not reach Online within timeout"));

        let outcome = ActionOutcome::Failed(FailureReason::InvocationFailed {
            action: ActionKind::Start,
        });
        assert!(render_outcome(Command::StartServer, &outcome).contains("could not invoke"));
    }

    #[test]
    fn online_status_shows_players_and_port() {
        let status = StatusResponse {
            report: StatusReport::observed(ServerState::Online(Some(Metrics {
                online: 3,
                max: 20,
                latency_ms: 12.345,
                version: None,
                motd: None,
            }))),
            public_address: "203.0.113.9".to_string(),
            server_port: 25565,
        };
        let text = render_status(&status);
        assert!(text.contains("👥 Players: 3/20"));
        assert!(text.contains("📶 Ping: 12.35 ms") || text.contains("📶 Ping: 12.34 ms"));
        assert!(text.contains("🔌 Server Port: 25565"));
    }

    #[test]
    fn offline_status_hides_port() {
        let status = StatusResponse {
            report: StatusReport::observed(ServerState::Offline),
            public_address: "unavailable (timeout)".to_string(),
            server_port: 25565,
        };
        let text = render_status(&status);
        assert!(text.starts_with("❌ Server is Offline"));
        assert!(!text.contains("Server Port"));
    }

    #[test]
    fn only_mutations_have_pending_messages() {
        assert!(pending_message(Command::RestartServer).is_some());
        assert!(pending_message(Command::StatusServer).is_none());
    }
}
