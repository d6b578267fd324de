mod render;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use liveness_prober::{Prober, SlpProber};
use std::time::Duration;
use warden_core::{endpoints, ActionOutcome, Command, CommandReply, ProbeTarget, ServerState};

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Warden CLI - remote control of a game server")]
#[command(version = warden_core::VERSION)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Base URL of the Warden agent
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080")]
    agent: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Start,
    /// Stop the server
    Stop,
    /// Restart the server
    Restart,
    /// Show the status of the server
    Status,
    /// List the commands the agent understands
    Help,
    /// Probe a server directly, without going through the agent
    Probe {
        #[arg(long)]
        host: String,
        #[arg(long, default_value_t = 25565)]
        port: u16,
        #[arg(long, default_value_t = 3000)]
        timeout_ms: u64,
    },
}

struct AgentClient {
    http: reqwest::Client,
    base: String,
}

impl AgentClient {
    fn new(base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    async fn run(&self, command: Command) -> anyhow::Result<CommandReply> {
        let url = format!("{}{}/{}", self.base, endpoints::API_V1_COMMANDS, command.name());
        let reply = self
            .http
            .post(&url)
            .send()
            .await
            .with_context(|| format!("could not reach agent at {}", self.base))?
            .error_for_status()?
            .json()
            .await?;
        Ok(reply)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Start => Command::StartServer,
        Commands::Stop => Command::StopServer,
        Commands::Restart => Command::RestartServer,
        Commands::Status => Command::StatusServer,
        Commands::Help => Command::Help,
        Commands::Probe {
            host,
            port,
            timeout_ms,
        } => return handle_probe(host, port, timeout_ms).await,
    };

    handle_command(&AgentClient::new(&cli.agent), command).await
}

async fn handle_command(client: &AgentClient, command: Command) -> anyhow::Result<()> {
    if let Some(message) = render::pending_message(command) {
        println!("{message}");
    }

    let reply = match client.run(command).await {
        Ok(reply) => reply,
        Err(err) => {
            println!("{}", render::render_state(&ServerState::Unknown));
            return Err(err);
        }
    };
    println!("{}", render::render_reply(&reply));

    if let CommandReply::Action {
        result: ActionOutcome::Failed(reason),
        ..
    } = reply
    {
        bail!("{command} failed: {reason}");
    }
    Ok(())
}

async fn handle_probe(host: String, port: u16, timeout_ms: u64) -> anyhow::Result<()> {
    println!("📡 Probing {host}:{port}...");
    let prober = SlpProber::new(ProbeTarget {
        host,
        port,
        timeout: Duration::from_millis(timeout_ms),
    });
    let state = prober.probe().await;
    println!("{}", render::render_state(&state));
    if let Some(motd) = state.metrics().and_then(|m| m.motd.as_deref()) {
        println!("💬 {motd}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_subcommand_maps_to_agent_help() {
        let cli = Cli::try_parse_from(["warden", "help"]).unwrap();
        assert!(matches!(cli.command, Commands::Help));
        assert_eq!(cli.agent, "http://127.0.0.1:8080");
    }

    #[test]
    fn probe_takes_host_and_defaults() {
        let cli = Cli::try_parse_from(["warden", "probe", "--host", "mc.example.org"]).unwrap();
        match cli.command {
            Commands::Probe {
                host,
                port,
                timeout_ms,
            } => {
                assert_eq!(host, "mc.example.org");
                assert_eq!(port, 25565);
                assert_eq!(timeout_ms, 3000);
            }
            _ => panic!("expected probe"),
        }
    }

    #[test]
    fn agent_flag_is_global() {
        let cli = Cli::try_parse_from(["warden", "status", "--agent", "http://10.0.0.2:8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Status));
        assert_eq!(cli.agent, "http://10.0.0.2:8080");
    }
}
