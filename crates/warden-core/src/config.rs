//! Configuration loading
//!
//! Warden reads a single YAML file at startup. Everything downstream receives
//! plain values derived from [`WardenConfig`]; nothing reads the file again.

use crate::error::{Result, WardenError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_PUBLIC_IP_URL: &str = "https://api.ipify.org";

/// On-disk configuration. Keys not listed here are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    pub server_ip: String,
    pub server_port: u16,
    pub server_start_cmd: String,
    pub server_stop_cmd: String,
    pub server_dir: PathBuf,
    /// Seconds between probes while waiting for convergence.
    pub status_check_interval: u64,
    /// Seconds to wait for convergence before giving up.
    pub status_timeout: u64,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_public_ip_url")]
    pub public_ip_url: String,
}

fn default_probe_timeout_ms() -> u64 {
    DEFAULT_PROBE_TIMEOUT_MS
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_public_ip_url() -> String {
    DEFAULT_PUBLIC_IP_URL.to_string()
}

/// Network endpoint the prober queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub host: String,
    pub port: u16,
    /// Upper bound for one probe: connect, request and response together.
    pub timeout: Duration,
}

/// Immutable polling parameters shared by the prober and the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub target: ProbeTarget,
    pub interval: Duration,
    pub timeout: Duration,
}

/// Shell command lines behind the start and stop actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCommands {
    pub start: String,
    pub stop: String,
    pub working_dir: PathBuf,
}

impl WardenConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: WardenConfig = serde_norway::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            target: ProbeTarget {
                host: self.server_ip.clone(),
                port: self.server_port,
                timeout: Duration::from_millis(self.probe_timeout_ms),
            },
            interval: Duration::from_secs(self.status_check_interval),
            timeout: Duration::from_secs(self.status_timeout),
        }
    }

    pub fn action_commands(&self) -> ActionCommands {
        ActionCommands {
            start: self.server_start_cmd.clone(),
            stop: self.server_stop_cmd.clone(),
            working_dir: self.server_dir.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_ip.trim().is_empty() {
            return Err(invalid("server_ip must not be empty"));
        }
        if self.server_start_cmd.trim().is_empty() {
            return Err(invalid("server_start_cmd must not be empty"));
        }
        if self.server_stop_cmd.trim().is_empty() {
            return Err(invalid("server_stop_cmd must not be empty"));
        }
        if self.status_check_interval == 0 {
            return Err(invalid("status_check_interval must be greater than zero"));
        }
        if self.status_timeout == 0 {
            return Err(invalid("status_timeout must be greater than zero"));
        }
        if self.probe_timeout_ms == 0 {
            return Err(invalid("probe_timeout_ms must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> WardenError {
    WardenError::InvalidConfig {
        reason: reason.to_string(),
    }
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<WardenConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| WardenError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = WardenConfig::from_yaml_str(&text)?;
    debug!(path = %path.display(), server = %cfg.server_ip, port = cfg.server_port, "configuration loaded");
    Ok(cfg)
}
