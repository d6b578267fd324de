//! Error types for Warden

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WardenError>;

#[derive(Error, Debug)]
pub enum WardenError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {source}")]
    ConfigParse {
        #[from]
        source: serde_norway::Error,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Could not invoke {action} action: {reason}")]
    ActionInvocation { action: String, reason: String },

    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}
