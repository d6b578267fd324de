use std::time::Duration;
use thiserror::Error;

/// Reasons a single probe could not produce a status.
///
/// These never leave [`crate::Prober::probe`]; an unreachable server is
/// reported as `Offline`.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("no status within {0:?}")]
    Timeout(Duration),

    #[error("VarInt is longer than 5 bytes")]
    VarIntTooLong,

    #[error("frame length {0} is out of range")]
    FrameLength(i64),

    #[error("truncated packet")]
    Truncated,

    #[error("unexpected packet id {0:#04x}")]
    UnexpectedPacket(i32),

    #[error("status string is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid status payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}
