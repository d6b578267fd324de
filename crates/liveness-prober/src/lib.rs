pub use warden_core;

pub mod codec;
mod error;
mod prober;

pub use error::ProbeError;
pub use prober::{Prober, SlpProber};

// Re-export core types for convenience
pub use warden_core::{Metrics, ProbeTarget, ServerState};
