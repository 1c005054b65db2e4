//! Gateway sync agent library

pub mod config;
pub mod control_plane;
pub mod lifecycle;
pub mod observability;
pub mod proxy_config;
pub mod resilience;
pub mod service;
pub mod sync;

pub use config::AgentConfig;
pub use sync::{CycleOutcome, SyncError, SyncOrchestrator};
