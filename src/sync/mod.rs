//! Sync subsystem.
//!
//! # Data Flow
//! ```text
//! control_plane::fetch_state
//!     → payload.rs (validate, convert to SyncPayload)
//!     → orchestrator.rs
//!         → proxy_config::render → proxy_config::ConfigApplier
//!         → service::ServiceController
//!         → control_plane::acknowledge
//! ```

pub mod orchestrator;
pub mod payload;

pub use orchestrator::{CycleOutcome, SyncError, SyncOrchestrator};
pub use payload::{parse_payload, validate, PayloadError, PendingChange, ServerEndpoint, SyncPayload};
