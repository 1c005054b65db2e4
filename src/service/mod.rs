//! Proxy service lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceController::restart_and_verify
//!     → ServiceManager::restart     (failure is fatal to the cycle)
//!     → settle delay
//!     → ServiceManager::is_active   (false is a normal, reportable outcome)
//! ```
//!
//! `systemd.rs` drives the host's systemd through `systemctl`; tests supply
//! their own `ServiceManager`.

pub mod controller;
pub mod systemd;

use async_trait::async_trait;
use thiserror::Error;

pub use controller::ServiceController;
pub use systemd::Systemctl;

/// Errors raised when a restart could not be issued.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Restart of {unit} failed ({status}): {stderr}")]
    RestartFailed {
        unit: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Host service manager operations needed by the agent.
#[async_trait]
pub trait ServiceManager: Send + Sync {
    /// Restart `unit`. An `Err` means the restart may not have happened.
    async fn restart(&self, unit: &str) -> Result<(), ServiceError>;

    /// Whether `unit` is currently active. Query failures report `false`.
    async fn is_active(&self, unit: &str) -> bool;
}
