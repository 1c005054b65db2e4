//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! main:
//!     Load config → Init logging/metrics → runner.rs → Write metrics → Exit
//!
//! runner.rs:
//!     Resolve domain → Build orchestrator → Run one command
//!     raced against signals.rs (SIGINT → stop, exit 130)
//! ```
//!
//! # Design Decisions
//! - One invocation, one cycle: scheduling belongs to a systemd timer or cron
//! - No internal locking; overlapping invocations must be prevented by the host
//! - Fatal cycle errors exit 1, every other ending exits 0

pub mod runner;
pub mod signals;

pub use runner::{run, Command};
