//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, per-cycle span with cycle_id)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Console and optional log file
//!     → Prometheus textfile, written once at exit
//! ```

pub mod logging;
pub mod metrics;
