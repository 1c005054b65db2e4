//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to control plane:
//!     → reqwest client (per-call timeout, see control_plane)
//!     → retries.rs (classify response, wait fixed delay, retry)
//!     → RequestOutcome (Json / Completed / NotFound / Exhausted / Fatal)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Exhaustion is a value, not an error: callers decide what it means

pub mod retries;

pub use retries::{JsonObject, RequestOutcome, ResilientHttpClient};
