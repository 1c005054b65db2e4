//! Control plane integration.
//!
//! # Data Flow
//! ```text
//! GET  https://{domain}/sync-gateway  → SyncPayload JSON (fetch_retries attempts)
//! POST https://{domain}/sync-gateway  ← {"state_timestamp": <float>} (ack_retries attempts)
//! ```
//!
//! The control plane is the single source of truth for whether a sync is
//! needed. It only learns that a change was absorbed through the POST.

pub mod client;

pub use client::{ControlPlaneClient, ControlPlaneError};
