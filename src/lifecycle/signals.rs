//! OS signal handling.
//!
//! # Responsibilities
//! - Resolve when the operator interrupts the process (SIGINT / Ctrl+C)
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - If the handler cannot be installed the future never resolves and the
//!   cycle runs to completion

/// Wait for Ctrl+C.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
