//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Install a Prometheus recorder (no HTTP listener: the agent is one-shot)
//! - Write the exposition to a node-exporter textfile at exit
//!
//! # Metrics
//! - `gate_http_attempts_total` (counter): request attempts by result
//! - `gate_sync_cycles_total` (counter): cycles by outcome
//! - `gate_config_applies_total` (counter): successful applies
//! - `gate_service_restarts_total` (counter): restarts by health

use std::path::Path;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global recorder. Returns `None` if one is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Metrics recorder not installed");
            None
        }
    }
}

/// Write the current exposition to `path` via a sibling temp file.
pub fn write_textfile(handle: &PrometheusHandle, path: &Path) -> std::io::Result<()> {
    let temp = path.with_extension("prom.tmp");
    std::fs::write(&temp, handle.render())?;
    std::fs::rename(&temp, path)
}
