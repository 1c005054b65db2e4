//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the agent.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway sync agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Control plane endpoint and request policy.
    pub control_plane: ControlPlaneConfig,

    /// Rendered proxy configuration file.
    pub proxy: ProxyFileConfig,

    /// Proxy service managed by the host's service manager.
    pub service: ServiceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Control plane configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlPlaneConfig {
    /// Proxy-facing domain of the control plane (e.g., "bot.example.com").
    pub domain: Option<String>,

    /// File holding the domain, used when `domain` is not set.
    pub domain_file: Option<PathBuf>,

    /// URL scheme ("https" in production).
    pub scheme: String,

    /// Path of the sync endpoint, shared by the fetch and acknowledgment calls.
    pub path: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Attempts for the sync-status fetch.
    pub fetch_retries: u32,

    /// Attempts for the acknowledgment.
    pub ack_retries: u32,

    /// Fixed delay between attempts in milliseconds.
    pub retry_delay_ms: u64,

    /// Honour HTTP(S)_PROXY environment variables.
    pub system_proxy: bool,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            domain: None,
            domain_file: None,
            scheme: "https".to_string(),
            path: "/sync-gateway".to_string(),
            request_timeout_secs: 5,
            fetch_retries: 3,
            ack_retries: 5,
            retry_delay_ms: 3000,
            system_proxy: true,
        }
    }
}

/// Location and ownership of the rendered proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyFileConfig {
    /// Live configuration file included by the proxy.
    pub config_path: PathBuf,

    /// Staging file, renamed over `config_path` on apply.
    pub temp_path: PathBuf,

    /// Owner applied to the live file (`user` or `user:group`).
    pub owner: Option<String>,
}

impl Default for ProxyFileConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("/etc/nginx/stream.d/proxies.conf"),
            temp_path: PathBuf::from("/etc/nginx/stream.d/proxies.conf.tmp"),
            owner: Some("nginx".to_string()),
        }
    }
}

/// Proxy service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Unit name passed to the service manager.
    pub unit: String,

    /// Path to the `systemctl` binary.
    pub systemctl_path: String,

    /// Delay between restart and the health query in milliseconds.
    pub settle_delay_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            unit: "nginx".to_string(),
            systemctl_path: "systemctl".to_string(),
            settle_delay_ms: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Optional log file, appended to alongside the console output.
    pub log_file: Option<PathBuf>,

    /// Prometheus textfile written at exit.
    pub metrics_textfile: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            metrics_textfile: None,
        }
    }
}
