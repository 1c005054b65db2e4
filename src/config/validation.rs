//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, retry counts > 0)
//! - Check that the staging file can be renamed over the live file
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AgentConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is handed to any component

use std::fmt;

use crate::config::schema::AgentConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "control_plane.scheme").
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AgentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let cp = &config.control_plane;
    if cp.scheme != "https" && cp.scheme != "http" {
        errors.push(ValidationError::new(
            "control_plane.scheme",
            format!("unsupported scheme '{}'", cp.scheme),
        ));
    }
    if !cp.path.starts_with('/') {
        errors.push(ValidationError::new(
            "control_plane.path",
            "must start with '/'",
        ));
    }
    if cp.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "control_plane.request_timeout_secs",
            "must be greater than 0",
        ));
    }
    if cp.fetch_retries == 0 {
        errors.push(ValidationError::new(
            "control_plane.fetch_retries",
            "must be greater than 0",
        ));
    }
    if cp.ack_retries == 0 {
        errors.push(ValidationError::new(
            "control_plane.ack_retries",
            "must be greater than 0",
        ));
    }
    if let Some(domain) = &cp.domain {
        if domain.trim().is_empty() {
            errors.push(ValidationError::new("control_plane.domain", "must not be empty"));
        }
    }

    let proxy = &config.proxy;
    if proxy.config_path == proxy.temp_path {
        errors.push(ValidationError::new(
            "proxy.temp_path",
            "must differ from proxy.config_path",
        ));
    }
    // rename(2) is only atomic within one filesystem
    if proxy.config_path.parent() != proxy.temp_path.parent() {
        errors.push(ValidationError::new(
            "proxy.temp_path",
            "must be in the same directory as proxy.config_path",
        ));
    }
    if let Some(owner) = &proxy.owner {
        if owner.trim().is_empty() || owner.starts_with(':') {
            errors.push(ValidationError::new("proxy.owner", "must name a user"));
        }
    }

    if config.service.unit.trim().is_empty() {
        errors.push(ValidationError::new("service.unit", "must not be empty"));
    }
    if config.service.systemctl_path.trim().is_empty() {
        errors.push(ValidationError::new(
            "service.systemctl_path",
            "must not be empty",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
