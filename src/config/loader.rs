//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::AgentConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Configuration file read when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/gate-syncer/config.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Proxy domain is not configured")]
    MissingDomain,
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AgentConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Load configuration from an explicit path, or from [`DEFAULT_CONFIG_PATH`]
/// falling back to built-in defaults when that file does not exist.
pub fn load_or_default(path: Option<&Path>) -> Result<AgentConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_config(default_path)
            } else {
                let config = AgentConfig::default();
                validate_config(&config).map_err(ConfigError::Validation)?;
                Ok(config)
            }
        }
    }
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<AgentConfig, ConfigError> {
    let config: AgentConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve the control plane domain.
///
/// Precedence: explicit override, then `control_plane.domain`, then the
/// trimmed content of `control_plane.domain_file`.
pub fn resolve_domain(
    config: &AgentConfig,
    override_domain: Option<&str>,
) -> Result<String, ConfigError> {
    let explicit = override_domain
        .or(config.control_plane.domain.as_deref())
        .map(str::trim)
        .filter(|d| !d.is_empty());
    if let Some(domain) = explicit {
        return Ok(domain.to_string());
    }

    config
        .control_plane
        .domain_file
        .as_deref()
        .and_then(read_domain_file)
        .ok_or(ConfigError::MissingDomain)
}

/// Read a domain from a file. Unreadable or blank files yield `None`.
pub fn read_domain_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let domain = content.trim();
            (!domain.is_empty()).then(|| domain.to_string())
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Domain file not readable");
            None
        }
    }
}
