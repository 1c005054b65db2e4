//! Atomic apply of the rendered configuration.
//!
//! # Responsibilities
//! - Stage the full text in a temp file next to the live file
//! - Rename the temp file over the live file
//! - Hand ownership of the live file to the proxy's runtime user
//!
//! # Design Decisions
//! - The live file is only ever replaced by rename(2): readers see the old
//!   file or the new file, never a partial write
//! - Every failure is returned to the caller; nothing is swallowed

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::ProxyFileConfig;

/// Errors raised while applying a configuration.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace {} with {}: {source}", .to.display(), .from.display())]
    Replace {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run chown for {}: {source}", .path.display())]
    ChownSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("chown {owner} {} failed ({status}): {stderr}", .path.display())]
    Chown {
        owner: String,
        path: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Writes configuration text to the live proxy config path.
#[derive(Debug, Clone)]
pub struct ConfigApplier {
    target_path: PathBuf,
    temp_path: PathBuf,
    owner: Option<String>,
}

impl ConfigApplier {
    pub fn new(config: &ProxyFileConfig) -> Self {
        Self {
            target_path: config.config_path.clone(),
            temp_path: config.temp_path.clone(),
            owner: config.owner.clone(),
        }
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Stage, replace and chown.
    pub async fn apply(&self, text: &str) -> Result<(), ApplyError> {
        self.stage(text).await?;
        self.commit().await?;
        if let Some(owner) = &self.owner {
            self.chown(owner).await?;
        }

        metrics::counter!("gate_config_applies_total").increment(1);
        tracing::info!(
            path = %self.target_path.display(),
            bytes = text.len(),
            "Proxy configuration applied"
        );
        Ok(())
    }

    /// Write `text` completely to the temp path and flush it to disk.
    pub async fn stage(&self, text: &str) -> Result<(), ApplyError> {
        let write_err = |source: std::io::Error| ApplyError::Write {
            path: self.temp_path.clone(),
            source,
        };

        let mut file = fs::File::create(&self.temp_path).await.map_err(write_err)?;
        file.write_all(text.as_bytes()).await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        Ok(())
    }

    /// Rename the staged file over the live file.
    pub async fn commit(&self) -> Result<(), ApplyError> {
        fs::rename(&self.temp_path, &self.target_path)
            .await
            .map_err(|source| ApplyError::Replace {
                from: self.temp_path.clone(),
                to: self.target_path.clone(),
                source,
            })
    }

    async fn chown(&self, owner: &str) -> Result<(), ApplyError> {
        let output = Command::new("chown")
            .arg(owner)
            .arg(&self.target_path)
            .output()
            .await
            .map_err(|source| ApplyError::ChownSpawn {
                path: self.target_path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ApplyError::Chown {
                owner: owner.to_string(),
                path: self.target_path.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
