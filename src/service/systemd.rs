//! systemd backend for [`ServiceManager`].

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::{ServiceError, ServiceManager};

/// Runs `systemctl restart` / `systemctl is-active --quiet`.
#[derive(Debug, Clone)]
pub struct Systemctl {
    program: String,
}

impl Systemctl {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Systemctl {
    fn default() -> Self {
        Self::new("systemctl")
    }
}

#[async_trait]
impl ServiceManager for Systemctl {
    async fn restart(&self, unit: &str) -> Result<(), ServiceError> {
        tracing::info!(unit, "Restarting service");

        let output = Command::new(&self.program)
            .arg("restart")
            .arg(unit)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ServiceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ServiceError::RestartFailed {
                unit: unit.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    async fn is_active(&self, unit: &str) -> bool {
        let status = Command::new(&self.program)
            .args(["is-active", "--quiet"])
            .arg(unit)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                tracing::warn!(unit, program = %self.program, error = %e, "Service state query failed");
                false
            }
        }
    }
}
