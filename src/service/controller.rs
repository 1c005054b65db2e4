//! Restart and health verification of the proxy service.

use std::sync::Arc;
use std::time::Duration;

use super::{ServiceError, ServiceManager};
use crate::config::ServiceConfig;

/// Restarts the proxy unit and reports whether it came back active.
#[derive(Clone)]
pub struct ServiceController {
    manager: Arc<dyn ServiceManager>,
    unit: String,
    settle_delay: Duration,
}

impl ServiceController {
    pub fn new(config: &ServiceConfig, manager: Arc<dyn ServiceManager>) -> Self {
        Self {
            manager,
            unit: config.unit.clone(),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Restart, wait for the unit to settle, then check it is active.
    ///
    /// `Ok(false)` is an unhealthy service; `Err` means the restart itself
    /// could not be issued.
    pub async fn restart_and_verify(&self) -> Result<bool, ServiceError> {
        self.manager.restart(&self.unit).await?;

        tokio::time::sleep(self.settle_delay).await;

        let healthy = self.manager.is_active(&self.unit).await;
        metrics::counter!(
            "gate_service_restarts_total",
            "healthy" => if healthy { "true" } else { "false" }
        )
        .increment(1);

        if healthy {
            tracing::info!(unit = %self.unit, "Service is active after restart");
        } else {
            tracing::warn!(unit = %self.unit, "Service is not active after restart");
        }
        Ok(healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeManager {
        restart_ok: bool,
        active: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeManager {
        fn new(restart_ok: bool, active: bool) -> Arc<Self> {
            Arc::new(Self {
                restart_ok,
                active,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ServiceManager for FakeManager {
        async fn restart(&self, unit: &str) -> Result<(), ServiceError> {
            self.calls.lock().unwrap().push(format!("restart {unit}"));
            if self.restart_ok {
                Ok(())
            } else {
                Err(ServiceError::Spawn {
                    program: "systemctl".into(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
            }
        }

        async fn is_active(&self, unit: &str) -> bool {
            self.calls.lock().unwrap().push(format!("is-active {unit}"));
            self.active
        }
    }

    fn config() -> ServiceConfig {
        ServiceConfig {
            unit: "nginx".into(),
            systemctl_path: "systemctl".into(),
            settle_delay_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_healthy_restart() {
        let manager = FakeManager::new(true, true);
        let controller = ServiceController::new(&config(), manager.clone());

        assert!(controller.restart_and_verify().await.unwrap());
        assert_eq!(
            *manager.calls.lock().unwrap(),
            vec!["restart nginx", "is-active nginx"]
        );
    }

    #[tokio::test]
    async fn test_inactive_after_restart_is_not_an_error() {
        let manager = FakeManager::new(true, false);
        let controller = ServiceController::new(&config(), manager);

        assert!(!controller.restart_and_verify().await.unwrap());
    }

    #[tokio::test]
    async fn test_restart_failure_skips_health_query() {
        let manager = FakeManager::new(false, true);
        let controller = ServiceController::new(&config(), manager.clone());

        assert!(controller.restart_and_verify().await.is_err());
        assert_eq!(*manager.calls.lock().unwrap(), vec!["restart nginx"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_settle_delay() {
        let manager = FakeManager::new(true, true);
        let mut cfg = config();
        cfg.settle_delay_ms = 1000;
        let controller = ServiceController::new(&cfg, manager);

        let start = tokio::time::Instant::now();
        controller.restart_and_verify().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
