//! One sync cycle, end to end.
//!
//! # States
//! ```text
//! Fetching → Validating → UpToDate
//!                       → Applying → Restarting → Healthy   → Acknowledging
//!                                               → Unhealthy (no acknowledgment)
//! ```
//!
//! # Invariants
//! - Nothing is written, restarted or posted unless the payload validated
//!   and asked for a sync
//! - The acknowledgment is only sent after the new config is in place and
//!   the service reported active
//! - Without an acknowledgment the control plane re-sends the same change
//!   next cycle; render and apply are idempotent so repeating is safe

use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::AgentConfig;
use crate::control_plane::{ControlPlaneClient, ControlPlaneError};
use crate::proxy_config::{render, ApplyError, ConfigApplier};
use crate::resilience::RequestOutcome;
use crate::service::{ServiceController, ServiceError, ServiceManager};
use crate::sync::payload::{parse_payload, PayloadError, PendingChange, SyncPayload};

/// Errors that abort a cycle without acknowledgment.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Control plane setup failed: {0}")]
    ControlPlane(#[from] ControlPlaneError),

    #[error("Apply failed: {0}")]
    Apply(#[from] ApplyError),

    #[error("Service restart could not be issued: {0}")]
    Restart(#[from] ServiceError),
}

/// How a cycle ended when nothing fatal happened.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The control plane could not be reached or answered garbage.
    Unreachable,
    /// The control plane answered 404.
    NothingPending,
    /// The payload failed validation.
    Rejected(PayloadError),
    /// `sync_required` was false.
    UpToDate,
    /// Config applied but the service is not active. Not acknowledged.
    Unhealthy { state_timestamp: f64 },
    /// Config applied and service active.
    Applied {
        state_timestamp: f64,
        acknowledged: bool,
    },
}

impl CycleOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CycleOutcome::Unreachable => "unreachable",
            CycleOutcome::NothingPending => "nothing_pending",
            CycleOutcome::Rejected(_) => "rejected",
            CycleOutcome::UpToDate => "up_to_date",
            CycleOutcome::Unhealthy { .. } => "unhealthy",
            CycleOutcome::Applied {
                acknowledged: true, ..
            } => "applied",
            CycleOutcome::Applied {
                acknowledged: false,
                ..
            } => "unacknowledged",
        }
    }
}

enum Fetched {
    Pending(PendingChange),
    Done(CycleOutcome),
}

/// Drives fetch → validate → render → apply → restart → acknowledge.
pub struct SyncOrchestrator {
    control_plane: ControlPlaneClient,
    applier: ConfigApplier,
    service: ServiceController,
}

impl SyncOrchestrator {
    pub fn new(
        config: &AgentConfig,
        domain: &str,
        manager: Arc<dyn ServiceManager>,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            control_plane: ControlPlaneClient::new(&config.control_plane, domain)?,
            applier: ConfigApplier::new(&config.proxy),
            service: ServiceController::new(&config.service, manager),
        })
    }

    /// Run one full sync cycle.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, SyncError> {
        let span = tracing::info_span!("sync_cycle", cycle_id = %Uuid::new_v4());
        let result = self.cycle().instrument(span).await;

        let label = match &result {
            Ok(outcome) => outcome.label(),
            Err(_) => "failed",
        };
        metrics::counter!("gate_sync_cycles_total", "outcome" => label).increment(1);
        result
    }

    /// Fetch and validate, then return the text that would be applied.
    ///
    /// Writes nothing, restarts nothing and never acknowledges.
    pub async fn preview(&self) -> Result<String, CycleOutcome> {
        match self.fetch().await {
            Fetched::Pending(change) => Ok(render(&change.servers)),
            Fetched::Done(outcome) => Err(outcome),
        }
    }

    async fn cycle(&self) -> Result<CycleOutcome, SyncError> {
        let change = match self.fetch().await {
            Fetched::Pending(change) => change,
            Fetched::Done(outcome) => return Ok(outcome),
        };
        let state_timestamp = change.state_timestamp;

        tracing::info!(
            state_timestamp,
            servers = change.servers.len(),
            "Sync required, applying configuration"
        );
        let text = render(&change.servers);
        self.applier.apply(&text).await?;

        if !self.service.restart_and_verify().await? {
            tracing::warn!(
                state_timestamp,
                unit = %self.service.unit(),
                "Service unhealthy after apply; withholding acknowledgment"
            );
            return Ok(CycleOutcome::Unhealthy { state_timestamp });
        }

        let acknowledged = self.acknowledge(state_timestamp).await;
        Ok(CycleOutcome::Applied {
            state_timestamp,
            acknowledged,
        })
    }

    async fn fetch(&self) -> Fetched {
        let endpoint = self.control_plane.endpoint();

        let raw = match self.control_plane.fetch_state().await {
            RequestOutcome::Json(raw) => raw,
            RequestOutcome::NotFound => {
                tracing::info!(endpoint = %endpoint, "Control plane has no sync state for this gateway");
                return Fetched::Done(CycleOutcome::NothingPending);
            }
            RequestOutcome::Exhausted { attempts } => {
                tracing::warn!(endpoint = %endpoint, attempts, "Sync state could not be fetched");
                return Fetched::Done(CycleOutcome::Unreachable);
            }
            RequestOutcome::Fatal(e) => {
                tracing::error!(endpoint = %endpoint, error = %e, "Sync state request failed");
                return Fetched::Done(CycleOutcome::Unreachable);
            }
            RequestOutcome::Completed => {
                tracing::warn!(endpoint = %endpoint, "Sync state response had no body");
                return Fetched::Done(CycleOutcome::Unreachable);
            }
        };

        match parse_payload(&raw) {
            Ok(SyncPayload::UpToDate) => {
                tracing::debug!(endpoint = %endpoint, "Gateway configuration is up to date");
                Fetched::Done(CycleOutcome::UpToDate)
            }
            Ok(SyncPayload::Required(change)) => Fetched::Pending(change),
            Err(e) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "Invalid sync payload");
                Fetched::Done(CycleOutcome::Rejected(e))
            }
        }
    }

    async fn acknowledge(&self, state_timestamp: f64) -> bool {
        let endpoint = self.control_plane.endpoint();

        match self.control_plane.acknowledge(state_timestamp).await {
            RequestOutcome::Completed | RequestOutcome::Json(_) => {
                tracing::info!(endpoint = %endpoint, state_timestamp, "Sync acknowledged");
                true
            }
            RequestOutcome::NotFound => {
                tracing::info!(
                    endpoint = %endpoint,
                    state_timestamp,
                    "Control plane no longer tracks this state; acknowledgment accepted"
                );
                true
            }
            RequestOutcome::Exhausted { attempts } => {
                tracing::error!(
                    endpoint = %endpoint,
                    state_timestamp,
                    attempts,
                    "Acknowledgment not delivered; change will be re-sent"
                );
                false
            }
            RequestOutcome::Fatal(e) => {
                tracing::error!(endpoint = %endpoint, state_timestamp, error = %e, "Acknowledgment request failed");
                false
            }
        }
    }
}
