//! One-shot command execution.
//!
//! # Responsibilities
//! - Resolve the control plane domain
//! - Build the orchestrator and run the requested command once
//! - Turn every ending into a logged exit code; nothing escapes as a panic

use std::process::ExitCode;
use std::sync::Arc;

use crate::config::{resolve_domain, AgentConfig};
use crate::control_plane::client::endpoint_url;
use crate::lifecycle::signals;
use crate::service::ServiceManager;
use crate::sync::{CycleOutcome, SyncOrchestrator};

/// Exit code used when the operator interrupts a run.
const EXIT_INTERRUPTED: u8 = 130;

/// What a single invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run one full sync cycle.
    Sync,
    /// Fetch and print the configuration that would be applied.
    Render,
    /// Validate configuration and domain, then exit.
    CheckConfig,
}

/// Run `command` once against `config`.
pub async fn run(
    command: Command,
    config: &AgentConfig,
    domain_override: Option<&str>,
    manager: Arc<dyn ServiceManager>,
) -> ExitCode {
    let domain = match resolve_domain(config, domain_override) {
        Ok(domain) => domain,
        Err(e) => {
            tracing::error!(error = %e, "Cannot determine control plane domain");
            return ExitCode::FAILURE;
        }
    };

    if command == Command::CheckConfig {
        return match endpoint_url(&config.control_plane, &domain) {
            Ok(endpoint) => {
                tracing::info!(endpoint = %endpoint, "Configuration OK");
                println!("configuration OK, endpoint {endpoint}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Configuration invalid");
                ExitCode::FAILURE
            }
        };
    }

    let orchestrator = match SyncOrchestrator::new(config, &domain, manager) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize sync");
            return ExitCode::FAILURE;
        }
    };

    let work = async {
        match command {
            Command::Render => render(&orchestrator).await,
            _ => sync(&orchestrator).await,
        }
    };

    tokio::select! {
        code = work => code,
        _ = signals::interrupted() => {
            tracing::warn!("Interrupted, stopping");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

async fn sync(orchestrator: &SyncOrchestrator) -> ExitCode {
    match orchestrator.run_cycle().await {
        Ok(outcome) => {
            tracing::info!(outcome = outcome.label(), "Sync cycle complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Sync cycle aborted; configuration may be out of sync");
            ExitCode::FAILURE
        }
    }
}

async fn render(orchestrator: &SyncOrchestrator) -> ExitCode {
    match orchestrator.preview().await {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(CycleOutcome::UpToDate) => {
            tracing::info!("No sync required, nothing to render");
            ExitCode::SUCCESS
        }
        Err(outcome) => {
            tracing::warn!(outcome = outcome.label(), "Nothing rendered");
            ExitCode::SUCCESS
        }
    }
}
