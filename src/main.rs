//! Gateway sync agent (v1)
//!
//! Keeps the local stream proxy configuration in step with the control plane.
//! Each invocation runs exactly one cycle; a systemd timer or cron entry
//! provides the schedule.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌────────────────────────────────────────────────────────┐
//!                 │                      GATE SYNCER                        │
//!                 │                                                         │
//!  Control plane  │  ┌──────────────┐   ┌──────────┐   ┌────────────────┐   │
//!  GET /sync-  ───┼─▶│control_plane │──▶│  sync    │──▶│ proxy_config   │───┼──▶ proxies.conf
//!  gateway        │  │ + resilience │   │ payload  │   │ render + apply │   │
//!                 │  └──────────────┘   └──────────┘   └───────┬────────┘   │
//!                 │         ▲                                  ▼            │
//!  POST /sync- ◀──┼─────────┘ (only if healthy)         ┌────────────────┐  │
//!  gateway        │                                     │    service     │──┼──▶ systemctl
//!                 │                                     │restart + verify│  │
//!                 │                                     └────────────────┘  │
//!                 │  ┌───────────────────────────────────────────────────┐  │
//!                 │  │  config · observability · lifecycle               │  │
//!                 │  └───────────────────────────────────────────────────┘  │
//!                 └────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use gate_syncer::config::{load_or_default, ObservabilityConfig};
use gate_syncer::lifecycle::{self, Command};
use gate_syncer::observability::{logging, metrics};
use gate_syncer::service::Systemctl;

#[derive(Parser)]
#[command(name = "gate-syncer")]
#[command(about = "Sync the gateway's stream proxy configuration with the control plane", long_about = None)]
struct Cli {
    /// Configuration file (defaults to /etc/gate-syncer/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Control plane domain, overrides the configuration
    #[arg(short, long)]
    domain: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sync cycle (default)
    Sync,
    /// Fetch and print the configuration without applying it
    Render,
    /// Validate configuration and exit
    CheckConfig,
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Sync => Command::Sync,
            Commands::Render => Command::Render,
            Commands::CheckConfig => Command::CheckConfig,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability);
    let metrics_handle = metrics::init_metrics();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gate-syncer starting");

    let command = cli.command.map(Command::from).unwrap_or(Command::Sync);
    let manager = Arc::new(Systemctl::new(config.service.systemctl_path.clone()));
    let code = lifecycle::run(command, &config, cli.domain.as_deref(), manager).await;

    if let (Some(handle), Some(path)) = (&metrics_handle, &config.observability.metrics_textfile) {
        if let Err(e) = metrics::write_textfile(handle, path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write metrics textfile");
        }
    }

    tracing::info!("Finished");
    code
}
