//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, fall back to defaults)
//!     → validation.rs (semantic checks)
//!     → AgentConfig (validated, immutable)
//!     → passed by reference into each component at construction
//!
//! proxy domain:
//!     --domain flag → control_plane.domain → control_plane.domain_file
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; one invocation runs one cycle
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, resolve_domain, ConfigError};
pub use schema::AgentConfig;
pub use schema::ControlPlaneConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProxyFileConfig;
pub use schema::ServiceConfig;
