//! Proxy configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Vec<ServerEndpoint>
//!     → render.rs (pure, deterministic text)
//!     → apply.rs (temp file → rename over live file → chown)
//!     → /etc/nginx/stream.d/proxies.conf
//! ```

pub mod apply;
pub mod render;

pub use apply::{ApplyError, ConfigApplier};
pub use render::render;
