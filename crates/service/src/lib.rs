//! HTTP service layer for the Berth NAS console.
//!
//! This crate wires the core subsystems from `berth-common` into an axum
//! application:
//! - Config + State (built once at startup, cloned into handlers)
//! - Identity verification (bearer credentials, consumed as a capability)
//! - The filesystem request surface (list/read/stat/hash/download/preview/
//!   stream/sign and the token-gated signed variants)
//! - Tool catalog and speed-test endpoints
//! - Health endpoints under `/_status`

pub mod auth;
pub mod config;
pub mod http;
pub mod state;
pub mod tools;

// Re-export key types for convenience
pub use auth::{Identity, IdentityVerifier, JwtIdentityVerifier};
pub use config::Config;
pub use state::{State as ServiceState, StateSetupError};
pub use tools::{ToolCatalog, ToolRecord};
