//! Core plumbing for dls-ade operations
//!
//! - **build**: build server submission (queue directory)
//! - **config**: dls-ade configuration (ade.toml) parsing and validation
//! - **context**: run context shared by every command
//! - **error**: error types with contextual help messages
//! - **telemetry**: tracing subscriber setup
//! - **vcs**: module repository access (SystemGit)

pub mod build;
pub mod config;
pub mod context;
pub mod error;
pub mod telemetry;
pub mod vcs;
