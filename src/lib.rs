//! dls-ade: release versioning and path classification for the DLS
//! work/prod software hierarchy.
//!
//! - **site**: EPICS/RHEL environment, area table, path classification
//! - **release**: tag ordering, release sets, the release decision
//! - **core**: errors, config, git and build server adapters
//! - **commands**: the `dls-ade` subcommands

pub mod commands;
pub mod core;
pub mod release;
pub mod site;
pub mod utils;
