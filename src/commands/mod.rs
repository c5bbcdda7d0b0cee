//! CLI commands for dls-ade
//!
//! - **release**: tag a module release and queue it for the build server
//! - **list_releases**: releases installed in prod or tagged in git
//! - **classify**: module, area and version of a directory
//! - **env**: resolved EPICS/RHEL environment and area paths
//!
//! All commands accept `&AdeContext` so config and environment are resolved
//! once.

pub mod classify;
pub mod env;
pub mod list_releases;
pub mod release;

pub use classify::run_classify;
pub use env::run_env;
pub use list_releases::{ListReleasesArgs, run_list_releases};
pub use release::{ReleaseArgs, run_release};
