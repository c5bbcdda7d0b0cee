//! Unified run context - build once, pass everywhere
//!
//! ```text
//! main.rs:
//!   AdeContext::build() -> &AdeContext
//!   |
//!   v
//! commands/release.rs, classify.rs, etc:
//!   fn run(ctx: &AdeContext, ...)
//! ```

use crate::core::config::AdeConfig;
use crate::core::error::AdeResult;
use crate::site::Environment;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Overrides given on the command line
#[derive(Debug, Clone, Default)]
pub struct EnvironmentOverrides {
  pub epics: Option<String>,
  pub rhel: Option<String>,
}

/// Everything a command needs about the site, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AdeContext {
  /// Directory the config was searched from
  pub root: PathBuf,

  /// dls-ade configuration (ade.toml, or defaults)
  pub config: Arc<AdeConfig>,

  /// Resolved EPICS/RHEL environment
  pub env: Environment,

  /// True when the EPICS version was given with `-e`
  pub epics_from_cli: bool,
}

impl AdeContext {
  /// Load config under `root` and resolve the environment.
  ///
  /// Command line beats config file; config file beats the shell and the OS
  /// probe.
  pub fn build(root: &Path, overrides: &EnvironmentOverrides) -> AdeResult<Self> {
    let config = AdeConfig::load_or_default(root)?;
    Self::from_config(root, config, overrides)
  }

  pub fn from_config(root: &Path, config: AdeConfig, overrides: &EnvironmentOverrides) -> AdeResult<Self> {
    let epics = overrides.epics.as_deref().or(config.environment.epics.as_deref());
    let rhel = overrides.rhel.as_deref().or(config.environment.rhel.as_deref());
    let env = Environment::resolve(epics, rhel)?.with_root(&config.environment.root);

    debug!(
      epics = env.epics_version(),
      rhel = env.rhel_version(),
      root = %env.root().display(),
      "built context"
    );

    Ok(Self {
      root: root.to_path_buf(),
      config: Arc::new(config),
      env,
      epics_from_cli: overrides.epics.is_some(),
    })
  }
}
