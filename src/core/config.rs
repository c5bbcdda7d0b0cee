use crate::core::error::{AdeError, AdeResult, ConfigError, ResultExt};
use crate::site::environment::{DEFAULT_ROOT, parse_toolchain_version};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for dls-ade
/// Searched in order: ade.toml, .ade.toml, .config/ade.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdeConfig {
  #[serde(default)]
  pub environment: EnvironmentConfig,
  #[serde(default)]
  pub vcs: VcsConfig,
  #[serde(default)]
  pub build: BuildConfig,
}

/// Site environment defaults, overridden by `-e`/`-r`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
  /// EPICS version (default: from DLS_EPICS_RELEASE / EPICS_RELEASE)
  #[serde(default)]
  pub epics: Option<String>,

  /// RHEL major version (default: probed from /etc/os-release)
  #[serde(default)]
  pub rhel: Option<String>,

  /// Root of the work/prod hierarchy
  #[serde(default = "default_root")]
  pub root: PathBuf,
}

fn default_root() -> PathBuf {
  PathBuf::from(DEFAULT_ROOT)
}

impl Default for EnvironmentConfig {
  fn default() -> Self {
    Self {
      epics: None,
      rhel: None,
      root: default_root(),
    }
  }
}

/// Where module repositories live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcsConfig {
  /// Git server URL, or a local directory of bare repositories
  #[serde(default = "default_server")]
  pub server: String,

  /// Group under the server holding the area groups
  #[serde(default = "default_root_dir")]
  pub root_dir: String,
}

fn default_server() -> String {
  "ssh://git@gitlab.diamond.ac.uk".to_string()
}

fn default_root_dir() -> String {
  "controls".to_string()
}

impl Default for VcsConfig {
  fn default() -> Self {
    Self {
      server: default_server(),
      root_dir: default_root_dir(),
    }
  }
}

/// Build server submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Directory the build server polls for requests
  #[serde(default = "default_queue")]
  pub queue: PathBuf,
}

fn default_queue() -> PathBuf {
  Path::new(DEFAULT_ROOT).join("work/etc/build/queue")
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self { queue: default_queue() }
  }
}

impl AdeConfig {
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("ade.toml"),
      path.join(".ade.toml"),
      path.join(".config").join("ade.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load the config found under `path`, defaults when there is none
  pub fn load_or_default(path: &Path) -> AdeResult<Self> {
    match Self::find_config_path(path) {
      Some(config_path) => Self::load(&config_path),
      None => Ok(Self::default()),
    }
  }

  pub fn load(config_path: &Path) -> AdeResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: AdeConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  pub fn validate(&self) -> AdeResult<()> {
    if let Some(ref epics) = self.environment.epics
      && parse_toolchain_version(epics).is_err()
    {
      return Err(AdeError::Config(ConfigError::InvalidValue {
        field: "environment.epics".to_string(),
        value: epics.clone(),
      }));
    }

    if self.vcs.server.trim().is_empty() {
      return Err(AdeError::Config(ConfigError::MissingField {
        field: "vcs.server".to_string(),
      }));
    }

    Ok(())
  }
}
