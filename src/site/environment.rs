//! EPICS/RHEL environment of the site
//!
//! An [`Environment`] pins the EPICS base version, the RHEL major version and
//! the site root that every area path is derived from. It is built once at
//! the start of a workflow and passed by reference from then on. Looking at
//! a different EPICS generation means building a new value with
//! [`Environment::with_toolchain`].

use crate::core::error::{AdeResult, SiteError};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// EPICS version used when neither the command line nor the shell sets one
pub const DEFAULT_EPICS: &str = "R3.14.12.3";

/// RHEL major version used when the OS cannot be probed
pub const DEFAULT_RHEL: &str = "6";

/// Root of the work/prod hierarchy
pub const DEFAULT_ROOT: &str = "/dls_sw";

/// Environment variables holding the EPICS version, in priority order
pub const EPICS_ENV_VARS: [&str; 2] = ["DLS_EPICS_RELEASE", "EPICS_RELEASE"];

const OS_RELEASE: &str = "/etc/os-release";

static TOOLCHAIN_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^R\d(\.\d+)*(_64)?$").expect("toolchain pattern is valid"));

/// Validate an explicitly supplied EPICS version.
///
/// A missing leading `R` is added, so `3.14.12.3` is accepted as
/// `R3.14.12.3`.
pub fn parse_toolchain_version(value: &str) -> Result<String, SiteError> {
  let candidate = if value.starts_with('R') {
    value.to_string()
  } else {
    format!("R{}", value)
  };

  if TOOLCHAIN_RE.is_match(&candidate) {
    Ok(candidate)
  } else {
    Err(SiteError::MalformedToolchainVersion {
      value: value.to_string(),
    })
  }
}

/// Validate an explicitly supplied RHEL major version, e.g. `7`
pub fn parse_rhel_version(value: &str) -> Result<String, SiteError> {
  if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
    Ok(value.to_string())
  } else {
    Err(SiteError::MalformedRhelVersion {
      value: value.to_string(),
    })
  }
}

/// Resolved site environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
  epics: String,
  rhel: String,
  root: PathBuf,
}

impl Environment {
  /// Build an environment from explicit versions.
  pub fn new(epics: &str, rhel: &str) -> AdeResult<Self> {
    Ok(Self {
      epics: parse_toolchain_version(epics)?,
      rhel: parse_rhel_version(rhel)?,
      root: PathBuf::from(DEFAULT_ROOT),
    })
  }

  /// Build an environment, falling back to the shell and OS for anything
  /// not given explicitly.
  pub fn resolve(epics: Option<&str>, rhel: Option<&str>) -> AdeResult<Self> {
    let epics = match epics {
      Some(epics) => parse_toolchain_version(epics)?,
      None => epics_from_env(),
    };
    let rhel = match rhel {
      Some(rhel) => parse_rhel_version(rhel)?,
      None => probe_rhel(),
    };

    debug!(epics = %epics, rhel = %rhel, "resolved environment");
    Ok(Self {
      epics,
      rhel,
      root: PathBuf::from(DEFAULT_ROOT),
    })
  }

  /// Move the work/prod hierarchy to a different root
  pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.root = root.into();
    self
  }

  /// Same site and RHEL version, different EPICS generation
  pub fn with_toolchain(&self, epics: &str) -> AdeResult<Self> {
    Ok(Self {
      epics: parse_toolchain_version(epics)?,
      rhel: self.rhel.clone(),
      root: self.root.clone(),
    })
  }

  /// EPICS version, possibly with a `_64` suffix
  pub fn epics_version(&self) -> &str {
    &self.epics
  }

  /// EPICS version as used in directory names (no `_64` suffix)
  pub fn epics_version_dir(&self) -> &str {
    self.epics.split('_').next().unwrap_or(&self.epics)
  }

  pub fn rhel_version(&self) -> &str {
    &self.rhel
  }

  /// Distribution directory, e.g. `RHEL7-x86_64`
  pub fn rhel_dir(&self) -> String {
    format!("RHEL{}-x86_64", self.rhel)
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Root of the EPICS base installation.
  ///
  /// Releases before R3.14 lived under `/home/epics`.
  pub fn epics_dir(&self) -> PathBuf {
    let version = self.epics_version_dir();
    if version < "R3.14" {
      Path::new("/home").join("epics").join(version)
    } else {
      self.root.join("epics").join(version)
    }
  }
}

fn epics_from_env() -> String {
  let from_env = EPICS_ENV_VARS.iter().find_map(|var| std::env::var(var).ok());

  match from_env {
    Some(value) => match parse_toolchain_version(&value) {
      Ok(epics) => epics,
      Err(_) => {
        warn!(value = %value, default = DEFAULT_EPICS, "ignoring malformed EPICS version from environment");
        DEFAULT_EPICS.to_string()
      }
    },
    None => DEFAULT_EPICS.to_string(),
  }
}

fn probe_rhel() -> String {
  std::fs::read_to_string(OS_RELEASE)
    .ok()
    .and_then(|contents| rhel_from_os_release(&contents))
    .unwrap_or_else(|| DEFAULT_RHEL.to_string())
}

/// Major version from the `VERSION_ID` line of an os-release file
pub fn rhel_from_os_release(contents: &str) -> Option<String> {
  contents
    .lines()
    .find_map(|line| line.strip_prefix("VERSION_ID="))
    .map(|value| value.trim().trim_matches('"'))
    .and_then(|value| value.split('.').next())
    .and_then(|major| parse_rhel_version(major).ok())
}
