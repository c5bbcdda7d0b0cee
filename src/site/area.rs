//! Area table: where each kind of module lives in work and prod

use super::environment::Environment;
use crate::core::error::SiteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A category of module with its own directory and tag conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
  Support,
  Ioc,
  Matlab,
  Python,
  Python3,
  Python3Ext,
  Etc,
  Tools,
  Epics,
}

impl Area {
  /// Every area, in the order paths are matched against them
  pub const ALL: [Area; 9] = [
    Area::Support,
    Area::Ioc,
    Area::Matlab,
    Area::Python,
    Area::Python3,
    Area::Python3Ext,
    Area::Etc,
    Area::Tools,
    Area::Epics,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Area::Support => "support",
      Area::Ioc => "ioc",
      Area::Matlab => "matlab",
      Area::Python => "python",
      Area::Python3 => "python3",
      Area::Python3Ext => "python3ext",
      Area::Etc => "etc",
      Area::Tools => "tools",
      Area::Epics => "epics",
    }
  }

  /// Development (work) directory for this area
  pub fn dev_path(self, env: &Environment) -> PathBuf {
    self.stage_path(env, "work")
  }

  /// Production directory for this area.
  ///
  /// Same layout as the work area under `prod`, except EPICS base which is
  /// installed straight under the site root.
  pub fn prod_path(self, env: &Environment) -> PathBuf {
    match self {
      Area::Epics => env.root().join("epics"),
      _ => self.stage_path(env, "prod"),
    }
  }

  fn stage_path(self, env: &Environment, stage: &str) -> PathBuf {
    let base = env.root().join(stage);
    match self {
      Area::Support | Area::Ioc => base.join(env.epics_version_dir()).join(self.as_str()),
      Area::Epics | Area::Etc => base.join(self.as_str()),
      Area::Tools => base.join("tools").join(env.rhel_dir()),
      // python3ext shares the python3 tree
      Area::Python3 | Area::Python3Ext => base.join("python3").join(env.rhel_dir()),
      Area::Python => base.join("common").join("python").join(env.rhel_dir()),
      Area::Matlab => base.join("common").join("matlab"),
    }
  }

  /// Modules in this area may sit one directory deeper (IOCs under a
  /// beamline, tools and python packages under a group).
  pub fn allows_nested_modules(self) -> bool {
    matches!(self, Area::Ioc | Area::Tools | Area::Python)
  }

  /// Installs of this area end in a `prefix` directory
  pub fn has_install_prefix(self) -> bool {
    matches!(self, Area::Python | Area::Tools)
  }

  /// Whether modules of this area are released from git.
  /// python3ext releases carry no source.
  pub fn uses_git(self) -> bool {
    !matches!(self, Area::Python3Ext)
  }

  /// Whether a release in this area is built against a specific EPICS base
  pub fn is_epics_module(self) -> bool {
    matches!(self, Area::Support | Area::Ioc)
  }
}

impl fmt::Display for Area {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Area {
  type Err = SiteError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Area::ALL
      .iter()
      .copied()
      .find(|area| area.as_str() == s)
      .ok_or_else(|| SiteError::UnsupportedArea { name: s.to_string() })
  }
}
