//! Path classification: which area, lifecycle stage, module and version a
//! directory belongs to.
//!
//! Areas do not share a layout. Support modules sit directly under the area
//! root, IOCs under a beamline directory, tools and python packages under a
//! group and end in a `prefix` install directory. Paths from another EPICS
//! generation are recognised by the version embedded in them.

use super::area::Area;
use super::environment::Environment;
use super::manifest;
use crate::core::error::{AdeResult, SiteError};
use crate::utils::{normalize_path, path_segments};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static EMBEDDED_TOOLCHAIN_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"R\d(\.\d+)+").expect("embedded toolchain pattern is valid"));

/// Version reported for a module checked out in the work area
pub const WORK_VERSION: &str = "work";

/// Version reported when a path cannot be a module or a release
pub const INVALID_VERSION: &str = "invalid";

/// Lifecycle stage of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
  Work,
  Prod,
  Invalid,
}

impl Domain {
  pub fn as_str(self) -> &'static str {
    match self {
      Domain::Work => "work",
      Domain::Prod => "prod",
      Domain::Invalid => "invalid",
    }
  }
}

impl fmt::Display for Domain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Area and stage a path falls under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaClassification {
  /// `None` when the path is outside every area
  pub area: Option<Area>,
  pub domain: Domain,
  /// EPICS version whose area roots matched
  pub toolchain: String,
}

/// Where a path sits in the release hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleLocation {
  pub module: Option<String>,
  pub area: Option<Area>,
  pub domain: Domain,
  /// Release number, `work`, or `invalid`
  pub version: String,
  pub toolchain: String,
}

/// Find the area and stage `path` belongs to.
///
/// Falls back to the EPICS version embedded in the path when the path does
/// not match any area under `env`.
pub fn classify_area(path: &Path, env: &Environment) -> AdeResult<AreaClassification> {
  let path = normalize_path(path);

  for area in Area::ALL {
    if path.starts_with(area.dev_path(env)) {
      return Ok(AreaClassification {
        area: Some(area),
        domain: Domain::Work,
        toolchain: env.epics_version().to_string(),
      });
    }
    if path.starts_with(area.prod_path(env)) {
      return Ok(AreaClassification {
        area: Some(area),
        domain: Domain::Prod,
        toolchain: env.epics_version().to_string(),
      });
    }
  }

  let path_str = path.to_string_lossy();
  if let Some(found) = EMBEDDED_TOOLCHAIN_RE.find(&path_str)
    && found.as_str() != env.epics_version()
  {
    debug!(path = %path.display(), toolchain = found.as_str(), "retrying with embedded EPICS version");
    return classify_area(&path, &env.with_toolchain(found.as_str())?);
  }

  Ok(AreaClassification {
    area: None,
    domain: Domain::Invalid,
    toolchain: env.epics_version().to_string(),
  })
}

/// Work out module name and version for a path.
///
/// A `module.ini` manifest under the path names the module outright;
/// otherwise the name comes from the path layout of the area.
pub fn classify_path(path: &Path, env: &Environment) -> AdeResult<ModuleLocation> {
  let path = normalize_path(path);
  let classification = classify_area(&path, env)?;

  let env = if classification.toolchain != env.epics_version() {
    env.with_toolchain(&classification.toolchain)?
  } else {
    env.clone()
  };

  let mut module = manifest::module_name_override(&path)?;

  let root = match (classification.area, classification.domain) {
    (Some(area), Domain::Work) => area.dev_path(&env),
    (Some(area), Domain::Prod) => area.prod_path(&env),
    _ => PathBuf::new(),
  };
  let remainder = path
    .strip_prefix(&root)
    .map_err(|_| SiteError::PathClassificationInconsistency {
      path: path.clone(),
      root: root.clone(),
    })?;
  let mut segments = path_segments(remainder);

  if let Some(area) = classification.area
    && area.has_install_prefix()
    && segments.last().map(String::as_str) == Some("prefix")
  {
    segments.pop();
  }

  let nested = classification.area.is_some_and(Area::allows_nested_modules);
  let version = match classification.domain {
    Domain::Work => {
      if segments.len() == 1 || (nested && segments.len() == 2) {
        WORK_VERSION.to_string()
      } else {
        INVALID_VERSION.to_string()
      }
    }
    Domain::Prod => {
      if segments.len() == 2 || (nested && segments.len() == 3) {
        let (version, rest) = segments.split_last().map(|(v, rest)| (v.clone(), rest)).unwrap_or_default();
        if module.is_none() {
          module = if classification.area.is_some_and(Area::has_install_prefix) {
            rest.last().cloned()
          } else {
            Some(rest.join("/"))
          };
        }
        version
      } else {
        segments.pop();
        INVALID_VERSION.to_string()
      }
    }
    Domain::Invalid => INVALID_VERSION.to_string(),
  };

  if module.is_none() {
    module = if classification.area == Some(Area::Ioc) {
      let start = segments.len().saturating_sub(2);
      Some(segments[start..].join("/")).filter(|joined| !joined.is_empty())
    } else {
      segments.last().cloned()
    };
  }

  let location = ModuleLocation {
    module,
    area: classification.area,
    domain: classification.domain,
    version,
    toolchain: classification.toolchain,
  };
  debug!(path = %path.display(), ?location, "classified path");
  Ok(location)
}
