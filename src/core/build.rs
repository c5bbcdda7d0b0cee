//! Build server submission
//!
//! The build server polls a queue directory for JSON build requests. A
//! request is written under a temporary name and renamed into place so the
//! server never sees a partial file.

use crate::core::error::{AdeError, AdeResult, BuildError, ResultExt};
use crate::site::{Area, Environment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// One build request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildJob {
  pub module: String,
  pub area: Area,
  /// Tag to build, or a commit for test builds
  pub version: String,
  /// Repository the build server fetches from
  pub source: String,
  pub epics: String,
  /// e.g. `RHEL7-x86_64`
  pub build_os: String,
  pub test_only: bool,
  pub force: bool,
  pub user: String,
  pub submitted_at: DateTime<Utc>,
}

impl BuildJob {
  pub fn new(module: &str, area: Area, version: &str, source: &str, env: &Environment) -> Self {
    Self {
      module: module.to_string(),
      area,
      version: version.to_string(),
      source: source.to_string(),
      epics: env.epics_version().to_string(),
      build_os: env.rhel_dir(),
      test_only: false,
      force: false,
      user: current_user(),
      submitted_at: Utc::now(),
    }
  }

  pub fn test_only(mut self, test_only: bool) -> Self {
    self.test_only = test_only;
    self
  }

  pub fn force(mut self, force: bool) -> Self {
    self.force = force;
    self
  }

  /// Queue file name: `<timestamp>_<user>_<module>_<version>.json`
  pub fn file_name(&self) -> String {
    let sanitize = |value: &str| value.replace(['/', ' '], "_");
    format!(
      "{}_{}_{}_{}.json",
      self.submitted_at.format("%Y%m%d-%H%M%S"),
      sanitize(&self.user),
      sanitize(&self.module),
      sanitize(&self.version)
    )
  }
}

fn current_user() -> String {
  ["USER", "LOGNAME"]
    .iter()
    .find_map(|var| std::env::var(var).ok().filter(|user| !user.is_empty()))
    .unwrap_or_else(|| "unknown".to_string())
}

/// Accepts build jobs
pub trait BuildServer {
  /// Submit a job, returning its id
  fn submit(&self, job: &BuildJob) -> AdeResult<String>;
}

/// Build server fed through a queue directory
#[derive(Debug, Clone)]
pub struct QueueBuildServer {
  queue: PathBuf,
}

impl QueueBuildServer {
  pub fn new(queue: impl Into<PathBuf>) -> Self {
    Self { queue: queue.into() }
  }
}

impl BuildServer for QueueBuildServer {
  fn submit(&self, job: &BuildJob) -> AdeResult<String> {
    if !self.queue.is_dir() {
      return Err(AdeError::Build(BuildError::QueueMissing {
        path: self.queue.clone(),
      }));
    }

    let name = job.file_name();
    let content = serde_json::to_string_pretty(job).context("Failed to serialize build job")?;
    let staging = self.queue.join(format!(".{}.tmp", name));
    let target = self.queue.join(&name);

    fs::write(&staging, content)
      .and_then(|()| fs::rename(&staging, &target))
      .map_err(|err| {
        AdeError::Build(BuildError::SubmitFailed {
          job: name.clone(),
          reason: err.to_string(),
        })
      })?;

    info!(job = %name, queue = %self.queue.display(), "submitted build job");
    Ok(name)
  }
}
