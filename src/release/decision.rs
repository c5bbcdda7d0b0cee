//! What gets released, and whether a tag has to be made first
//!
//! The four request shapes are:
//!
//! - next version: take the newest release, bump it, tag `HEAD`
//! - commit only: build the commit as a test, no tag
//! - release only: rebuild a tag that must already exist
//! - release and commit: create the tag at the commit, then build it
//!
//! Deciding never has side effects. When [`ReleaseDecision::commit_to_tag`]
//! is set, the caller creates the tag before submitting any build.

use super::set::ReleaseSet;
use super::tag_name::{TagValidator, normalize_release};
use crate::core::error::ReleaseError;
use crate::site::Area;
use serde::Serialize;
use tracing::info;

/// Commit tagged when the next version is requested
pub const NEXT_VERSION_COMMIT: &str = "HEAD";

/// Shape of a release request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseRequest {
  NextVersionRequested,
  NoReleaseRequested { commit: String },
  ExplicitReleaseExisting { release: String },
  ExplicitReleaseWithCommit { release: String, commit: String },
}

impl ReleaseRequest {
  /// Classify command-line options. Asking for the next version wins over
  /// everything else.
  pub fn from_options(
    release: Option<&str>,
    commit: Option<&str>,
    next_version: bool,
  ) -> Result<Self, ReleaseError> {
    if next_version {
      return Ok(ReleaseRequest::NextVersionRequested);
    }

    match (release, commit) {
      (None, Some(commit)) => Ok(ReleaseRequest::NoReleaseRequested {
        commit: commit.to_string(),
      }),
      (Some(release), None) => Ok(ReleaseRequest::ExplicitReleaseExisting {
        release: release.to_string(),
      }),
      (Some(release), Some(commit)) => Ok(ReleaseRequest::ExplicitReleaseWithCommit {
        release: release.to_string(),
        commit: commit.to_string(),
      }),
      (None, None) => Err(ReleaseError::MissingRelease),
    }
  }
}

/// The version to release, and the commit to tag with it if the tag is new
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseDecision {
  pub version: String,
  pub commit_to_tag: Option<String>,
}

impl ReleaseDecision {
  pub fn requires_tag(&self) -> bool {
    self.commit_to_tag.is_some()
  }
}

/// Decide the version to release for `request` given the module's existing
/// releases.
pub fn determine_version_to_release(
  request: &ReleaseRequest,
  area: Area,
  releases: &ReleaseSet,
  validator: &impl TagValidator,
) -> Result<ReleaseDecision, ReleaseError> {
  let decision = match request {
    ReleaseRequest::NextVersionRequested => ReleaseDecision {
      version: releases.next_version()?,
      commit_to_tag: Some(NEXT_VERSION_COMMIT.to_string()),
    },
    ReleaseRequest::NoReleaseRequested { commit } => ReleaseDecision {
      version: commit.clone(),
      commit_to_tag: None,
    },
    ReleaseRequest::ExplicitReleaseExisting { release } => {
      if !releases.contains(release) {
        return Err(ReleaseError::NotFound {
          release: release.clone(),
        });
      }
      info!(release = %release, "releasing from existing tag");
      ReleaseDecision {
        version: release.clone(),
        commit_to_tag: None,
      }
    }
    ReleaseRequest::ExplicitReleaseWithCommit { release, commit } => {
      if releases.contains(release) {
        return Err(ReleaseError::AlreadyExists {
          release: release.clone(),
        });
      }
      let version = normalize_release(release, area, validator)?;
      if releases.contains(&version) {
        return Err(ReleaseError::AlreadyExists { release: version });
      }
      ReleaseDecision {
        version,
        commit_to_tag: Some(commit.clone()),
      }
    }
  };

  info!(version = %decision.version, commit_to_tag = ?decision.commit_to_tag, "release decided");
  Ok(decision)
}
