//! Version control access for module repositories
//!
//! The release workflow only needs three capabilities from a backend: the
//! module's tags, tag creation, and reading a file at a revision. Cloning
//! and pushing are backend details.

pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::AdeResult;
use crate::release::ReleaseSet;
use std::collections::BTreeSet;
use std::path::Path;

/// A module repository the release workflow can read and tag
pub trait Vcs {
  /// Module the repository holds
  fn module(&self) -> &str;

  /// Where the module was fetched from, passed on to the build server
  fn source_repo(&self) -> &str;

  /// Every tag in the repository
  fn list_tags(&self) -> AdeResult<BTreeSet<String>>;

  /// Create an annotated tag at `commit` and publish it
  fn create_tag(&self, name: &str, commit: &str, message: &str) -> AdeResult<()>;

  /// Whether `reference` names a commit
  fn commit_exists(&self, reference: &str) -> AdeResult<bool>;

  /// Contents of `path` at `reference`, `None` if the file is not there.
  ///
  /// A reference that names no commit is an error.
  fn read_file(&self, reference: &str, path: &Path) -> AdeResult<Option<Vec<u8>>>;

  /// Tags as a release set
  fn releases(&self) -> AdeResult<ReleaseSet> {
    Ok(self.list_tags()?.into_iter().collect())
  }
}
