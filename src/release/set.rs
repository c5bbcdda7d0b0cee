//! The releases of one module

use super::version::{increment, normalize};
use crate::core::error::ReleaseError;
use crate::utils::normalize_path;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Release number of a tag, the last segment when the tag looks like a path
pub fn release_number(tag: &str) -> String {
  normalize_path(Path::new(tag))
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| tag.to_string())
}

/// Sort items by the release number of their tag, oldest first.
///
/// Ties on the version key fall back to the tag string so the order is
/// deterministic.
pub fn sort_by_release<T, F>(mut items: Vec<T>, tag_of: F) -> Vec<T>
where
  F: Fn(&T) -> &str,
{
  items.sort_by_cached_key(|item| {
    let tag = tag_of(item);
    (normalize(&release_number(tag)), tag.to_string())
  });
  items
}

/// Distinct tags of one module, fetched fresh for each release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseSet {
  tags: HashSet<String>,
}

impl ReleaseSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns false if the tag was already present
  pub fn insert(&mut self, tag: impl Into<String>) -> bool {
    self.tags.insert(tag.into())
  }

  pub fn contains(&self, tag: &str) -> bool {
    self.tags.contains(tag)
  }

  pub fn len(&self) -> usize {
    self.tags.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tags.is_empty()
  }

  /// Tags in no particular order
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.tags.iter().map(String::as_str)
  }

  /// Tags from oldest to newest release
  pub fn sorted(&self) -> Vec<&str> {
    let sorted = sort_by_release(self.iter().collect(), |tag| *tag);
    debug!(releases = ?sorted, "sorted releases");
    sorted
  }

  /// Release number of the newest tag
  pub fn latest(&self) -> Option<String> {
    self
      .tags
      .iter()
      .max_by_key(|tag| (normalize(&release_number(tag)), (*tag).clone()))
      .map(|tag| release_number(tag))
  }

  /// Release that follows the newest one: `0-1` for a module never released
  pub fn next_version(&self) -> Result<String, ReleaseError> {
    match self.latest() {
      Some(latest) => increment(&latest),
      None => Ok("0-1".to_string()),
    }
  }
}

impl<S: Into<String>> FromIterator<S> for ReleaseSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self {
      tags: iter.into_iter().map(Into::into).collect(),
    }
  }
}

impl<S: Into<String>> Extend<S> for ReleaseSet {
  fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
    self.tags.extend(iter.into_iter().map(Into::into));
  }
}
