//! Path helpers shared by classification, tag sorting and the git backend

use std::path::{Component, Path, PathBuf};

/// Lexically normalise a path: drop `.` and trailing separators, fold `..`
/// into its parent. Does not touch the filesystem, so symlinks are not
/// resolved.
pub fn normalize_path(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();

  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        let at_root = matches!(
          normalized.components().next_back(),
          None | Some(Component::RootDir) | Some(Component::Prefix(_)) | Some(Component::ParentDir)
        );
        if at_root && !normalized.has_root() {
          normalized.push("..");
        } else if !at_root {
          normalized.pop();
        }
      }
      other => normalized.push(other.as_os_str()),
    }
  }

  normalized
}

/// Plain directory names of a path, in order
pub fn path_segments(path: &Path) -> Vec<String> {
  path
    .components()
    .filter_map(|component| match component {
      Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
      _ => None,
    })
    .collect()
}

/// Check if a git server location is a local filesystem path (not a remote URL)
///
/// Returns false for SSH URLs (`git@host:group/repo.git`) and anything with
/// a scheme (`ssh://`, `https://`).
pub fn is_local_path(path: &str) -> bool {
  if path.is_empty() || path.contains("://") {
    return false;
  }

  if path.starts_with("./") || path.starts_with("../") || path.starts_with('/') {
    return !path.contains('@');
  }

  // scp-like syntax: user@host:path
  if path.contains('@') {
    return false;
  }

  Path::new(path).is_absolute()
}

/// Convert a path to Git format (always forward slashes)
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}
