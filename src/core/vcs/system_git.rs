//! System git backend
//!
//! Shells out to `git` with an isolated environment:
//! - user and system config cannot change behaviour beyond identity
//! - one subprocess per operation, nothing cached
//! - a clone lives in a directory owned by the caller

use super::Vcs;
use crate::core::error::{AdeError, AdeResult, GitError, ResultExt};
use crate::utils::{is_local_path, path_to_git_format};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Environment passed through to git
const PASSTHROUGH_ENV: [&str; 7] = [
  "PATH",
  "HOME",
  "SSH_AUTH_SOCK",
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
];

const ORIGIN: &str = "origin";

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,

  module: String,

  /// URL or path the module came from
  source: String,

  /// Remote new tags are pushed to
  remote: Option<String>,
}

impl SystemGit {
  /// Open an existing checkout of `module`.
  ///
  /// New tags are pushed to `origin` when the checkout has one.
  pub fn open(path: &Path, module: &str) -> AdeResult<Self> {
    let output = isolated_git()
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") || !path.exists() {
        return Err(AdeError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(AdeError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let work_tree = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    let mut git = Self {
      repo_path: path.to_path_buf(),
      source: work_tree.display().to_string(),
      module: module.to_string(),
      remote: None,
    };

    if let Some(url) = git.remote_url(ORIGIN)? {
      git.source = url;
      git.remote = Some(ORIGIN.to_string());
    }

    debug!(module, source = %git.source, "opened repository");
    Ok(git)
  }

  /// Clone `module` of `area` from the server into `dest`.
  ///
  /// Remote servers are addressed as `<server>/<root_dir>/<area>/<module>.git`.
  /// A server given as a local directory may hold bare repositories with or
  /// without the `.git` suffix.
  pub fn clone_module(server: &str, root_dir: &str, area: &str, module: &str, dest: &Path) -> AdeResult<Self> {
    let url = module_url(server, root_dir, area, module);
    info!(url = %url, dest = %dest.display(), "cloning module");

    let output = isolated_git()
      .args(["clone", "--quiet", "--no-checkout"])
      .arg(&url)
      .arg(dest)
      .output()
      .context("Failed to execute git clone")?;

    if !output.status.success() {
      return Err(AdeError::Git(GitError::CloneFailed {
        url,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Self::open(dest, module)
  }

  fn remote_url(&self, name: &str) -> AdeResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["remote", "get-url", name])
      .output()
      .context("Failed to read remote url")?;

    if !output.status.success() {
      return Ok(None);
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(Some(url).filter(|url| !url.is_empty()))
  }

  fn push_tag(&self, remote: &str, name: &str) -> AdeResult<()> {
    let output = self
      .git_cmd()
      .args(["push", "--quiet", remote])
      .arg(format!("refs/tags/{}", name))
      .output()
      .context("Failed to push tag")?;

    if !output.status.success() {
      return Err(AdeError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        tag: name.to_string(),
        reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables apart from a short whitelist
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = isolated_git();
    cmd.arg("-C").arg(&self.repo_path);
    cmd
  }
}

impl Vcs for SystemGit {
  fn module(&self) -> &str {
    &self.module
  }

  fn source_repo(&self) -> &str {
    &self.source
  }

  fn list_tags(&self) -> AdeResult<BTreeSet<String>> {
    let output = self
      .git_cmd()
      .args(["tag", "--list"])
      .output()
      .context("Failed to list tags")?;

    if !output.status.success() {
      return Err(AdeError::Git(GitError::CommandFailed {
        command: "git tag --list".to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect(),
    )
  }

  fn create_tag(&self, name: &str, commit: &str, message: &str) -> AdeResult<()> {
    let output = self
      .git_cmd()
      .args(["tag", "-a", name, "-m", message, commit])
      .output()
      .context("Failed to create tag")?;

    if !output.status.success() {
      return Err(AdeError::Git(GitError::CommandFailed {
        command: format!("git tag -a {} {}", name, commit),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }
    info!(tag = name, commit, module = %self.module, "created tag");

    if let Some(remote) = &self.remote {
      self.push_tag(remote, name)?;
      info!(tag = name, remote = %remote, "pushed tag");
    }

    Ok(())
  }

  fn commit_exists(&self, reference: &str) -> AdeResult<bool> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", "--quiet"])
      .arg(format!("{}^{{commit}}", reference))
      .output()
      .context("Failed to resolve reference")?;

    Ok(output.status.success())
  }

  fn read_file(&self, reference: &str, path: &Path) -> AdeResult<Option<Vec<u8>>> {
    if !self.commit_exists(reference)? {
      return Err(AdeError::Git(GitError::RefNotFound {
        reference: reference.to_string(),
      }));
    }

    let spec = format!("{}:{}", reference, path_to_git_format(path));

    let output = self
      .git_cmd()
      .args(["show", &spec])
      .output()
      .context("Failed to read file from commit")?;

    if !output.status.success() {
      debug!(spec = %spec, "file not present");
      return Ok(None);
    }

    Ok(Some(output.stdout))
  }
}

/// Location of a module repository on the server
pub fn module_url(server: &str, root_dir: &str, area: &str, module: &str) -> String {
  if is_local_path(server) {
    let base = Path::new(server).join(root_dir).join(area);
    let bare = base.join(format!("{}.git", module));
    let chosen = if bare.exists() { bare } else { base.join(module) };
    return chosen.display().to_string();
  }

  let server = server.trim_end_matches('/');
  let root_dir = root_dir.trim_matches('/');
  if root_dir.is_empty() {
    format!("{}/{}/{}.git", server, area, module)
  } else {
    format!("{}/{}/{}/{}.git", server, root_dir, area, module)
  }
}

fn isolated_git() -> Command {
  let mut cmd = Command::new("git");

  // Isolated environment (don't trust global config)
  cmd.env_clear();
  for var in PASSTHROUGH_ENV {
    if let Ok(value) = std::env::var(var) {
      cmd.env(var, value);
    }
  }

  // Force safe behavior (override user config)
  cmd.arg("-c").arg("protocol.version=2");
  cmd.arg("-c").arg("advice.detachedHead=false");
  cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII
  cmd.arg("-c").arg("tag.gpgSign=false");

  cmd
}
