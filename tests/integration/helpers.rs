//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const EPICS: &str = "R3.14.12.3";

const IDENTITY: [(&str, &str); 4] = [
  ("GIT_AUTHOR_NAME", "Test User"),
  ("GIT_AUTHOR_EMAIL", "test@example.com"),
  ("GIT_COMMITTER_NAME", "Test User"),
  ("GIT_COMMITTER_EMAIL", "test@example.com"),
];

/// A fake site: git server, build queue, dls_sw tree and an ade.toml
/// pointing at all of them
pub struct TestSite {
  root: TempDir,
  /// Directory dls-ade runs in; holds ade.toml
  pub path: PathBuf,
  /// Local directory standing in for the git server
  pub server: PathBuf,
  pub queue: PathBuf,
  /// Site root replacing /dls_sw
  pub dls_sw: PathBuf,
}

/// A module repository on the test server, with a working clone
pub struct TestModule {
  pub bare: PathBuf,
  pub checkout: PathBuf,
}

impl TestSite {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("cwd");
    let server = root.path().join("server");
    let queue = root.path().join("queue");
    let dls_sw = root.path().join("dls_sw");
    for dir in [&path, &server, &queue, &dls_sw] {
      std::fs::create_dir_all(dir)?;
    }

    std::fs::write(
      path.join("ade.toml"),
      format!(
        r#"[environment]
epics = "{}"
rhel = "7"
root = "{}"

[vcs]
server = "{}"
root_dir = "controls"

[build]
queue = "{}"
"#,
        EPICS,
        dls_sw.display(),
        server.display(),
        queue.display()
      ),
    )?;

    Ok(Self {
      root,
      path,
      server,
      queue,
      dls_sw,
    })
  }

  /// Create `module` on the server with one commit whose configure/RELEASE
  /// points at EPICS base `epics`
  pub fn add_module(&self, area: &str, module: &str, epics: &str) -> Result<TestModule> {
    let bare = self
      .server
      .join("controls")
      .join(area)
      .join(format!("{}.git", module));
    std::fs::create_dir_all(&bare)?;
    git(&bare, &["init", "--bare", "--initial-branch=main"])?;

    let checkout = self.root.path().join("checkouts").join(module);
    std::fs::create_dir_all(&checkout)?;
    git(&checkout, &["init", "--initial-branch=main"])?;
    git(&checkout, &["remote", "add", "origin", &bare.display().to_string()])?;

    std::fs::create_dir_all(checkout.join("configure"))?;
    std::fs::write(
      checkout.join("configure/RELEASE"),
      format!("EPICS_BASE={}/epics/{}/base\n", self.dls_sw.display(), epics),
    )?;
    let module = TestModule { bare, checkout };
    module.commit("Initial module")?;
    git(&module.checkout, &["push", "--quiet", "origin", "main"])?;
    Ok(module)
  }

  /// Build requests waiting in the queue
  pub fn queued_jobs(&self) -> Result<Vec<serde_json::Value>> {
    let mut jobs = Vec::new();
    for entry in std::fs::read_dir(&self.queue)? {
      let content = std::fs::read_to_string(entry?.path())?;
      jobs.push(serde_json::from_str(&content)?);
    }
    Ok(jobs)
  }

  /// Create release directories in prod
  pub fn install(&self, area_path: &str, module: &str, releases: &[&str]) -> Result<()> {
    for release in releases {
      std::fs::create_dir_all(self.dls_sw.join("prod").join(area_path).join(module).join(release))?;
    }
    Ok(())
  }
}

impl TestModule {
  /// Commit everything in the checkout
  pub fn commit(&self, message: &str) -> Result<String> {
    std::fs::write(self.checkout.join("CHANGES"), message)?;
    git(&self.checkout, &["add", "."])?;
    git(&self.checkout, &["commit", "--quiet", "-m", message])?;

    let output = git(&self.checkout, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Commit and push to the server
  pub fn push_commit(&self, message: &str) -> Result<String> {
    let sha = self.commit(message)?;
    git(&self.checkout, &["push", "--quiet", "origin", "main"])?;
    Ok(sha)
  }

  /// Tag HEAD and push the tag to the server
  pub fn release(&self, tag: &str) -> Result<()> {
    git(&self.checkout, &["tag", tag])?;
    git(&self.checkout, &["push", "--quiet", "origin", tag])?;
    Ok(())
  }

  /// Tags on the server
  pub fn server_tags(&self) -> Result<Vec<String>> {
    let output = git(&self.bare, &["tag", "--list"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Subject line of an annotated tag on the server
  pub fn tag_subject(&self, tag: &str) -> Result<String> {
    let output = git(
      &self.bare,
      &["for-each-ref", &format!("refs/tags/{}", tag), "--format=%(contents:subject)"],
    )?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .envs(IDENTITY)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run dls-ade and return its output whether or not it succeeded
pub fn dls_ade(cwd: &Path, args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_dls-ade"))
    .current_dir(cwd)
    .args(args)
    .envs(IDENTITY)
    .env_remove("DLS_EPICS_RELEASE")
    .env_remove("EPICS_RELEASE")
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run dls-ade")
}

/// Run dls-ade, failing the test if it fails
pub fn run_dls_ade(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = dls_ade(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "dls-ade command failed: dls-ade {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
