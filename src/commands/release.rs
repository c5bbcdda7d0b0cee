//! Release command implementation
//!
//! Order of work for one module:
//! 1. check the option combination
//! 2. open or clone the module repository
//! 3. decide the version from the existing tags
//! 4. check the EPICS base the module was built against (support, ioc)
//! 5. create and push the tag if the decision asks for one
//! 6. submit the build job

use crate::core::build::{BuildJob, BuildServer, QueueBuildServer};
use crate::core::context::AdeContext;
use crate::core::error::{AdeError, AdeResult, GitError, ReleaseError, ResultExt, ValidationError};
use crate::core::vcs::{SystemGit, Vcs};
use crate::release::{DlsTagConvention, ReleaseDecision, ReleaseRequest, determine_version_to_release};
use crate::site::{Area, Environment};
use regex::Regex;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};

/// The only etc modules released through this tool
const ETC_MODULES: [&str; 2] = ["init", "Launcher"];

/// File recording the EPICS base a module builds against
const EPICS_RELEASE_FILE: &str = "configure/RELEASE";

/// Options of `dls-ade release`
#[derive(Debug, Clone, Default)]
pub struct ReleaseArgs {
  pub module: String,
  pub release: Option<String>,
  pub area: String,
  pub next_version: bool,
  pub commit: Option<String>,
  pub message: String,
  pub test_only: bool,
  pub force: bool,
  pub repo: Option<PathBuf>,
  pub dry_run: bool,
}

/// Run the release command
pub fn run_release(ctx: &AdeContext, args: &ReleaseArgs) -> AdeResult<()> {
  let area: Area = args.area.parse()?;
  validate_args(args, area, &ctx.env)?;
  let build = QueueBuildServer::new(&ctx.config.build.queue);

  // python3ext releases carry no source
  if !area.uses_git() {
    let version = args.release.clone().ok_or(ReleaseError::MissingRelease)?;
    let decision = ReleaseDecision {
      version,
      commit_to_tag: None,
    };
    print_decision(&args.module, area, &decision);
    if args.dry_run {
      println!("🔍 Dry-run mode (nothing submitted)");
      return Ok(());
    }
    submit(ctx, args, area, &args.module, "", &decision, &build)?;
    return Ok(());
  }

  let (vcs, _clone_dir) = open_module(ctx, args, area)?;
  execute(ctx, args, area, &vcs, &build)?;
  Ok(())
}

/// Release a module whose repository is already open.
///
/// Returns the build job id, or `None` for a dry run.
pub fn execute(
  ctx: &AdeContext,
  args: &ReleaseArgs,
  area: Area,
  vcs: &dyn Vcs,
  build: &dyn BuildServer,
) -> AdeResult<Option<String>> {
  let releases = vcs.releases()?;
  if args.release.is_none()
    && !args.next_version
    && let Some(commit) = &args.commit
  {
    info!(commit = %commit, "no release specified; test build only");
  }

  let request = ReleaseRequest::from_options(args.release.as_deref(), args.commit.as_deref(), args.next_version)?;
  let decision = determine_version_to_release(&request, area, &releases, &DlsTagConvention)?;
  print_decision(vcs.module(), area, &decision);

  if let Some(commit) = decision.commit_to_tag.as_deref().or(args.commit.as_deref())
    && !vcs.commit_exists(commit)?
  {
    return Err(AdeError::Git(GitError::RefNotFound {
      reference: commit.to_string(),
    }));
  }

  if area.is_epics_module() {
    let reference = decision.commit_to_tag.as_deref().unwrap_or(&decision.version);
    check_epics_consistency(&ctx.env, ctx.epics_from_cli, vcs, reference)?;
  }

  if args.dry_run {
    println!("🔍 Dry-run mode (no tag created, nothing submitted)");
    return Ok(None);
  }

  if let Some(commit) = &decision.commit_to_tag {
    println!("🏷️  Making tag {} at {}", decision.version, commit);
    vcs.create_tag(&decision.version, commit, &tag_message(vcs.module(), &decision.version, &args.message))?;
  }

  let id = submit(ctx, args, area, vcs.module(), vcs.source_repo(), &decision, build)?;
  Ok(Some(id))
}

/// Reject option combinations the build server cannot serve
pub fn validate_args(args: &ReleaseArgs, area: Area, env: &Environment) -> AdeResult<()> {
  let invalid = |reason: String| AdeError::Validation(ValidationError::InvalidArguments { reason });

  if args.module.trim().is_empty() {
    return Err(invalid("Module name not specified".to_string()));
  }

  if args.release.is_none() && !(args.next_version || (args.commit.is_some() && args.test_only)) {
    return Err(ReleaseError::MissingRelease.into());
  }

  match area {
    Area::Etc => {
      if !ETC_MODULES.contains(&args.module.as_str()) {
        return Err(invalid(format!(
          "The only supported etc modules are {} - for others, use configure system instead",
          ETC_MODULES.join(", ")
        )));
      }
      if args.test_only {
        return Err(invalid("Test builds are not possible for etc modules".to_string()));
      }
    }
    Area::Python3 | Area::Python3Ext if env.rhel_version() == "6" => {
      return Err(invalid(format!("{} releases cannot be made for RHEL6", area)));
    }
    _ => {}
  }

  if !area.uses_git() && (args.next_version || args.commit.is_some() || args.release.is_none()) {
    return Err(invalid(format!(
      "{} releases have no repository; give the release name only",
      area
    )));
  }

  Ok(())
}

/// Abort when the module was last built against another EPICS base and no
/// `-e` was given to confirm the switch.
pub fn check_epics_consistency(env: &Environment, epics_from_cli: bool, vcs: &dyn Vcs, reference: &str) -> AdeResult<()> {
  let Some(contents) = vcs.read_file(reference, Path::new(EPICS_RELEASE_FILE))? else {
    return Ok(());
  };
  let contents = String::from_utf8_lossy(&contents);
  let Some(module_epics) = module_epics_version(&contents, env.root())? else {
    return Ok(());
  };

  let build_epics = env.epics_version().replace("_64", "");
  if module_epics == build_epics {
    return Ok(());
  }
  if epics_from_cli {
    warn!(module_epics = %module_epics, build_epics = %build_epics, "EPICS version changes with this release");
    return Ok(());
  }

  Err(AdeError::Validation(ValidationError::EpicsMismatch {
    module_epics,
    build_epics,
  }))
}

/// EPICS version of the base referenced by a `configure/RELEASE` file
pub fn module_epics_version(release_file: &str, root: &Path) -> AdeResult<Option<String>> {
  let pattern = format!(
    r"{}/epics/(R\d(?:\.\d+)+)/base",
    regex::escape(&root.display().to_string())
  );
  let re = Regex::new(&pattern)?;
  Ok(
    re.captures(release_file)
      .and_then(|captures| captures.get(1))
      .map(|version| version.as_str().to_string()),
  )
}

/// Annotation of a release tag
pub fn tag_message(module: &str, version: &str, message: &str) -> String {
  format!("{}: Released version {}. {}", module, version, message)
    .trim_end()
    .to_string()
}

fn open_module(ctx: &AdeContext, args: &ReleaseArgs, area: Area) -> AdeResult<(SystemGit, Option<TempDir>)> {
  if let Some(path) = &args.repo {
    return Ok((SystemGit::open(path, &args.module)?, None));
  }

  let clone_dir = TempDir::new().context("Failed to create clone directory")?;
  let vcs = SystemGit::clone_module(
    &ctx.config.vcs.server,
    &ctx.config.vcs.root_dir,
    area.as_str(),
    &args.module,
    &clone_dir.path().join("module"),
  )?;
  Ok((vcs, Some(clone_dir)))
}

fn submit(
  ctx: &AdeContext,
  args: &ReleaseArgs,
  area: Area,
  module: &str,
  source: &str,
  decision: &ReleaseDecision,
  build: &dyn BuildServer,
) -> AdeResult<String> {
  let kind = if args.test_only { "test-release" } else { "Release" };
  let job = BuildJob::new(module, area, &decision.version, source, &ctx.env)
    .test_only(args.test_only)
    .force(args.force);

  println!(
    "🔨 Creating {} job for {} {} (EPICS {}, {})",
    kind, module, decision.version, job.epics, job.build_os
  );
  let id = build.submit(&job)?;
  println!(
    "✅ {} job for {}-module: '{}' {} submitted to build server queue",
    kind, area, module, decision.version
  );
  Ok(id)
}

fn print_decision(module: &str, area: Area, decision: &ReleaseDecision) {
  println!("📦 Release of {} ({})", module, area);
  println!("  Version: {}", decision.version);
  match &decision.commit_to_tag {
    Some(commit) => println!("  Tag:     new, at {}", commit),
    None => println!("  Tag:     none created"),
  }
}
