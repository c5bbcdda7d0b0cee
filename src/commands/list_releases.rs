//! List the releases of a module, either installed in prod or tagged in its
//! repository.

use crate::core::context::AdeContext;
use crate::core::error::{AdeResult, ResultExt};
use crate::core::vcs::{SystemGit, Vcs};
use crate::release::set::release_number;
use crate::release::{ReleaseSet, sort_by_release};
use crate::site::{Area, Environment};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Options of `dls-ade list-releases`
#[derive(Debug, Clone, Default)]
pub struct ListReleasesArgs {
  pub module: String,
  pub area: String,
  /// Only the newest release
  pub latest: bool,
  /// Read tags from the repository instead of prod
  pub git: bool,
  /// Local checkout to read tags from
  pub repo: Option<PathBuf>,
  pub json: bool,
}

#[derive(Debug, Serialize)]
struct ReleaseListing<'a> {
  module: &'a str,
  area: Area,
  source: &'static str,
  releases: Vec<String>,
}

/// Run the list-releases command
pub fn run_list_releases(ctx: &AdeContext, args: &ListReleasesArgs) -> AdeResult<()> {
  let area: Area = args.area.parse()?;

  let (source, releases) = if args.git || args.repo.is_some() {
    ("the repository", repository_releases(ctx, args, area)?)
  } else {
    ("prod", prod_releases(&args.module, area, &ctx.env)?)
  };

  let releases = if args.latest {
    releases.last().cloned().into_iter().collect()
  } else {
    releases
  };

  if args.json {
    let listing = ReleaseListing {
      module: &args.module,
      area,
      source,
      releases,
    };
    println!("{}", serde_json::to_string_pretty(&listing)?);
    return Ok(());
  }

  match releases.last() {
    None if source == "prod" => println!(
      "{}: No releases made for {}",
      args.module,
      ctx.env.epics_version_dir()
    ),
    None => println!("{}: No releases made in git", args.module),
    Some(latest) if args.latest => {
      println!("The latest release for {} in {} is: {}", args.module, source, latest)
    }
    Some(_) => {
      println!("Previous releases for {} in {}:", args.module, source);
      for release in &releases {
        println!("  {}", release);
      }
    }
  }

  Ok(())
}

/// Release numbers of a module's tags, oldest first
fn repository_releases(ctx: &AdeContext, args: &ListReleasesArgs, area: Area) -> AdeResult<Vec<String>> {
  let releases: ReleaseSet = match &args.repo {
    Some(path) => SystemGit::open(path, &args.module)?.releases()?,
    None => {
      let clone_dir = TempDir::new().context("Failed to create clone directory")?;
      SystemGit::clone_module(
        &ctx.config.vcs.server,
        &ctx.config.vcs.root_dir,
        area.as_str(),
        &args.module,
        &clone_dir.path().join("module"),
      )?
      .releases()?
    }
  };

  Ok(releases.sorted().into_iter().map(str::to_string).collect())
}

/// Release directories of a module in prod, oldest first
pub fn prod_releases(module: &str, area: Area, env: &Environment) -> AdeResult<Vec<String>> {
  let module_dir = area.prod_path(env).join(module);
  if !module_dir.is_dir() {
    return Ok(Vec::new());
  }

  let mut installed = Vec::new();
  for entry in fs::read_dir(&module_dir).with_context(|| format!("Failed to read {}", module_dir.display()))? {
    let path = entry?.path();
    if path.is_dir() {
      installed.push(path.display().to_string());
    }
  }

  Ok(
    sort_by_release(installed, |path| path.as_str())
      .iter()
      .map(|path| release_number(path))
      .collect(),
  )
}
