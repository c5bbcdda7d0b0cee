//! Show the resolved site environment and the area table built from it

use crate::core::context::AdeContext;
use crate::core::error::AdeResult;
use crate::site::{Area, Environment};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct AreaPaths {
  area: Area,
  dev: PathBuf,
  prod: PathBuf,
}

#[derive(Debug, Serialize)]
struct EnvironmentReport<'a> {
  environment: &'a Environment,
  epics_dir: PathBuf,
  areas: Vec<AreaPaths>,
}

/// Run the env command
pub fn run_env(ctx: &AdeContext, json: bool) -> AdeResult<()> {
  let env = &ctx.env;
  let report = EnvironmentReport {
    environment: env,
    epics_dir: env.epics_dir(),
    areas: Area::ALL
      .iter()
      .map(|&area| AreaPaths {
        area,
        dev: area.dev_path(env),
        prod: area.prod_path(env),
      })
      .collect(),
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  println!("🌐 Site environment");
  println!("  EPICS:     {}", env.epics_version());
  println!("  RHEL:      {}", env.rhel_version());
  println!("  Root:      {}", env.root().display());
  println!("  EPICS dir: {}", report.epics_dir.display());
  println!();
  for paths in &report.areas {
    println!("  {:<11} {}", paths.area.as_str(), paths.dev.display());
    println!("  {:<11} {}", "", paths.prod.display());
  }

  Ok(())
}
